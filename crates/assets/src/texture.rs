use crate::AssetError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use skatepark_scene::TextureId;
use std::collections::BTreeMap;
use std::path::Path;

/// Decoded RGBA8 image.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureImage {
    pub id: TextureId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed rows, 4 bytes per pixel.
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureImage")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl TextureImage {
    /// Decode an encoded image (PNG or JPEG). The id hashes the encoded bytes.
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            source,
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            id: content_id(bytes),
            name: name.to_string(),
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::decode(&name, &bytes)
    }

    /// Single opaque white pixel.
    pub fn white() -> Self {
        let rgba = vec![255; 4];
        Self {
            id: content_id(&rgba),
            name: "white".into(),
            width: 1,
            height: 1,
            rgba,
        }
    }
}

/// Content-addressed id: the first eight bytes of the SHA-256 digest.
pub fn content_id(bytes: &[u8]) -> TextureId {
    let digest = Sha256::digest(bytes);
    let mut id = [0u8; 8];
    id.copy_from_slice(&digest[..8]);
    TextureId(u64::from_le_bytes(id))
}

/// Decoded textures keyed by content id.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    images: BTreeMap<TextureId, TextureImage>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an image. Identical content is stored once.
    pub fn insert(&mut self, image: TextureImage) -> TextureId {
        let id = image.id;
        self.images.entry(id).or_insert(image);
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureImage> {
        self.images.get(&id)
    }

    pub fn contains(&self, id: TextureId) -> bool {
        self.images.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureImage> {
        self.images.values()
    }

    /// Total decoded bytes held.
    pub fn byte_size(&self) -> usize {
        self.images.values().map(|i| i.rgba.len()).sum()
    }
}
