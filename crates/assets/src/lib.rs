//! Texture assets: decoding, content-addressed storage and background loading.
//!
//! # Invariants
//! - A texture's id is derived from its encoded bytes, so identical files share one id.
//! - A failed load is reported once and never retried; the slot keeps its flat colour.

pub mod loader;
pub mod slots;
pub mod texture;

pub use loader::{TextureLoaded, TextureLoader};
pub use slots::{TextureRequest, default_requests};
pub use texture::{TextureImage, TextureStore, content_id};

use std::path::PathBuf;

/// Errors from reading or decoding a texture.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
}
