use crate::{AssetError, TextureImage, TextureRequest};
use skatepark_common::MaterialSlot;
use skatepark_scene::Sampling;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// Outcome of one background load.
#[derive(Debug)]
pub struct TextureLoaded {
    pub slot: MaterialSlot,
    pub file: String,
    pub sampling: Sampling,
    pub result: Result<TextureImage, AssetError>,
}

/// Reads and decodes textures on worker threads.
///
/// Results arrive in completion order; callers drain them once per frame.
pub struct TextureLoader {
    root: PathBuf,
    tx: Sender<TextureLoaded>,
    rx: Receiver<TextureLoaded>,
    pending: usize,
}

impl TextureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            root: root.into(),
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads still in flight.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start loading one texture.
    pub fn request(&mut self, request: TextureRequest) {
        let path = self.root.join(&request.file);
        let tx = self.tx.clone();
        self.pending += 1;
        tracing::debug!(slot = %request.slot, path = %path.display(), "texture requested");
        std::thread::spawn(move || {
            let result = TextureImage::load(&path);
            // The receiver only disappears with the loader itself.
            let _ = tx.send(TextureLoaded {
                slot: request.slot,
                file: request.file,
                sampling: request.sampling,
                result,
            });
        });
    }

    pub fn request_all(&mut self, requests: impl IntoIterator<Item = TextureRequest>) {
        for request in requests {
            self.request(request);
        }
    }

    /// Results that are ready now, without blocking.
    pub fn drain(&mut self) -> Vec<TextureLoaded> {
        let mut ready = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(loaded) => ready.push(self.finish(loaded)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        ready
    }

    /// Block until every request finished or `timeout` elapsed.
    pub fn wait_all(&mut self, timeout: Duration) -> Vec<TextureLoaded> {
        let deadline = Instant::now() + timeout;
        let mut ready = Vec::new();
        while self.pending > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(loaded) => ready.push(self.finish(loaded)),
                Err(_) => {
                    tracing::warn!(pending = self.pending, "timed out waiting for textures");
                    break;
                }
            }
        }
        ready
    }

    fn finish(&mut self, loaded: TextureLoaded) -> TextureLoaded {
        self.pending = self.pending.saturating_sub(1);
        match &loaded.result {
            Ok(image) => tracing::info!(
                slot = %loaded.slot,
                file = %loaded.file,
                width = image.width,
                height = image.height,
                "texture loaded"
            ),
            Err(e) => tracing::error!(slot = %loaded.slot, file = %loaded.file, "{e}"),
        }
        loaded
    }
}

impl std::fmt::Debug for TextureLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureLoader")
            .field("root", &self.root)
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::tests::png_bytes;

    const WAIT: Duration = Duration::from_secs(10);

    #[test]
    fn loads_in_background() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("face.png"), png_bytes(2, 2, [0, 255, 0, 255])).unwrap();

        let mut loader = TextureLoader::new(dir.path());
        loader.request(TextureRequest::new(MaterialSlot::Head, "face.png", Sampling::clamp()));
        assert_eq!(loader.pending(), 1);

        let loaded = loader.wait_all(WAIT);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loader.pending(), 0);
        assert_eq!(loaded[0].slot, MaterialSlot::Head);
        let image = loaded[0].result.as_ref().unwrap();
        assert_eq!((image.width, image.height), (2, 2));
    }

    #[test]
    fn missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = TextureLoader::new(dir.path());
        loader.request(TextureRequest::new(MaterialSlot::Deck, "board.png", Sampling::clamp()));
        let loaded = loader.wait_all(WAIT);
        assert_eq!(loaded.len(), 1);
        assert!(matches!(loaded[0].result, Err(AssetError::Io { .. })));
    }

    #[test]
    fn one_failure_does_not_block_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.png"), png_bytes(1, 1, [9, 9, 9, 255])).unwrap();
        std::fs::write(dir.path().join("bad.png"), b"junk").unwrap();

        let mut loader = TextureLoader::new(dir.path());
        loader.request_all([
            TextureRequest::new(MaterialSlot::Torso, "good.png", Sampling::clamp()),
            TextureRequest::new(MaterialSlot::Legs, "bad.png", Sampling::clamp()),
        ]);
        let loaded = loader.wait_all(WAIT);
        assert_eq!(loaded.len(), 2);
        let ok = loaded.iter().filter(|l| l.result.is_ok()).count();
        assert_eq!(ok, 1);
        assert!(loader.drain().is_empty());
    }

    #[test]
    fn drain_without_requests_is_empty() {
        let mut loader = TextureLoader::new("/nowhere");
        assert!(loader.drain().is_empty());
        assert!(loader.wait_all(Duration::from_millis(1)).is_empty());
    }
}
