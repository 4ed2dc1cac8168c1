//! Media handles: transient URLs for in-memory media.
//!
//! Each slot holds at most one URL. Replacing a slot revokes its previous
//! URL first, and every URL still held is revoked exactly once on
//! `release_all` or drop.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSlot {
    /// Preview of the file submitted for analysis.
    Upload,
    Image,
    Video,
    Speech,
}

/// Creates and revokes URLs for media bytes.
pub trait MediaUrlFactory: Send + Sync {
    fn create(&self, mime_type: &str, bytes: &[u8]) -> std::io::Result<String>;

    /// Must tolerate URLs whose backing resource is already gone.
    fn revoke(&self, url: &str);
}

/// Temporary files exposed as `file://` URLs, deleted on revoke.
#[derive(Debug, Clone)]
pub struct TempFileUrls {
    dir: PathBuf,
}

impl TempFileUrls {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// `<system temp>/content-studio-media`
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("content-studio-media"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for TempFileUrls {
    fn default() -> Self {
        Self::in_temp_dir()
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    match essence {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/mpeg" => "mp3",
        "audio/ogg" => "ogg",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        "text/markdown" => "md",
        _ => "bin",
    }
}

impl MediaUrlFactory for TempFileUrls {
    fn create(&self, mime_type: &str, bytes: &[u8]) -> std::io::Result<String> {
        std::fs::create_dir_all(&self.dir)?;

        let suffix = format!(".{}", extension_for(mime_type));
        let mut file = tempfile::Builder::new()
            .prefix("media-")
            .suffix(&suffix)
            .tempfile_in(&self.dir)?;
        file.write_all(bytes)?;

        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(format!("file://{}", path.display()))
    }

    fn revoke(&self, url: &str) {
        let Some(path) = url.strip_prefix("file://") else {
            log::warn!("Not a file URL, nothing to revoke: {}", url);
            return;
        };
        match std::fs::remove_file(path) {
            Ok(()) => log::debug!("Revoked {}", url),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", path, e),
        }
    }
}

pub struct MediaSlots {
    factory: Arc<dyn MediaUrlFactory>,
    urls: HashMap<MediaSlot, String>,
}

impl MediaSlots {
    pub fn new(factory: Arc<dyn MediaUrlFactory>) -> Self {
        Self {
            factory,
            urls: HashMap::new(),
        }
    }

    /// Revoke the slot's current URL, then create one for `bytes`.
    pub fn replace(
        &mut self,
        slot: MediaSlot,
        mime_type: &str,
        bytes: &[u8],
    ) -> std::io::Result<String> {
        self.release(slot);
        let url = self.factory.create(mime_type, bytes)?;
        self.urls.insert(slot, url.clone());
        Ok(url)
    }

    pub fn url(&self, slot: MediaSlot) -> Option<&str> {
        self.urls.get(&slot).map(String::as_str)
    }

    pub fn release(&mut self, slot: MediaSlot) {
        if let Some(url) = self.urls.remove(&slot) {
            self.factory.revoke(&url);
        }
    }

    pub fn release_all(&mut self) {
        for (_, url) in self.urls.drain() {
            self.factory.revoke(&url);
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl Drop for MediaSlots {
    fn drop(&mut self) {
        self.release_all();
    }
}
