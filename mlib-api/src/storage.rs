//! File storage for uploaded audio binaries
//!
//! Binaries live flat inside one root directory and are referenced from song
//! records by their public URL (`/uploads/<filename>`).

use mlib_common::time;
use rand::Rng;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// URL prefix under which the storage root is served
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Prefix of generated filenames (the multipart field name)
const FILENAME_PREFIX: &str = "audioFile";

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it doesn't exist
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Unique filename `audioFile-<millis>-<random><.ext>` keeping the
    /// original extension
    pub fn generate_filename(original_name: &str) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        format!(
            "{}-{}-{}{}",
            FILENAME_PREFIX,
            time::unix_millis(),
            suffix,
            extension_of(original_name)
        )
    }

    /// Write a binary under a generated name and return its public URL
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let filename = Self::generate_filename(original_name);
        let path = self.root.join(&filename);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        let partial = PartialFile::new(path);
        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;
        // Close before a failed write is discarded
        drop(file);
        written?;
        partial.keep();

        info!("Stored {} ({} bytes) as {}", original_name, bytes.len(), filename);
        Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
    }

    /// Map a public URL back to a path inside the root
    ///
    /// Returns `None` for URLs outside `/uploads/` or anything that isn't a
    /// single plain filename.
    pub fn resolve(&self, file_url: &str) -> Option<PathBuf> {
        let name = file_url.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.root.join(name)),
            _ => None,
        }
    }

    /// Delete the binary behind `file_url`, best-effort
    ///
    /// Returns whether a file was removed. Missing files are skipped; other
    /// failures are logged and leave an orphan behind.
    pub async fn remove(&self, file_url: &str) -> bool {
        let Some(path) = self.resolve(file_url) else {
            warn!("Refusing to delete file outside upload dir: {}", file_url);
            return false;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {}", path.display());
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Binary already gone: {}", path.display());
                false
            }
            Err(e) => {
                warn!("Failed to remove {}: {}", path.display(), e);
                false
            }
        }
    }
}

/// Deletes a freshly created file on drop unless [`PartialFile::keep`] was
/// called, so a failed write leaves nothing behind
struct PartialFile {
    path: Option<PathBuf>,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn keep(mut self) {
        self.path = None;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Discarded partial upload {}", path.display()),
                Err(e) => warn!("Failed to discard partial upload {}: {}", path.display(), e),
            }
        }
    }
}

/// `.ext` of the original filename, or empty
///
/// Only plain alphanumeric extensions are kept so generated names stay safe
/// to serve.
fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
