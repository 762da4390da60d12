//! Disk-backed storage for uploaded media attachments.
//!
//! Files are written under a configured directory with server-generated
//! opaque names; the original filename and MIME type live on the content
//! record, not on disk. Stored files are served over HTTP from `/uploads`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::bootstrap::config::UploadConfig;

/// Errors from media storage operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store for uploaded attachment files.
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Open the store, creating the upload directory if needed.
    pub fn new(config: &UploadConfig) -> Result<Self, MediaError> {
        fs::create_dir_all(&config.dir)?;
        Ok(Self {
            root: config.dir.clone(),
        })
    }

    /// Directory the stored files live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist uploaded bytes under an opaque generated name.
    ///
    /// The name is random hex; the extension of the original filename is
    /// preserved (sanitized to alphanumerics) so browsers can sniff the
    /// type when the file is served.
    pub fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, MediaError> {
        let stored_name = match extension_of(original_name) {
            Some(ext) => format!("{:032x}.{}", rand::random::<u128>(), ext),
            None => format!("{:032x}", rand::random::<u128>()),
        };

        let path = self.root.join(&stored_name);
        fs::write(&path, bytes)?;

        info!(file = %stored_name, size = bytes.len(), "Media stored");
        Ok(stored_name)
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub fn remove(&self, stored_name: &str) -> Result<(), MediaError> {
        // Only ever touch direct children of the upload directory.
        let name = Path::new(stored_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        let Some(name) = name else {
            return Ok(());
        };

        match fs::remove_file(self.root.join(&name)) {
            Ok(()) => {
                info!(file = %name, "Media removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(file = %name, "Media file already missing on delete");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn extension_of(original_name: Option<&str>) -> Option<String> {
    let ext = Path::new(original_name?).extension()?.to_str()?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_lowercase())
}
