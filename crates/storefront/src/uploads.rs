//! Local-disk storage for customer design files.
//!
//! Uploaded files land under the configured upload directory with a
//! millisecond-timestamp prefix so repeated uploads of the same file name
//! never collide. The returned URL is served by the static file route
//! mounted at `/uploads`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

/// Errors from the upload store.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Filesystem failure while writing the file.
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),

    /// The uploaded file had no usable name.
    #[error("upload has no file name")]
    MissingFileName,

    /// The uploaded file was empty.
    #[error("upload is empty")]
    Empty,
}

/// A stored upload, ready to attach to a print request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// The original file name as the customer sent it.
    pub file_name: String,
    /// Public URL path under which the file is served.
    pub file_url: String,
}

/// Writes uploads to a directory on local disk.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `root`. The directory is created on first
    /// write, not here.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory uploads are written to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store one uploaded file and return its public URL.
    pub async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredUpload, UploadError> {
        let sanitized = sanitize_file_name(file_name);
        if sanitized.is_empty() {
            return Err(UploadError::MissingFileName);
        }
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let key = format!("{}-{sanitized}", Utc::now().timestamp_millis());

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&key), bytes).await?;

        Ok(StoredUpload {
            file_name: file_name.to_owned(),
            file_url: format!("/uploads/{key}"),
        })
    }
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Anything outside `[A-Za-z0-9._-]` becomes an underscore, and any leading
/// dots are stripped so the result can never be a hidden file or traverse
/// directories.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_owned()
}
