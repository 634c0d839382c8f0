//! Upload guard: file-format rejection before anything is parsed or sent

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default upload size limit (10 MB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Workbook extensions the reader accepts
pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported file type '{extension}' for {path}: expected .xlsx or .xls")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("{path} is {size} bytes, which exceeds the {limit} byte upload limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Failed to inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Limits applied to uploaded workbooks
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Check extension and size. Returns the file size on success.
    pub fn check(&self, path: &Path) -> Result<u64, UploadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
            });
        }

        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                UploadError::NotFound(path.to_path_buf())
            } else {
                UploadError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let size = metadata.len();
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_bytes,
            });
        }

        Ok(size)
    }
}
