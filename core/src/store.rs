//! Local staging area for the image about to be uploaded.
//!
//! Exactly one file lives in the store at a time, always under the same
//! name; saving a new image replaces the previous one.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::ApiError;

/// Fixed name of the staged image file.
pub const IMAGE_FILE_NAME: &str = "image.jpg";

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location of the staged image, whether or not it exists yet.
    pub fn path(&self) -> PathBuf {
        self.dir.join(IMAGE_FILE_NAME)
    }

    /// Write `bytes` as the staged image, overwriting any earlier one.
    pub fn save(&self, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path();
        fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), len = bytes.len(), "staged image");
        Ok(path)
    }

    /// Read back the staged image.
    pub fn load(&self) -> Result<Vec<u8>, ApiError> {
        let path = self.path();
        fs::read(&path).map_err(|e| {
            ApiError::Validation(format!("cannot read staged image {}: {e}", path.display()))
        })
    }
}
