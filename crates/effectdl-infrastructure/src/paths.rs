//! Path management for effectdl local data.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DataDirNotFound => write!(f, "Cannot find platform data directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves effectdl data directories.
///
/// # Directory Structure
///
/// ```text
/// ~/.local/share/effectdl/     # Data directory (Linux; platform-specific elsewhere)
/// └── images/                  # Cached effect images, one .jpg per effect id
/// ```
pub struct DlPaths;

impl DlPaths {
    /// Returns the effectdl data directory, e.g. `~/.local/share/effectdl/`.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("effectdl"))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the image cache directory, e.g. `~/.local/share/effectdl/images/`.
    pub fn image_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("images"))
    }
}
