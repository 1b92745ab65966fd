//! Unified error types for the gallery application.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error loading, decoding or encoding an image file
    ImageLoad(String),
    /// Directory to list does not exist
    FolderNotFound(PathBuf),
    /// Directory to list is not readable
    PermissionDenied(PathBuf),
    /// Any other failure while listing a directory
    DirectoryScan(String),
    /// Folder name is empty or not a plain directory name
    InvalidFolderName(String),
    /// Folder to create already exists
    FolderExists(String),
    /// Filesystem write failed (folder creation, copy)
    Io(String),
    /// Camera unavailable or failed to deliver a frame
    Camera(String),
    /// Capture processing failed
    Processing(String),
    /// Capture action not allowed in the current stage
    InvalidState(String),
}

impl AppError {
    /// Classifies an error from listing `path`.
    pub fn from_scan(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => AppError::FolderNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => AppError::PermissionDenied(path.to_path_buf()),
            _ => AppError::DirectoryScan(format!("{}: {}", path.display(), err)),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ImageLoad(msg) => write!(f, "Image error: {}", msg),
            AppError::FolderNotFound(path) => {
                write!(f, "Folder '{}' not found", path.display())
            }
            AppError::PermissionDenied(path) => {
                write!(f, "Permission denied for folder '{}'", path.display())
            }
            AppError::DirectoryScan(msg) => write!(f, "Directory scan error: {}", msg),
            AppError::InvalidFolderName(name) => write!(f, "Invalid folder name: '{}'", name),
            AppError::FolderExists(name) => write!(f, "Folder '{}' already exists", name),
            AppError::Io(msg) => write!(f, "File error: {}", msg),
            AppError::Camera(msg) => write!(f, "Camera error: {}", msg),
            AppError::Processing(msg) => write!(f, "Processing error: {}", msg),
            AppError::InvalidState(msg) => write!(f, "Invalid action: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<nokhwa::NokhwaError> for AppError {
    fn from(err: nokhwa::NokhwaError) -> Self {
        AppError::Camera(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_errors_are_classified_by_kind() {
        let path = Path::new("missing");
        assert!(matches!(
            AppError::from_scan(path, io::Error::from(io::ErrorKind::NotFound)),
            AppError::FolderNotFound(_)
        ));
        assert!(matches!(
            AppError::from_scan(path, io::Error::from(io::ErrorKind::PermissionDenied)),
            AppError::PermissionDenied(_)
        ));
        assert!(matches!(
            AppError::from_scan(path, io::Error::other("boom")),
            AppError::DirectoryScan(_)
        ));
    }

    #[test]
    fn display_names_the_folder() {
        let err = AppError::FolderNotFound(PathBuf::from("holiday"));
        assert_eq!(err.to_string(), "Folder 'holiday' not found");
    }
}
