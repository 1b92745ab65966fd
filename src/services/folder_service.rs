//! Service for the folders under the gallery root.
//!
//! Folder names are always single path components below the root; the
//! service rejects anything else before touching the filesystem.

use crate::error::{AppError, Result};
use crate::file_utils::{self, FolderEntry, PathExt};
use log::{debug, info};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Checks that `name` is a plain directory name and returns it trimmed.
///
/// Names starting with `.` are refused: hidden directories are never listed
/// as folders.
pub fn validate_folder_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.starts_with('.') {
        return Err(AppError::InvalidFolderName(name.to_string()));
    }
    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !trimmed.contains(['/', '\\']) => Ok(trimmed),
        _ => Err(AppError::InvalidFolderName(name.to_string())),
    }
}

#[derive(Clone)]
pub struct FolderService {
    root: Arc<Mutex<PathBuf>>,
}

impl FolderService {
    pub fn new(root: Arc<Mutex<PathBuf>>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> PathBuf {
        self.root.lock().expect("root lock poisoned").clone()
    }

    pub fn set_root(&self, root: PathBuf) {
        info!("Gallery root set to {}", root.format_for_log());
        *self.root.lock().expect("root lock poisoned") = root;
    }

    /// Absolute path of a folder, whether or not it exists.
    pub fn folder_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.root().join(validate_folder_name(name)?))
    }

    /// Names of the folders under the root, sorted.
    pub fn list_folders(&self) -> Result<Vec<String>> {
        file_utils::list_subdirectories(&self.root())
    }

    /// Creates a new folder. Fails when the name is invalid or already taken.
    pub fn create_folder(&self, name: &str) -> Result<PathBuf> {
        let name = validate_folder_name(name)?;
        let path = self.root().join(name);
        if path.exists() {
            return Err(AppError::FolderExists(name.to_string()));
        }

        fs::create_dir_all(&path)?;
        info!("Created folder {}", path.format_for_log());
        Ok(path)
    }

    /// Files of a folder, sorted by name.
    pub fn list_entries(&self, name: &str) -> Result<Vec<FolderEntry>> {
        let path = self.folder_path(name)?;
        let entries = file_utils::list_files(&path)?;
        debug!(
            "Files in {}: {} entries",
            path.format_for_log(),
            entries.len()
        );
        Ok(entries)
    }

    /// Copies `source` into a folder without overwriting anything there.
    pub fn import_file(&self, name: &str, source: &Path) -> Result<PathBuf> {
        let folder = self.folder_path(name)?;
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        let destination = file_utils::unique_destination(&folder, &stem, &extension);
        fs::copy(source, &destination)?;
        info!(
            "Imported {} -> {}",
            source.format_for_log(),
            destination.format_for_log()
        );
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service(root: &Path) -> FolderService {
        FolderService::new(Arc::new(Mutex::new(root.to_path_buf())))
    }

    #[test]
    fn folder_names_must_be_single_components() {
        assert_eq!(validate_folder_name("  trips ").unwrap(), "trips");
        assert!(validate_folder_name("").is_err());
        assert!(validate_folder_name("   ").is_err());
        assert!(validate_folder_name("..").is_err());
        assert!(validate_folder_name(".").is_err());
        assert!(validate_folder_name("a/b").is_err());
        assert!(validate_folder_name("a\\b").is_err());
        assert!(validate_folder_name("/abs").is_err());
        assert!(validate_folder_name(".hidden").is_err());
        assert!(validate_folder_name("  .receipts").is_err());
    }

    #[test]
    fn hidden_name_creates_nothing() {
        let dir = tempdir().unwrap();
        let folders = service(dir.path());

        assert!(matches!(
            folders.create_folder(".receipts"),
            Err(AppError::InvalidFolderName(_))
        ));
        assert!(!dir.path().join(".receipts").exists());
    }

    #[test]
    fn create_folder_then_list_it() {
        let dir = tempdir().unwrap();
        let folders = service(dir.path());

        let created = folders.create_folder(" receipts ").unwrap();
        assert_eq!(created, dir.path().join("receipts"));
        assert!(created.is_dir());
        assert_eq!(folders.list_folders().unwrap(), vec!["receipts".to_string()]);
    }

    #[test]
    fn create_existing_folder_fails() {
        let dir = tempdir().unwrap();
        let folders = service(dir.path());
        folders.create_folder("receipts").unwrap();

        assert!(matches!(
            folders.create_folder("receipts"),
            Err(AppError::FolderExists(name)) if name == "receipts"
        ));
    }

    #[test]
    fn listing_a_missing_folder_is_not_found() {
        let dir = tempdir().unwrap();
        let folders = service(dir.path());
        assert!(matches!(
            folders.list_entries("ghost"),
            Err(AppError::FolderNotFound(_))
        ));
    }

    #[test]
    fn import_keeps_existing_files() {
        let dir = tempdir().unwrap();
        let folders = service(dir.path());
        folders.create_folder("inbox").unwrap();
        let source = dir.path().join("photo.png");
        fs::write(&source, b"new").unwrap();
        fs::write(dir.path().join("inbox").join("photo.png"), b"old").unwrap();

        let imported = folders.import_file("inbox", &source).unwrap();
        assert_eq!(imported, dir.path().join("inbox").join("photo_1.png"));
        assert_eq!(
            fs::read(dir.path().join("inbox").join("photo.png")).unwrap(),
            b"old"
        );
    }

    #[test]
    fn set_root_switches_listing() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        fs::create_dir(second.path().join("b")).unwrap();

        let folders = service(first.path());
        assert!(folders.list_folders().unwrap().is_empty());
        folders.set_root(second.path().to_path_buf());
        assert_eq!(folders.list_folders().unwrap(), vec!["b".to_string()]);
    }
}
