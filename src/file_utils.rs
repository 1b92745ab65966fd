use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// What a folder entry is displayed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Image,
    Other,
}

/// A regular file inside a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
}

pub trait PathExt {
    fn format_for_log(&self) -> String;
}

impl PathExt for Path {
    fn format_for_log(&self) -> String {
        format!("'{}'", self.display())
    }
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Lists the supported image files of `dir`, sorted by path.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut image_files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| AppError::from_scan(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();

    image_files.sort();
    Ok(image_files)
}

/// Lists the names of the visible sub-directories of `dir`, sorted.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| AppError::from_scan(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !is_hidden(name))
        .collect();

    names.sort();
    Ok(names)
}

/// Lists the regular files of `dir`, sorted by name and classified by extension.
pub fn list_files(dir: &Path) -> Result<Vec<FolderEntry>> {
    let mut entries: Vec<FolderEntry> = fs::read_dir(dir)
        .map_err(|e| AppError::from_scan(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            let kind = if is_supported_image(&path) {
                EntryKind::Image
            } else {
                EntryKind::Other
            };
            Some(FolderEntry { path, name, kind })
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Returns `dir/<stem>.<ext>`, or `dir/<stem>_<n>.<ext>` with the first free `n`.
pub fn unique_destination(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{extension}"));
    if !candidate.exists() {
        return candidate;
    }

    (1..)
        .map(|n| dir.join(format!("{stem}_{n}.{extension}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn subdirectories_are_sorted_and_skip_files_and_hidden() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("zoo")).unwrap();
        fs::create_dir(dir.path().join("alps")).unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let names = list_subdirectories(dir.path()).unwrap();
        assert_eq!(names, vec!["alps".to_string(), "zoo".to_string()]);
    }

    #[test]
    fn files_are_classified_case_insensitively() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.JPG"), b"x").unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();
        fs::write(dir.path().join("c.png"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let entries = list_files(dir.path()).unwrap();
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.txt", EntryKind::Other),
                ("b.JPG", EntryKind::Image),
                ("c.png", EntryKind::Image),
            ]
        );
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(matches!(
            list_files(&missing),
            Err(AppError::FolderNotFound(path)) if path == missing
        ));
    }

    #[test]
    fn scan_directory_keeps_only_images() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("2.gif"), b"x").unwrap();
        fs::write(dir.path().join("1.webp"), b"x").unwrap();
        fs::write(dir.path().join("readme.md"), b"x").unwrap();

        let files = scan_directory(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("1.webp"), dir.path().join("2.gif")]
        );
    }

    #[test]
    fn unique_destination_never_reuses_existing_names() {
        let dir = tempdir().unwrap();
        let first = unique_destination(dir.path(), "capture", "jpg");
        assert_eq!(first, dir.path().join("capture.jpg"));

        fs::write(&first, b"x").unwrap();
        fs::write(dir.path().join("capture_1.jpg"), b"x").unwrap();
        assert_eq!(
            unique_destination(dir.path(), "capture", "jpg"),
            dir.path().join("capture_2.jpg")
        );
    }
}
