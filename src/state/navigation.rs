//! Fullscreen viewer position within the open folder's images.

use crate::error::Result;
use crate::file_utils;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Direction for navigation through images.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

/// Manages the image list of a folder and the image currently shown fullscreen.
#[derive(Default)]
pub struct NavigationState {
    image_files: Vec<PathBuf>,
    current_file_path: Option<PathBuf>,
}

impl NavigationState {
    /// Creates a new empty navigation state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigates to an image in the specified direction.
    fn navigate_to(&mut self, direction: Direction) -> Option<PathBuf> {
        if self.image_files.is_empty() {
            warn!("No images available for navigation");
            return None;
        }

        let current_index = self.current_index()?;

        let new_index = match direction {
            Direction::Next => {
                if current_index + 1 < self.image_files.len() {
                    current_index + 1
                } else {
                    warn!("No next image available");
                    return None;
                }
            }
            Direction::Previous => {
                if current_index > 0 {
                    current_index - 1
                } else {
                    warn!("No previous image available");
                    return None;
                }
            }
        };

        let path = self.image_files[new_index].clone();
        self.current_file_path = Some(path.clone());
        Some(path)
    }

    /// Moves to the next image and returns its path, if there is one.
    pub fn next_image(&mut self) -> Option<PathBuf> {
        self.navigate_to(Direction::Next)
    }

    /// Moves to the previous image and returns its path, if there is one.
    pub fn prev_image(&mut self) -> Option<PathBuf> {
        self.navigate_to(Direction::Previous)
    }

    /// Scans the parent directory of `file_path` and makes it the current image.
    pub fn open(&mut self, file_path: PathBuf) -> Result<()> {
        let start = std::time::Instant::now();
        debug!("Starting directory update for: {:?}", file_path);

        if let Some(parent) = file_path.parent() {
            self.image_files = file_utils::scan_directory(parent)?;
            self.current_file_path = Some(file_path.clone());
        }

        debug!(
            "Completed directory update for {:?} in {:?}",
            file_path,
            start.elapsed()
        );
        Ok(())
    }

    /// Forgets the folder, e.g. when the fullscreen view is closed.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    fn find_file_index(&self, file_path: &Path) -> Option<usize> {
        self.image_files.iter().position(|p| p == file_path)
    }

    /// Zero-based position of the current image.
    pub fn current_index(&self) -> Option<usize> {
        self.find_file_index(self.current_file_path.as_deref()?)
    }

    pub fn image_count(&self) -> usize {
        self.image_files.len()
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_file_path.clone()
    }

    /// Returns the path to the next image without changing the current file path.
    pub fn peek_next_image(&self) -> Option<PathBuf> {
        let current_index = self.current_index()?;
        self.image_files.get(current_index + 1).cloned()
    }

    /// Returns the path to the previous image without changing the current file path.
    pub fn peek_prev_image(&self) -> Option<PathBuf> {
        let current_index = self.current_index()?;
        current_index
            .checked_sub(1)
            .and_then(|index| self.image_files.get(index).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn folder_with_images() -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempdir().unwrap();
        let paths: Vec<PathBuf> = ["a.png", "b.jpg", "c.gif"]
            .iter()
            .map(|name| dir.path().join(name))
            .collect();
        for path in &paths {
            fs::write(path, b"x").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        (dir, paths)
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let (_dir, paths) = folder_with_images();
        let mut nav = NavigationState::new();
        nav.open(paths[0].clone()).unwrap();
        assert_eq!(nav.image_count(), 3);

        assert_eq!(nav.prev_image(), None);
        assert_eq!(nav.current_path(), Some(paths[0].clone()));

        assert_eq!(nav.next_image(), Some(paths[1].clone()));
        assert_eq!(nav.next_image(), Some(paths[2].clone()));
        assert_eq!(nav.next_image(), None);
        assert_eq!(nav.current_index(), Some(2));
    }

    #[test]
    fn peeking_does_not_move() {
        let (_dir, paths) = folder_with_images();
        let mut nav = NavigationState::new();
        nav.open(paths[1].clone()).unwrap();

        assert_eq!(nav.peek_next_image(), Some(paths[2].clone()));
        assert_eq!(nav.peek_prev_image(), Some(paths[0].clone()));
        assert_eq!(nav.current_path(), Some(paths[1].clone()));
    }

    #[test]
    fn close_forgets_everything() {
        let (_dir, paths) = folder_with_images();
        let mut nav = NavigationState::new();
        nav.open(paths[0].clone()).unwrap();
        nav.close();
        assert_eq!(nav.image_count(), 0);
        assert_eq!(nav.next_image(), None);
        assert!(nav.current_path().is_none());
    }
}
