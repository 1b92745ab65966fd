//! Service for fullscreen image navigation.
//!
//! Provides high-level navigation methods over the shared NavigationState.

use crate::error::{AppError, Result};
use crate::state::NavigationState;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Position of the shown image as (zero-based index, total).
pub type Position = (usize, usize);

/// Service for managing fullscreen navigation.
#[derive(Clone)]
pub struct NavigationService {
    navigation: Arc<Mutex<NavigationState>>,
}

impl NavigationService {
    /// Creates a new navigation service.
    pub fn new(navigation: Arc<Mutex<NavigationState>>) -> Self {
        Self { navigation }
    }

    /// Opens a specific image and loads its folder's image list.
    pub fn open(&self, path: PathBuf) -> Result<Position> {
        let mut nav_state = self.navigation.lock().unwrap();
        nav_state.open(path)?;
        Self::position_of(&nav_state)
    }

    /// Navigates to the next image and returns its path.
    pub fn next(&self) -> Option<PathBuf> {
        self.navigation.lock().unwrap().next_image()
    }

    /// Navigates to the previous image and returns its path.
    pub fn previous(&self) -> Option<PathBuf> {
        self.navigation.lock().unwrap().prev_image()
    }

    pub fn close(&self) {
        self.navigation.lock().unwrap().close();
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.navigation.lock().unwrap().current_path()
    }

    pub fn position(&self) -> Result<Position> {
        Self::position_of(&self.navigation.lock().unwrap())
    }

    /// Neighbours worth preloading.
    pub fn adjacent(&self) -> Vec<PathBuf> {
        let nav_state = self.navigation.lock().unwrap();
        [nav_state.peek_next_image(), nav_state.peek_prev_image()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn position_of(nav_state: &NavigationState) -> Result<Position> {
        nav_state
            .current_index()
            .map(|index| (index, nav_state.image_count()))
            .ok_or_else(|| AppError::ImageLoad("Image is not in its folder listing".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn open_reports_position_and_neighbours() {
        let dir = tempdir().unwrap();
        for name in ["1.png", "2.png", "3.png"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let service = NavigationService::new(Arc::new(Mutex::new(NavigationState::new())));

        assert_eq!(service.open(dir.path().join("2.png")).unwrap(), (1, 3));
        assert_eq!(service.adjacent().len(), 2);

        assert_eq!(service.next(), Some(dir.path().join("3.png")));
        assert_eq!(service.position().unwrap(), (2, 3));
        assert_eq!(service.adjacent(), vec![dir.path().join("2.png")]);
    }

    #[test]
    fn opening_a_non_image_has_no_position() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("doc.txt"), b"x").unwrap();
        let service = NavigationService::new(Arc::new(Mutex::new(NavigationState::new())));

        assert!(service.open(dir.path().join("doc.txt")).is_err());
    }
}
