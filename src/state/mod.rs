//! State management for the gallery application.

use crate::config::{IMAGE_CACHE_CAPACITY, THUMBNAIL_CACHE_CAPACITY};
use crate::image_cache::ImageCache;
use crate::services::auto_reload_service::DirectoryDebouncer;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub mod capture;
pub mod navigation;
pub mod screen;

pub use capture::{CaptureSession, CaptureStage};
pub use navigation::NavigationState;
pub use screen::{Screen, ScreenState};

/// Application-wide state container.
///
/// Everything here may be touched from rayon workers. The camera handle and
/// preview timer are UI-thread only and live in `ui::camera_view`.
#[derive(Clone)]
pub struct AppState {
    /// Gallery root whose sub-directories are the folders.
    pub root: Arc<Mutex<PathBuf>>,
    pub screens: Arc<Mutex<ScreenState>>,
    /// Fullscreen viewer position.
    pub navigation: Arc<Mutex<NavigationState>>,
    pub capture: Arc<Mutex<CaptureSession>>,
    /// LRU cache for full-size decoded images.
    pub image_cache: Arc<Mutex<ImageCache>>,
    /// LRU cache for grid thumbnails.
    pub thumbnail_cache: Arc<Mutex<ImageCache>>,
    /// Watches the root for folders being added or removed.
    pub root_watcher: Arc<Mutex<Option<DirectoryDebouncer>>>,
    /// Watches the open folder for files being added or removed.
    pub folder_watcher: Arc<Mutex<Option<DirectoryDebouncer>>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(Mutex::new(root)),
            screens: Arc::new(Mutex::new(ScreenState::new())),
            navigation: Arc::new(Mutex::new(NavigationState::new())),
            capture: Arc::new(Mutex::new(CaptureSession::new())),
            image_cache: Arc::new(Mutex::new(ImageCache::new(IMAGE_CACHE_CAPACITY))),
            thumbnail_cache: Arc::new(Mutex::new(ImageCache::new(THUMBNAIL_CACHE_CAPACITY))),
            root_watcher: Arc::new(Mutex::new(None)),
            folder_watcher: Arc::new(Mutex::new(None)),
        }
    }
}
