//! Application configuration constants.

use std::time::Duration;

/// Supported image file extensions for folder listings.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Tile colours for folder buttons and non-image file tiles.
pub const TILE_PALETTE: [&str; 6] = [
    "#3498db", "#1abc9c", "#f39c12", "#e74c3c", "#8e44ad", "#2ecc71",
];

/// Sub-directory of the gallery root that holds the working capture files.
pub const CAPTURE_DIR_NAME: &str = "images";
pub const CAPTURE_FILE_NAME: &str = "capture.png";
pub const PROCESSED_FILE_NAME: &str = "processed_image.jpg";

/// Prefix and extension of images saved into a folder.
pub const SAVED_FILE_PREFIX: &str = "capture";
pub const SAVED_FILE_EXTENSION: &str = "jpg";

pub const CAMERA_WIDTH: u32 = 960;
pub const CAMERA_HEIGHT: u32 = 480;
pub const CAMERA_FPS: u32 = 25;

/// Longest edge of a grid thumbnail in pixels.
pub const THUMBNAIL_SIZE: u32 = 160;
pub const THUMBNAIL_CACHE_CAPACITY: usize = 200;
pub const IMAGE_CACHE_CAPACITY: usize = 10;

pub const WATCH_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const WATCH_DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(500);
