//! Service for the capture → process → save pipeline.

use crate::camera::FrameSource;
use crate::config::{
    CAPTURE_DIR_NAME, CAPTURE_FILE_NAME, PROCESSED_FILE_NAME, SAVED_FILE_EXTENSION,
    SAVED_FILE_PREFIX,
};
use crate::error::{AppError, Result};
use crate::file_utils::{self, PathExt};
use crate::image_processing;
use crate::services::FolderService;
use image::RgbaImage;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct CaptureService {
    folders: FolderService,
    /// Held while the fixed capture files are written.
    write_lock: Arc<Mutex<()>>,
}

impl CaptureService {
    pub fn new(folders: FolderService) -> Self {
        Self {
            folders,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Working directory for capture files, created on demand.
    fn capture_dir(&self) -> Result<PathBuf> {
        let dir = self.folders.root().join(CAPTURE_DIR_NAME);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Takes the latest frame from a running camera.
    pub fn grab_frame(source: &dyn FrameSource) -> Result<RgbaImage> {
        if !source.is_running() {
            return Err(AppError::Camera("Camera is not running".to_string()));
        }
        source.last_frame()
    }

    /// Writes the frame to the capture file and returns the processed image path.
    ///
    /// `still_wanted` is checked once the capture files are locked; a capture
    /// that has been superseded in the meantime writes nothing.
    /// ブロッキング処理。rayonスレッドから呼ぶこと。
    pub fn store_and_process<F>(&self, frame: &RgbaImage, still_wanted: F) -> Result<PathBuf>
    where
        F: Fn() -> bool,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AppError::Processing("capture lock poisoned".to_string()))?;
        if !still_wanted() {
            return Err(AppError::InvalidState("capture was superseded".to_string()));
        }

        let dir = self.capture_dir()?;
        let capture_path = dir.join(CAPTURE_FILE_NAME);
        frame.save(&capture_path)?;
        info!("Captured frame to {}", capture_path.format_for_log());

        image_processing::process_image(&capture_path, &dir.join(PROCESSED_FILE_NAME))
    }

    /// Copies the processed image into a folder under a timestamped name.
    pub fn save_to_folder(&self, result_path: &Path, folder: &str) -> Result<PathBuf> {
        let folder_path = self.folders.folder_path(folder)?;
        if !folder_path.is_dir() {
            return Err(AppError::FolderNotFound(folder_path));
        }

        let stem = format!(
            "{}_{}",
            SAVED_FILE_PREFIX,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let destination =
            file_utils::unique_destination(&folder_path, &stem, SAVED_FILE_EXTENSION);
        fs::copy(result_path, &destination)?;
        info!("Saved capture to {}", destination.format_for_log());
        Ok(destination)
    }
}
