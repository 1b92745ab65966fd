//! Camera access through nokhwa.
//!
//! The camera handle is not shared across threads: it is created, polled and
//! dropped on the UI thread. Only the search for a working device runs on
//! rayon. Frames are copied out as `RgbaImage`.

use crate::error::{AppError, Result};
use image::RgbaImage;
use log::{info, warn};
use nokhwa::{
    CallbackCamera, query,
    pixel_format::RgbAFormat,
    utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType, Resolution},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Anything that can hand out the most recent camera frame.
pub trait FrameSource {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn is_running(&self) -> bool;
    fn last_frame(&self) -> Result<RgbaImage>;
}

#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

pub fn init() {
    #[cfg(target_os = "macos")]
    nokhwa::nokhwa_initialize(|granted| {
        log::info!("Camera permission granted: {}", granted);
    });
}

fn requested_format() -> RequestedFormat<'static> {
    RequestedFormat::new::<RgbAFormat>(RequestedFormatType::AbsoluteHighestFrameRate)
}

fn verify_camera(index: CameraIndex) -> bool {
    match CallbackCamera::new(index, requested_format(), |_| {}) {
        Ok(mut camera) => match camera.open_stream() {
            Ok(_) => {
                _ = camera.stop_stream();
                true
            }
            Err(_) => false,
        },
        Err(_) => false,
    }
}

/// Returns the index of the first camera that can actually stream.
pub fn first_working_camera() -> Result<CameraIndex> {
    let cameras = query(ApiBackend::Auto)?;

    cameras
        .into_iter()
        .find(|camera| verify_camera(camera.index().clone()))
        .map(|camera| {
            info!("Using camera: {}", camera.human_name());
            camera.index().clone()
        })
        .ok_or_else(|| AppError::Camera("No camera available".to_string()))
}

/// Device probing started on rayon and collected later on the UI thread.
///
/// Opening every device to find a working one can take seconds, so it must
/// not run inside a UI callback.
pub struct PendingProbe<T> {
    slot: Arc<Mutex<Option<T>>>,
    in_flight: Arc<AtomicBool>,
}

impl<T: Send + 'static> PendingProbe<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs `probe` on rayon. Does nothing while a probe is running or its
    /// result has not been taken yet; returns whether a probe was started.
    pub fn start<F>(&self, probe: F) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self.has_result() || self.in_flight.swap(true, Ordering::AcqRel) {
            return false;
        }

        let slot = self.slot.clone();
        let in_flight = self.in_flight.clone();
        rayon::spawn(move || {
            let result = probe();
            if let Ok(mut slot) = slot.lock() {
                *slot = Some(result);
            }
            in_flight.store(false, Ordering::Release);
        });
        true
    }

    pub fn has_result(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    pub fn take(&self) -> Option<T> {
        self.slot.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl<T> Clone for PendingProbe<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<T: Send + 'static> Default for PendingProbe<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CameraClient {
    camera: CallbackCamera,
    running: bool,
}

impl CameraClient {
    pub fn new(index: CameraIndex, config: CameraConfig) -> Result<Self> {
        let mut camera = CallbackCamera::new(index, requested_format(), |_| {})?;

        if let Err(e) = camera.set_frame_rate(config.fps) {
            warn!("camera set frame rate ({}) failed: {e}", config.fps);
        }

        if let Err(e) = camera.set_resolution(Resolution::new(config.width, config.height)) {
            warn!(
                "camera set resolution ({} x {}) failed: {e}",
                config.width, config.height
            );
        }

        Ok(Self {
            camera,
            running: false,
        })
    }
}

impl FrameSource for CameraClient {
    fn start(&mut self) -> Result<()> {
        if !self.running {
            self.camera.open_stream()?;
            self.running = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.running {
            self.camera.stop_stream()?;
            self.running = false;
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn last_frame(&self) -> Result<RgbaImage> {
        if !self.running {
            return Err(AppError::Camera("Camera is paused".to_string()));
        }
        let frame = self.camera.last_frame()?.decode_image::<RgbAFormat>()?;
        if frame.is_empty() {
            return Err(AppError::Camera("No frame available".to_string()));
        }
        Ok(frame)
    }
}

impl Drop for CameraClient {
    fn drop(&mut self) {
        if self.running {
            _ = self.stop();
        }
    }
}
