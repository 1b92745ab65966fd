//! Camera preview on the camera screen.
//!
//! nokhwaのカメラハンドルはSendではないので、すべてUIスレッド上で扱う。
//! The device search runs on rayon; a repeated `slint::Timer` picks up its
//! result, opens the camera, and copies the latest frame into `camera-frame`
//! while the capture stage is `Preview`.

use crate::camera::{self, CameraClient, CameraConfig, FrameSource, PendingProbe};
use crate::config::{CAMERA_FPS, CAMERA_HEIGHT, CAMERA_WIDTH};
use crate::error::{AppError, Result};
use crate::image_loader;
use crate::services::CaptureService;
use crate::ui::set_error_with_prefix;
use image::RgbaImage;
use log::{info, warn};
use nokhwa::utils::CameraIndex;
use slint::{ComponentHandle, Timer, TimerMode};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone)]
pub struct CameraView {
    camera: Rc<RefCell<Option<CameraClient>>>,
    preview_timer: Rc<Timer>,
    probe: PendingProbe<Result<CameraIndex>>,
}

fn connect(index: CameraIndex) -> Result<CameraClient> {
    let config = CameraConfig {
        width: CAMERA_WIDTH,
        height: CAMERA_HEIGHT,
        fps: CAMERA_FPS,
    };
    let mut client = CameraClient::new(index, config)?;
    client.start()?;
    Ok(client)
}

impl CameraView {
    pub fn new() -> Self {
        Self {
            camera: Rc::new(RefCell::new(None)),
            preview_timer: Rc::new(Timer::default()),
            probe: PendingProbe::new(),
        }
    }

    /// Starts the preview timer and, without a camera yet, the device search.
    pub fn open(&self, ui: &crate::AppWindow) -> Result<()> {
        let view_state = ui.global::<crate::ViewState>();
        let result = match self.camera.borrow_mut().as_mut() {
            Some(client) => client.start(),
            None => {
                view_state.set_camera_searching(true);
                if self.probe.start(camera::first_working_camera) {
                    info!("Looking for a camera");
                }
                Ok(())
            }
        };
        view_state.set_camera_available(result.is_ok() && self.camera.borrow().is_some());
        self.start_preview(ui);
        result
    }

    fn start_preview(&self, ui: &crate::AppWindow) {
        let ui_handle = ui.as_weak();
        let camera = self.camera.clone();
        let probe = self.probe.clone();

        self.preview_timer.start(
            TimerMode::Repeated,
            Duration::from_millis(1000 / CAMERA_FPS as u64),
            move || {
                let Some(ui) = ui_handle.upgrade() else {
                    return;
                };
                let view_state = ui.global::<crate::ViewState>();

                let waiting_for_camera = camera.borrow().is_none();
                if waiting_for_camera && let Some(found) = probe.take() {
                    view_state.set_camera_searching(false);
                    match found.and_then(connect) {
                        Ok(client) => {
                            *camera.borrow_mut() = Some(client);
                            view_state.set_camera_available(true);
                        }
                        Err(e) => set_error_with_prefix(&ui, "Failed to open camera", e.to_string()),
                    }
                }

                if view_state.get_camera_stage() != crate::CameraStage::Preview {
                    return;
                }
                // Frames are not always ready; the next tick retries.
                if let Some(client) = camera.borrow().as_ref()
                    && let Ok(frame) = client.last_frame()
                {
                    view_state.set_camera_frame(image_loader::create_slint_image_rgba(&frame));
                }
            },
        );
    }

    /// Stops the preview and releases the camera device.
    pub fn close(&self) {
        self.preview_timer.stop();
        if self.camera.borrow_mut().take().is_some() {
            info!("Camera released");
        }
    }

    /// Stops or restarts the stream, following the flashlight toggle.
    pub fn set_paused(&self, paused: bool) -> Result<()> {
        let mut camera = self.camera.borrow_mut();
        let Some(client) = camera.as_mut() else {
            warn!("Toggle without an open camera");
            return Ok(());
        };
        if paused { client.stop() } else { client.start() }
    }

    pub fn grab_frame(&self) -> Result<RgbaImage> {
        match self.camera.borrow().as_ref() {
            Some(client) => CaptureService::grab_frame(client),
            None => Err(AppError::Camera("No camera available".to_string())),
        }
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self::new()
    }
}
