//! Event handlers for UI callbacks.
//!
//! Sets up all Logic callbacks (screens, folders, fullscreen viewer, capture)
//! using the appropriate threading model for each operation type.

use crate::image_loader;
use crate::services::{CaptureService, FolderService, NavigationService};
use crate::state::{AppState, Screen};
use crate::ui::camera_view::CameraView;
use crate::ui::folder_view::{
    refresh_files, refresh_folders, stop_watching_folder, watch_folder, watch_root,
};
use crate::ui::image_display::load_and_display_image;
use crate::ui::{
    clear_error, folder_name_index, set_camera_stage, set_error_with_prefix, set_screen,
    set_status,
};
use log::{debug, warn};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::path::PathBuf;

/// Switches screens, keeping state, watchers and camera in step.
fn switch_screen(ui: &crate::AppWindow, state: &AppState, camera: &CameraView, next: Screen) {
    let previous = state.screens.lock().unwrap().current().clone();
    if previous == Screen::Camera && next != Screen::Camera {
        camera.close();
        state.capture.lock().unwrap().reset();
        set_camera_stage(ui, state.capture.lock().unwrap().stage());
    }

    {
        let mut screens = state.screens.lock().unwrap();
        match &next {
            Screen::Home => screens.go_home(),
            Screen::Folder(name) => screens.open_folder(name.clone()),
            Screen::Camera => screens.open_camera(),
        }
    }
    set_screen(ui, &next);

    let folders = FolderService::new(state.root.clone());
    match &next {
        Screen::Home => {
            stop_watching_folder(state);
            refresh_folders(ui.as_weak(), folders);
        }
        Screen::Folder(name) => {
            ui.global::<crate::ViewState>()
                .set_files(slint::ModelRc::default());
            refresh_files(
                ui.as_weak(),
                folders,
                state.thumbnail_cache.clone(),
                name.clone(),
            );
            watch_folder(ui.as_weak(), state, name);
        }
        Screen::Camera => {
            stop_watching_folder(state);
            let target = state
                .screens
                .lock()
                .unwrap()
                .last_folder()
                .and_then(|name| folder_name_index(ui, name))
                .unwrap_or(0);
            ui.global::<crate::ViewState>()
                .set_target_folder_index(target as i32);

            if let Err(e) = camera.open(ui) {
                set_error_with_prefix(ui, "Failed to open camera", e.to_string());
            }
        }
    }
}

/// Sets up all UI event handlers for the application.
///
/// Takes the UI handle and shared application state, then registers
/// callbacks for screens, folders, the fullscreen viewer and capture.
pub fn setup_handlers(ui: &crate::AppWindow, state: AppState) {
    let camera = CameraView::new();
    setup_screen_handlers(ui, &state, &camera);
    setup_folder_handlers(ui, &state);
    setup_viewer_handlers(ui, &state);
    setup_capture_handlers(ui, &state, &camera);

    ui.global::<crate::Logic>().on_dismiss_error({
        let ui_handle = ui.as_weak();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                clear_error(&ui);
            }
        }
    });
}

fn setup_screen_handlers(ui: &crate::AppWindow, state: &AppState, camera: &CameraView) {
    ui.global::<crate::Logic>().on_go_home({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        let camera = camera.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                switch_screen(&ui, &state, &camera, Screen::Home);
            }
        }
    });

    ui.global::<crate::Logic>().on_open_folder({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        let camera = camera.clone();
        move |name| {
            if let Some(ui) = ui_handle.upgrade() {
                switch_screen(&ui, &state, &camera, Screen::Folder(name.to_string()));
            }
        }
    });

    ui.global::<crate::Logic>().on_open_camera({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        let camera = camera.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                switch_screen(&ui, &state, &camera, Screen::Camera);
            }
        }
    });
}

fn setup_folder_handlers(ui: &crate::AppWindow, state: &AppState) {
    ui.global::<crate::Logic>().on_show_add_folder({
        let ui_handle = ui.as_weak();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                ui.global::<crate::ViewState>().set_add_folder_open(true);
            }
        }
    });

    ui.global::<crate::Logic>().on_hide_add_folder({
        let ui_handle = ui.as_weak();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                ui.global::<crate::ViewState>().set_add_folder_open(false);
            }
        }
    });

    ui.global::<crate::Logic>().on_add_folder({
        let ui_handle = ui.as_weak();
        let folders = FolderService::new(state.root.clone());
        move |name| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            // Popup stays open on failure so the name can be corrected.
            match folders.create_folder(&name) {
                Ok(_) => {
                    clear_error(&ui);
                    ui.global::<crate::ViewState>().set_add_folder_open(false);
                    set_status(&ui, format!("Folder '{}' created", name.trim()));
                    refresh_folders(ui.as_weak(), folders.clone());
                }
                Err(e) => set_error_with_prefix(&ui, "Failed to add folder", e.to_string()),
            }
        }
    });

    // Folder dialog
    // Uses slint::spawn_local because AsyncFileDialog must run on the main thread
    ui.global::<crate::Logic>().on_pick_root({
        let ui_handle = ui.as_weak();
        let state = state.clone();
        move || {
            let ui_handle = ui_handle.clone();
            let state = state.clone();
            let _ = slint::spawn_local(async move {
                // AsyncFileDialogはメインスレッドで実行する必要があるのでrayon禁止。
                let Some(folder) = AsyncFileDialog::new().pick_folder().await else {
                    return;
                };

                let folders = FolderService::new(state.root.clone());
                folders.set_root(folder.path().to_path_buf());
                refresh_folders(ui_handle.clone(), folders);
                watch_root(ui_handle, &state);
            });
        }
    });
}

fn setup_viewer_handlers(ui: &crate::AppWindow, state: &AppState) {
    let navigation = NavigationService::new(state.navigation.clone());

    ui.global::<crate::Logic>().on_open_image({
        let ui_handle = ui.as_weak();
        let navigation = navigation.clone();
        let cache = state.image_cache.clone();
        move |path| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            ui.global::<crate::ViewState>().set_fullscreen_open(true);

            // フォルダスキャンはrayonで別スレッド実行
            let path = PathBuf::from(path.as_str());
            let ui_handle = ui_handle.clone();
            let navigation = navigation.clone();
            let cache = cache.clone();
            rayon::spawn(move || {
                let opened = navigation.open(path.clone());

                let _ = slint::invoke_from_event_loop(move || match opened {
                    Ok(_) => load_and_display_image(
                        ui_handle,
                        path,
                        "Failed to load image".to_string(),
                        navigation,
                        cache,
                    ),
                    Err(e) => {
                        if let Some(ui) = ui_handle.upgrade() {
                            ui.global::<crate::ViewState>().set_fullscreen_open(false);
                            set_error_with_prefix(&ui, "Failed to open image", e.to_string());
                        }
                    }
                });
            });
        }
    });

    ui.global::<crate::Logic>().on_close_fullscreen({
        let ui_handle = ui.as_weak();
        let navigation = navigation.clone();
        move || {
            navigation.close();
            if let Some(ui) = ui_handle.upgrade() {
                let view_state = ui.global::<crate::ViewState>();
                view_state.set_fullscreen_open(false);
                view_state.set_fullscreen_loaded(false);
                view_state.set_fullscreen_image(slint::Image::default());
            }
        }
    });

    // Next image handler
    ui.global::<crate::Logic>().on_next_image({
        let ui_handle = ui.as_weak();
        let navigation = navigation.clone();
        let cache = state.image_cache.clone();
        move || {
            if let Some(path) = navigation.next() {
                load_and_display_image(
                    ui_handle.clone(),
                    path,
                    "Failed to load next image".to_string(),
                    navigation.clone(),
                    cache.clone(),
                );
            }
        }
    });

    // Previous image handler
    ui.global::<crate::Logic>().on_prev_image({
        let ui_handle = ui.as_weak();
        let navigation = navigation.clone();
        let cache = state.image_cache.clone();
        move || {
            if let Some(path) = navigation.previous() {
                load_and_display_image(
                    ui_handle.clone(),
                    path,
                    "Failed to load previous image".to_string(),
                    navigation.clone(),
                    cache.clone(),
                );
            }
        }
    });
}

fn setup_capture_handlers(ui: &crate::AppWindow, state: &AppState, camera: &CameraView) {
    let captures = CaptureService::new(FolderService::new(state.root.clone()));

    ui.global::<crate::Logic>().on_toggle_preview({
        let ui_handle = ui.as_weak();
        let session = state.capture.clone();
        let camera = camera.clone();
        move || {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let stage = match session.lock().unwrap().toggle_preview() {
                Ok(stage) => stage,
                Err(e) => {
                    warn!("{}", e);
                    return;
                }
            };
            if let Err(e) = camera.set_paused(stage == crate::state::CaptureStage::Paused) {
                set_error_with_prefix(&ui, "Failed to toggle camera", e.to_string());
            }
            set_camera_stage(&ui, stage);
        }
    });

    ui.global::<crate::Logic>().on_capture({
        let ui_handle = ui.as_weak();
        let session = state.capture.clone();
        let camera = camera.clone();
        let captures = captures.clone();
        move || {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let generation = match session.lock().unwrap().begin_capture() {
                Ok(generation) => generation,
                Err(e) => {
                    warn!("{}", e);
                    return;
                }
            };

            let frame = match camera.grab_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    let _ = session.lock().unwrap().fail_processing(generation);
                    set_error_with_prefix(&ui, "Failed to capture image", e.to_string());
                    return;
                }
            };
            set_camera_stage(&ui, session.lock().unwrap().stage());

            // 保存と変換はrayonで別スレッド実行
            let ui_handle = ui_handle.clone();
            let session = session.clone();
            let captures = captures.clone();
            rayon::spawn(move || {
                let still_wanted = {
                    let session = session.clone();
                    move || {
                        session
                            .lock()
                            .map(|s| s.is_current(generation))
                            .unwrap_or(false)
                    }
                };
                let result = captures
                    .store_and_process(&frame, still_wanted)
                    .and_then(|path| {
                        image_loader::load_image_blocking(&path).map(|image| (path, image))
                    });

                let _ = slint::invoke_from_event_loop(move || {
                    let Some(ui) = ui_handle.upgrade() else {
                        return;
                    };
                    let mut session = session.lock().unwrap();
                    if !session.is_current(generation) {
                        debug!("Dropping result of superseded capture {}", generation);
                        return;
                    }
                    match result {
                        Ok((path, (data, width, height))) => {
                            if let Err(e) = session.finish_processing(generation, path) {
                                warn!("{}", e);
                                return;
                            }
                            ui.global::<crate::ViewState>().set_result_image(
                                image_loader::create_slint_image(data, width, height),
                            );
                        }
                        Err(e) => {
                            let _ = session.fail_processing(generation);
                            set_error_with_prefix(&ui, "Failed to process image", e.to_string());
                        }
                    }
                    set_camera_stage(&ui, session.stage());
                });
            });
        }
    });

    ui.global::<crate::Logic>().on_cancel_capture({
        let ui_handle = ui.as_weak();
        let session = state.capture.clone();
        move || {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let mut session = session.lock().unwrap();
            if let Err(e) = session.cancel() {
                warn!("{}", e);
            }
            set_camera_stage(&ui, session.stage());
        }
    });

    ui.global::<crate::Logic>().on_save_and_next({
        let ui_handle = ui.as_weak();
        let session = state.capture.clone();
        let captures = captures.clone();
        move |folder| {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            if folder.is_empty() {
                set_error_with_prefix(
                    &ui,
                    "Failed to save image",
                    "Create a folder first".to_string(),
                );
                return;
            }
            // Repeated presses are refused until this copy finishes.
            let result_path = match session.lock().unwrap().begin_save() {
                Ok(path) => path,
                Err(e) => {
                    warn!("{}", e);
                    return;
                }
            };

            let ui_handle = ui_handle.clone();
            let session = session.clone();
            let captures = captures.clone();
            let folder = folder.to_string();
            rayon::spawn(move || {
                let result = captures.save_to_folder(&result_path, &folder);

                let _ = slint::invoke_from_event_loop(move || {
                    let Some(ui) = ui_handle.upgrade() else {
                        return;
                    };
                    match result {
                        Ok(saved) => {
                            let mut session = session.lock().unwrap();
                            if let Err(e) = session.finish_save() {
                                warn!("{}", e);
                            }
                            set_camera_stage(&ui, session.stage());
                            let name = saved
                                .file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or_default();
                            set_status(&ui, format!("Saved {} to '{}'", name, folder));
                        }
                        Err(e) => {
                            session.lock().unwrap().fail_save();
                            set_error_with_prefix(&ui, "Failed to save image", e.to_string());
                        }
                    }
                });
            });
        }
    });
}
