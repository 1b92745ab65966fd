use i_slint_backend_winit::WinitWindowAccessor;
use i_slint_backend_winit::{EventResult, winit::event::WindowEvent};
use log::{info, warn};
use slint::ComponentHandle;
use std::path::PathBuf;

use crate::file_utils::{self, PathExt};
use crate::services::FolderService;
use crate::state::AppState;
use crate::ui::folder_view::{refresh_folders, watch_root};

/// First non-flag argument, if it names a directory.
fn root_from_args<I>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = std::ffi::OsString>,
{
    let candidate = args
        .into_iter()
        .skip(1)
        .find(|arg| !arg.to_string_lossy().starts_with('-'))
        .map(PathBuf::from)?;

    if candidate.is_dir() {
        Some(candidate)
    } else {
        warn!(
            "Ignoring {}: not a directory",
            candidate.as_path().format_for_log()
        );
        None
    }
}

/// Gallery root: the command-line directory, else the working directory.
pub fn startup_root() -> PathBuf {
    let root = root_from_args(std::env::args_os())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::canonicalize(&root).unwrap_or(root)
}

/// Copies image files dropped on the window into the open folder.
fn setup_platform_window_hooks(app: &crate::AppWindow, app_state: &AppState) {
    let ui_handle = app.as_weak();
    let screens = app_state.screens.clone();
    let folders = FolderService::new(app_state.root.clone());

    app.window().on_winit_window_event(move |_window, event| {
        if let WindowEvent::DroppedFile(path) = event {
            let open_folder = screens
                .lock()
                .ok()
                .and_then(|s| s.open_folder_name().map(str::to_string));

            match open_folder {
                Some(folder) if file_utils::is_supported_image(path) => {
                    let path = path.clone();
                    let folders = folders.clone();
                    let ui_handle = ui_handle.clone();
                    rayon::spawn(move || {
                        if let Err(e) = folders.import_file(&folder, &path) {
                            let _ = slint::invoke_from_event_loop(move || {
                                if let Some(ui) = ui_handle.upgrade() {
                                    crate::ui::set_error_with_prefix(
                                        &ui,
                                        "Failed to import dropped file",
                                        e.to_string(),
                                    );
                                }
                            });
                        }
                    });
                }
                Some(_) => info!("Ignoring dropped non-image {}", path.format_for_log()),
                None => info!("Open a folder to import {}", path.format_for_log()),
            }
        }

        EventResult::Propagate
    });
}

pub fn configure_startup(app: &crate::AppWindow, app_state: &AppState) {
    setup_platform_window_hooks(app, app_state);

    let folders = FolderService::new(app_state.root.clone());
    info!("Gallery root: {}", folders.root().format_for_log());
    refresh_folders(app.as_weak(), folders);
    watch_root(app.as_weak(), app_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::tempdir;

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn flags_are_skipped_and_directory_is_used() {
        let dir = tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().into_owned();
        assert_eq!(
            root_from_args(args(&["app", "--verbose", &dir_arg])),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn non_directory_argument_is_ignored() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("photo.png");
        std::fs::write(&file, b"x").unwrap();
        let file_arg = file.to_string_lossy().into_owned();

        assert_eq!(root_from_args(args(&["app", &file_arg])), None);
        assert_eq!(root_from_args(args(&["app"])), None);
    }
}
