//! Folder list and file grid population.
//!
//! Listings and thumbnail decoding run on rayon; models are built on the UI
//! thread via `slint::invoke_from_event_loop`.

use crate::config::THUMBNAIL_SIZE;
use crate::error::Result;
use crate::file_utils::{EntryKind, FolderEntry};
use crate::image_cache::{CachedImage, ImageCache};
use crate::image_loader;
use crate::services::auto_reload_service::DirectoryDebouncer;
use crate::services::{AutoReloadService, FolderService};
use crate::state::AppState;
use crate::ui::{set_error_with_prefix, set_folders, tile_color};
use log::{debug, warn};
use slint::{ComponentHandle, Model, ModelRc, VecModel};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Re-reads the folder list under the root and updates the home screen.
pub fn refresh_folders(ui: slint::Weak<crate::AppWindow>, folders: FolderService) {
    rayon::spawn(move || {
        let root = folders.root();
        let result = folders.list_folders();

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui) = ui.upgrade() else {
                return;
            };
            ui.global::<crate::ViewState>()
                .set_root_directory(root.display().to_string().into());
            match result {
                Ok(names) => set_folders(&ui, &names),
                Err(e) => {
                    set_folders(&ui, &[]);
                    set_error_with_prefix(&ui, "Failed to list folders", e.to_string());
                }
            }
        });
    });
}

fn file_item(entry: &FolderEntry) -> crate::FileItem {
    crate::FileItem {
        name: entry.name.as_str().into(),
        path: entry.path.to_string_lossy().as_ref().into(),
        is_image: entry.kind == EntryKind::Image,
        thumbnail: slint::Image::default(),
        thumbnail_loaded: false,
        tint: tile_color(&entry.name),
    }
}

/// Re-reads a folder's files and updates the grid, then fills in thumbnails.
pub fn refresh_files(
    ui: slint::Weak<crate::AppWindow>,
    folders: FolderService,
    thumbnails: Arc<Mutex<ImageCache>>,
    name: String,
) {
    rayon::spawn(move || {
        let result = folders.list_entries(&name);

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui) = ui.upgrade() else {
                return;
            };
            let view_state = ui.global::<crate::ViewState>();
            if view_state.get_current_folder().as_str() != name {
                debug!("Dropping stale listing for '{}'", name);
                return;
            }

            match result {
                Ok(entries) => {
                    let items: Vec<crate::FileItem> = entries.iter().map(file_item).collect();
                    view_state.set_files(ModelRc::new(VecModel::from(items)));

                    for entry in entries.into_iter().filter(|e| e.kind == EntryKind::Image) {
                        load_thumbnail(ui.as_weak(), entry.path, thumbnails.clone());
                    }
                }
                Err(e) => {
                    view_state.set_files(ModelRc::new(VecModel::<crate::FileItem>::default()));
                    set_error_with_prefix(&ui, "Failed to list files", e.to_string());
                }
            }
        });
    });
}

/// Writes a decoded thumbnail into the grid row showing `path`, if still present.
fn apply_thumbnail(ui: &crate::AppWindow, path: &str, thumbnail: CachedImage) {
    let files = ui.global::<crate::ViewState>().get_files();
    let row = (0..files.row_count())
        .find(|row| files.row_data(*row).is_some_and(|item| item.path.as_str() == path));

    if let Some(row) = row
        && let Some(mut item) = files.row_data(row)
    {
        item.thumbnail =
            image_loader::create_slint_image(thumbnail.data, thumbnail.width, thumbnail.height);
        item.thumbnail_loaded = true;
        files.set_row_data(row, item);
    }
}

fn load_thumbnail(
    ui: slint::Weak<crate::AppWindow>,
    path: PathBuf,
    thumbnails: Arc<Mutex<ImageCache>>,
) {
    let path_key = path.to_string_lossy().into_owned();
    let cached = thumbnails.lock().ok().and_then(|mut c| c.get(&path));

    if let Some(thumbnail) = cached {
        if let Some(ui) = ui.upgrade() {
            apply_thumbnail(&ui, &path_key, thumbnail);
        }
        return;
    }

    rayon::spawn(move || {
        let thumbnail = match image_loader::load_thumbnail_blocking(&path, THUMBNAIL_SIZE) {
            Ok((data, width, height)) => CachedImage::new(data, width, height),
            Err(e) => {
                // Leave the name tile in place.
                warn!("Thumbnail failed for {}: {}", path.display(), e);
                return;
            }
        };

        if let Ok(mut cache) = thumbnails.lock() {
            cache.put(path, thumbnail.clone());
        }

        let _ = slint::invoke_from_event_loop(move || {
            if let Some(ui) = ui.upgrade() {
                apply_thumbnail(&ui, &path_key, thumbnail);
            }
        });
    });
}

/// Watches the root so the folder list follows the filesystem.
pub fn watch_root(ui: slint::Weak<crate::AppWindow>, state: &AppState) {
    let folders = FolderService::new(state.root.clone());
    let root = folders.root();

    let watcher = AutoReloadService::watch(&root, {
        let folders = folders.clone();
        move || refresh_folders(ui.clone(), folders.clone())
    });

    store_watcher(&state.root_watcher, watcher, "root");
}

/// Watches an open folder so its grid follows the filesystem.
pub fn watch_folder(ui: slint::Weak<crate::AppWindow>, state: &AppState, name: &str) {
    let folders = FolderService::new(state.root.clone());
    let path = match folders.folder_path(name) {
        Ok(path) => path,
        Err(e) => {
            warn!("Not watching folder '{}': {}", name, e);
            return;
        }
    };

    let thumbnails = state.thumbnail_cache.clone();
    let name = name.to_string();
    let watcher = AutoReloadService::watch(&path, move || {
        refresh_files(ui.clone(), folders.clone(), thumbnails.clone(), name.clone())
    });

    store_watcher(&state.folder_watcher, watcher, "folder");
}

pub fn stop_watching_folder(state: &AppState) {
    if let Ok(mut slot) = state.folder_watcher.lock() {
        *slot = None;
    }
}

fn store_watcher(
    slot: &Arc<Mutex<Option<DirectoryDebouncer>>>,
    watcher: Result<DirectoryDebouncer>,
    label: &str,
) {
    match watcher {
        Ok(debouncer) => {
            if let Ok(mut slot) = slot.lock() {
                *slot = Some(debouncer);
            }
        }
        Err(e) => warn!("Auto-reload disabled for {}: {}", label, e),
    }
}
