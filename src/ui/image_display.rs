//! Fullscreen image loading and display logic.
//!
//! Uses `rayon::spawn` for CPU-intensive image decoding operations,
//! then `slint::invoke_from_event_loop` to update UI from the background thread.

use crate::{
    image_cache::{CachedImage, ImageCache},
    image_loader,
    services::NavigationService,
    ui::{set_error_with_prefix, set_fullscreen_position},
};
use slint::ComponentHandle;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Updates the UI state with a decoded image and its position in the folder.
fn update_ui_state(
    ui: &crate::AppWindow,
    image: CachedImage,
    path: &Path,
    navigation: &NavigationService,
) {
    let view_state = ui.global::<crate::ViewState>();
    // The user may have moved on while this image was decoding.
    if !view_state.get_fullscreen_open() {
        return;
    }

    view_state.set_fullscreen_image(image_loader::create_slint_image(
        image.data,
        image.width,
        image.height,
    ));
    view_state.set_fullscreen_loaded(true);

    if let Ok((index, total)) = navigation.position() {
        set_fullscreen_position(ui, &file_name(path), index, total);
    }
}

/// Loads an image in a background thread and shows it fullscreen.
///
/// This function:
/// 1. Checks the cache first for instant display
/// 2. If cache miss, spawns a rayon thread to decode the image (CPU-intensive)
/// 3. Uses invoke_from_event_loop to return to the UI thread
/// 4. Updates ViewState with the loaded image or error message
pub fn load_and_display_image(
    ui: slint::Weak<crate::AppWindow>,
    path: PathBuf,
    error_prefix: String,
    navigation: NavigationService,
    cache: Arc<Mutex<ImageCache>>,
) {
    if let Some(ui) = ui.upgrade() {
        ui.global::<crate::ViewState>().set_fullscreen_loaded(false);
    }

    // Check cache first
    let cached = cache.lock().ok().and_then(|mut c| c.get(&path));

    if let Some(cached_image) = cached {
        if let Some(ui) = ui.upgrade() {
            update_ui_state(&ui, cached_image, &path, &navigation);
            preload_adjacent_images(&navigation, cache);
        }
        return;
    }

    // Cache miss - load from disk
    rayon::spawn(move || {
        let result = image_loader::load_image_blocking(&path)
            .map(|(data, width, height)| CachedImage::new(data, width, height));

        if let Ok(image) = &result
            && let Ok(mut cache) = cache.lock()
        {
            cache.put(path.clone(), image.clone());
        }

        let _ = slint::invoke_from_event_loop(move || {
            if let Some(ui) = ui.upgrade() {
                match result {
                    Ok(image) => {
                        // Skip images the user already navigated away from.
                        if navigation.current_path().as_deref() == Some(path.as_path()) {
                            update_ui_state(&ui, image, &path, &navigation);
                        }
                        preload_adjacent_images(&navigation, cache);
                    }
                    Err(error) => set_error_with_prefix(&ui, &error_prefix, error.to_string()),
                }
            }
        });
    });
}

/// Preloads adjacent images (next and previous) in the background.
fn preload_adjacent_images(navigation: &NavigationService, cache: Arc<Mutex<ImageCache>>) {
    for path in navigation.adjacent() {
        let should_load = cache
            .lock()
            .ok()
            .map(|c| !c.contains(&path))
            .unwrap_or(false);

        if should_load {
            let cache_clone = cache.clone();
            rayon::spawn(move || {
                // Silently ignore errors during preload
                if let Ok((data, width, height)) = image_loader::load_image_blocking(&path)
                    && let Ok(mut cache) = cache_clone.lock()
                {
                    cache.put(path, CachedImage::new(data, width, height));
                }
            });
        }
    }
}
