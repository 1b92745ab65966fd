//! Helper functions to set groups of ViewState properties at once.

use crate::config::TILE_PALETTE;
use crate::state::{CaptureStage, Screen};
use log::error;
use slint::{Color, ComponentHandle, Model, ModelRc, SharedString, VecModel};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

const STATUS_DISPLAY_TIME: Duration = Duration::from_secs(3);

fn parse_hex_color(hex: &str) -> Color {
    u32::from_str_radix(hex.trim_start_matches('#'), 16)
        .map(|rgb| Color::from_argb_encoded(0xff00_0000 | rgb))
        .unwrap_or_else(|_| Color::from_rgb_u8(0x34, 0x98, 0xdb))
}

/// Picks a palette colour for a tile. The same name always gets the same colour.
pub fn tile_color(name: &str) -> Color {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    let index = (hasher.finish() % TILE_PALETTE.len() as u64) as usize;
    parse_hex_color(TILE_PALETTE[index])
}

/// Sets an error message in the UI with a prefix.
///
/// Logs the error and updates the ViewState error-message property.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::ViewState>()
        .set_error_message(error_message.into());
}

pub fn clear_error(ui: &crate::AppWindow) {
    ui.global::<crate::ViewState>().set_error_message("".into());
}

/// Shows a short-lived confirmation message.
pub fn set_status(ui: &crate::AppWindow, message: String) {
    log::info!("{}", message);
    let message: SharedString = message.into();
    ui.global::<crate::ViewState>()
        .set_status_message(message.clone());

    let ui_handle = ui.as_weak();
    slint::Timer::single_shot(STATUS_DISPLAY_TIME, move || {
        if let Some(ui) = ui_handle.upgrade() {
            let view_state = ui.global::<crate::ViewState>();
            // A newer message may have replaced this one.
            if view_state.get_status_message().as_str() == message.as_str() {
                view_state.set_status_message("".into());
            }
        }
    });
}

/// Sets the folder buttons and the save-target choices.
///
/// Groups: folders, folder-names
pub fn set_folders(ui: &crate::AppWindow, names: &[String]) {
    let view_state = ui.global::<crate::ViewState>();
    let items: Vec<crate::FolderItem> = names
        .iter()
        .map(|name| crate::FolderItem {
            name: name.as_str().into(),
            tint: tile_color(name),
        })
        .collect();
    let labels: Vec<SharedString> = names
        .iter()
        .map(|name| SharedString::from(name.as_str()))
        .collect();

    view_state.set_folders(ModelRc::new(VecModel::from(items)));
    view_state.set_folder_names(ModelRc::new(VecModel::from(labels)));
}

/// Index of `name` in the current save-target choices.
pub fn folder_name_index(ui: &crate::AppWindow, name: &str) -> Option<usize> {
    ui.global::<crate::ViewState>()
        .get_folder_names()
        .iter()
        .position(|candidate| candidate.as_str() == name)
}

pub fn set_screen(ui: &crate::AppWindow, screen: &Screen) {
    let view_state = ui.global::<crate::ViewState>();
    match screen {
        Screen::Home => view_state.set_current_screen(crate::ScreenKind::Home),
        Screen::Folder(name) => {
            view_state.set_current_folder(name.as_str().into());
            view_state.set_current_screen(crate::ScreenKind::Folder);
        }
        Screen::Camera => view_state.set_current_screen(crate::ScreenKind::Camera),
    }
}

pub fn set_camera_stage(ui: &crate::AppWindow, stage: CaptureStage) {
    let stage = match stage {
        CaptureStage::Preview => crate::CameraStage::Preview,
        CaptureStage::Paused => crate::CameraStage::Paused,
        CaptureStage::Processing => crate::CameraStage::Processing,
        CaptureStage::Review => crate::CameraStage::Review,
    };
    ui.global::<crate::ViewState>().set_camera_stage(stage);
}

/// Sets all fullscreen caption properties at once.
///
/// Groups: fullscreen-name, fullscreen-index, fullscreen-total
pub fn set_fullscreen_position(ui: &crate::AppWindow, name: &str, index: usize, total: usize) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_fullscreen_name(name.into());
    view_state.set_fullscreen_index(index as i32);
    view_state.set_fullscreen_total(total as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_color_is_stable_and_from_palette() {
        let palette: Vec<Color> = TILE_PALETTE.iter().map(|hex| parse_hex_color(hex)).collect();
        let first = tile_color("holiday");
        assert_eq!(first, tile_color("holiday"));
        assert!(palette.contains(&first));
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#e74c3c"), Color::from_rgb_u8(0xe7, 0x4c, 0x3c));
    }
}
