//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - `slint::spawn_local`: UI非同期処理（フォルダダイアログなど、メインスレッドで実行する必要がある処理）
//! - `rayon::spawn`: CPU集約的処理（画像デコード、サムネイル生成、ディレクトリスキャン、キャプチャ保存など）
//! - `slint::invoke_from_event_loop`: rayonからUIスレッドへの結果返却時に使用
//! - `slint::Timer`: カメラプレビュー（カメラハンドルはUIスレッド専用）

mod camera_view;
pub mod folder_view;
pub mod handlers;
pub mod image_display;
mod state_helpers;

pub use handlers::setup_handlers;
pub use state_helpers::*;
