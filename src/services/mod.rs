//! Service layer for business logic.
//!
//! Separates filesystem and capture logic from UI handlers for better testability.

pub mod auto_reload_service;
pub mod capture_service;
pub mod folder_service;
pub mod navigation_service;

pub use auto_reload_service::AutoReloadService;
pub use capture_service::CaptureService;
pub use folder_service::FolderService;
pub use navigation_service::NavigationService;
