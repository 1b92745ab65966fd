//! Service for keeping listings in sync with the filesystem.
//!
//! Watches a directory (non-recursive) and calls back on the UI thread after
//! a debounced change.

use crate::config::{WATCH_DEBOUNCE_TIMEOUT, WATCH_POLL_INTERVAL};
use crate::error::{AppError, Result};
use crate::file_utils::PathExt;
use log::{debug, warn};
use notify_debouncer_mini::{Config, new_debouncer_opt, notify::RecursiveMode};
use std::path::Path;
use std::sync::Arc;

/// Watcher handle; watching stops when it is dropped.
pub type DirectoryDebouncer =
    notify_debouncer_mini::Debouncer<notify_debouncer_mini::notify::PollWatcher>;

/// Handles debounced file system events.
fn handle_debounced_events<F>(
    events: Vec<notify_debouncer_mini::DebouncedEvent>,
    on_change: &Arc<F>,
) where
    F: Fn() + Send + Sync + 'static,
{
    if events.is_empty() {
        return;
    }

    debug!("Debounced file system events: {} events", events.len());
    for event in &events {
        debug!("  - {:?} for {}", event.kind, event.path.format_for_log());
    }

    let on_change_clone = on_change.clone();
    let _ = slint::invoke_from_event_loop(move || {
        on_change_clone();
    });
}

pub struct AutoReloadService;

impl AutoReloadService {
    /// Starts watching `directory` for changes with debouncing.
    ///
    /// `on_change` runs on the UI thread once changes settle.
    pub fn watch<F>(directory: &Path, on_change: F) -> Result<DirectoryDebouncer>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let on_change = Arc::new(on_change);

        // PollWatcher also works on network and removable drives.
        let notify_config = notify_debouncer_mini::notify::Config::default()
            .with_poll_interval(WATCH_POLL_INTERVAL);
        let debouncer_config = Config::default()
            .with_timeout(WATCH_DEBOUNCE_TIMEOUT)
            .with_notify_config(notify_config);

        let mut debouncer = new_debouncer_opt::<_, notify_debouncer_mini::notify::PollWatcher>(
            debouncer_config,
            move |res: notify_debouncer_mini::DebounceEventResult| match res {
                Ok(events) => handle_debounced_events(events, &on_change),
                Err(error) => warn!("File watcher error: {}", error),
            },
        )
        .map_err(|e| AppError::DirectoryScan(format!("Failed to create debouncer: {}", e)))?;

        debouncer
            .watcher()
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| AppError::DirectoryScan(format!("Failed to watch directory: {}", e)))?;

        debug!("Watching {}", directory.format_for_log());
        Ok(debouncer)
    }
}
