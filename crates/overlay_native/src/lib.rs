//! Filesystem and process adapters for the overlay host contracts.
//!
//! Everything that touches disk or spawns processes lives here so `overlay_runtime` stays free of
//! I/O. [`native_host_services`] composes the adapters into the bundle the runtime consumes.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod app_state;
mod bitmap_cache;
mod launch;
mod notifications;
#[allow(missing_docs)]
pub mod paths;
mod prefs;

use std::rc::Rc;

use overlay_host::{HostServices, HostStrategy};

pub use app_state::FileAppStateStore;
pub use bitmap_cache::FileIconBitmapCache;
pub use launch::ProcessLaunchService;
pub use notifications::LogNotificationService;
pub use paths::{DataPaths, DATA_DIR_ENV};
pub use prefs::FilePrefsStore;

/// Builds the native service bundle rooted at `paths`.
///
/// # Errors
///
/// Returns an error when the storage directories cannot be created.
pub fn native_host_services(paths: &DataPaths) -> Result<HostServices, String> {
    let app_state = FileAppStateStore::from_root(paths.app_state_dir())?;
    let prefs = FilePrefsStore::from_root(paths.prefs_dir())?;
    tracing::info!(root = %paths.root().display(), "native host services ready");
    Ok(HostServices {
        app_state: Rc::new(app_state),
        prefs: Rc::new(prefs),
        bitmaps: Rc::new(FileIconBitmapCache::default()),
        launcher: Rc::new(ProcessLaunchService),
        notifications: Rc::new(LogNotificationService),
        host_strategy: HostStrategy::Native,
    })
}
