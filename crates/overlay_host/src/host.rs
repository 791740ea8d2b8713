//! Host service bundle injected into the overlay runtime.

use std::rc::Rc;

use crate::{
    AppStateStore, IconBitmapCache, LaunchService, MemoryAppStateStore, MemoryIconBitmapCache,
    MemoryLaunchService, MemoryNotificationService, MemoryPrefsStore, NotificationService,
    PrefsStore,
};

/// Stable host strategy selected for the current composition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Filesystem- and process-backed adapters.
    Native,
    /// In-memory adapters for tests and headless embedding.
    Memory,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Memory => "memory",
        }
    }
}

/// Runtime-selected host service bundle injected into `overlay_runtime`.
///
/// All environment-specific service selection happens before this bundle crosses into the
/// runtime, which keeps the core decoupled from filesystem and process details.
#[derive(Clone)]
pub struct HostServices {
    /// Durable workspace store.
    pub app_state: Rc<dyn AppStateStore>,
    /// Lightweight typed preference store.
    pub prefs: Rc<dyn PrefsStore>,
    /// Rendering-side icon bitmap cache.
    pub bitmaps: Rc<dyn IconBitmapCache>,
    /// Shortcut launch service.
    pub launcher: Rc<dyn LaunchService>,
    /// Notification delivery service.
    pub notifications: Rc<dyn NotificationService>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds a bundle backed entirely by in-memory adapters.
    pub fn in_memory() -> Self {
        Self {
            app_state: Rc::new(MemoryAppStateStore::default()),
            prefs: Rc::new(MemoryPrefsStore::default()),
            bitmaps: Rc::new(MemoryIconBitmapCache::default()),
            launcher: Rc::new(MemoryLaunchService::default()),
            notifications: Rc::new(MemoryNotificationService::default()),
            host_strategy: HostStrategy::Memory,
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy.as_str())
            .finish_non_exhaustive()
    }
}
