//! Typed host-domain contracts shared by the overlay runtime and its native adapters.
//!
//! This crate is the API-first boundary for everything the overlay core treats as an external
//! collaborator: durable workspace storage, lightweight preferences, the icon bitmap cache,
//! launching shortcut targets, and user-visible notifications. Concrete filesystem/process
//! adapters live in `overlay_native`; in-memory adapters here back tests and headless hosts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod host;
pub mod launch;
pub mod notifications;
pub mod storage;
pub mod time;

pub use cache::{BitmapHandle, IconBitmapCache, MemoryIconBitmapCache};
pub use host::{HostServices, HostStrategy};
pub use launch::{LaunchFuture, LaunchService, MemoryLaunchService};
pub use notifications::{MemoryNotificationService, NotificationFuture, NotificationService};
pub use storage::app_state::{
    check_revision, decode_state, encode_state, load_state, save_state, AppStateEnvelope,
    AppStateStore, AppStateStoreFuture, MemoryAppStateStore, RevisionCheck, VersionedState,
    APP_STATE_ENVELOPE_VERSION, WORKSPACE_STATE_NAMESPACE,
};
pub use storage::prefs::{MemoryPrefsStore, PrefKey, PrefsStore, PrefsStoreFuture};
pub use time::{next_monotonic_timestamp_ms, observe_timestamp_ms, unix_time_ms_now};
