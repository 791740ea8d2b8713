//! Core of the desktop overlay organizer.
//!
//! Pages hold zones, zones hold shortcut icons. [`WorkspaceManager`] is the only mutation path
//! over that tree; the reflow and sort engines derive icon order and placement from it;
//! [`OverlayRuntime`] wires the manager, pointer interaction, persistence, and host services
//! together behind a reducer that turns presentation actions into [`RuntimeEffect`] intents.

mod effect_executor;

pub mod config;
pub mod geometry;
pub mod hit_test;
pub mod interaction;
pub mod manager;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod reflow;
pub mod runtime_context;
pub mod search;
pub mod sort;
pub mod theme;

pub use config::{load_config, save_config, OverlayConfig, CONFIG_PREF};
pub use geometry::{PointerPosition, Rect, Rgba};
pub use hit_test::{hit_test, HitTarget};
pub use interaction::{resize_rect, InteractionState, ResizeHandle};
pub use manager::{ManagerError, SubscriptionId, WorkspaceChange, WorkspaceManager};
pub use model::*;
pub use persistence::{load_workspace, read_workspace, save_workspace, LoadOutcome, PersistenceError};
pub use reducer::{reduce_overlay, OverlayAction, RuntimeEffect};
pub use reflow::{layout_zone, reflow_zone, IconLayout, ReflowMetrics};
pub use runtime_context::{OverlayRuntime, RepaintRequest, RuntimeNotice};
pub use search::SearchFilter;
pub use sort::sort_zone;
pub use theme::{Theme, ThemePalette};
