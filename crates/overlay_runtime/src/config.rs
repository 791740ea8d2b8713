//! Runtime configuration persisted through the typed prefs store.

use overlay_host::{PrefKey, PrefsStore};
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

pub const CONFIG_PREF: PrefKey<OverlayConfig> = PrefKey::new("overlay.config.v1");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Drain persistence effects right after each dispatched action.
    pub autosave: bool,
    /// Persist when a zone drag or resize is released.
    pub persist_drag_commits: bool,
    /// Keep the stored active page on boot; otherwise the first page is activated.
    pub restore_last_active_page: bool,
    /// Size of zones created without explicit geometry.
    pub default_zone_width: f32,
    pub default_zone_height: f32,
    /// Offset applied between consecutive zones created without explicit geometry.
    pub zone_cascade_offset: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            autosave: true,
            persist_drag_commits: true,
            restore_last_active_page: true,
            default_zone_width: 300.0,
            default_zone_height: 300.0,
            zone_cascade_offset: 30.0,
        }
    }
}

impl OverlayConfig {
    /// Geometry for the `existing + 1`th zone on a page when the caller gave none.
    pub fn cascaded_zone_rect(&self, existing: usize) -> Rect {
        let step = (existing % 8) as f32 * self.zone_cascade_offset;
        Rect::from_origin_size(
            50.0 + step,
            50.0 + step,
            self.default_zone_width.max(crate::interaction::MIN_ZONE_WIDTH),
            self.default_zone_height.max(crate::interaction::MIN_ZONE_HEIGHT),
        )
    }
}

/// Loads the configuration, falling back to defaults when it is missing or unreadable.
pub async fn load_config<S: PrefsStore + ?Sized>(prefs: &S) -> OverlayConfig {
    match CONFIG_PREF.load(prefs).await {
        Ok(Some(config)) => config,
        Ok(None) => OverlayConfig::default(),
        Err(err) => {
            tracing::warn!(key = CONFIG_PREF.name(), error = %err, "config load failed; using defaults");
            OverlayConfig::default()
        }
    }
}

pub async fn save_config<S: PrefsStore + ?Sized>(prefs: &S, config: &OverlayConfig) -> Result<(), String> {
    CONFIG_PREF.save(prefs, config).await
}
