//! Explicit runtime context for the overlay.
//!
//! [`OverlayRuntime`] owns the workspace manager, transient interaction state, configuration,
//! the injected host services, and the FIFO effect queue. Hosts create exactly one per overlay
//! window and drive it from their UI loop: `dispatch` for every translated input event, then
//! `run_effects` to perform the I/O the reducer requested.

use std::collections::{BTreeSet, VecDeque};

use overlay_host::{BitmapHandle, HostServices};

use crate::config::{load_config, OverlayConfig};
use crate::geometry::PointerPosition;
use crate::hit_test::{hit_test, HitTarget};
use crate::interaction::InteractionState;
use crate::manager::{ManagerError, WorkspaceManager};
use crate::model::{Icon, ZoneId};
use crate::persistence::{load_workspace, save_workspace, LoadOutcome, PersistenceError};
use crate::reducer::{reduce_overlay, OverlayAction, RuntimeEffect};
use crate::reflow::{layout_zone, IconLayout};

/// User-facing conditions surfaced while executing effects.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeNotice {
    /// Stored data could not be read and the default layout was restored.
    WorkspaceRecovered,
    /// A save failed; the in-memory workspace stays authoritative.
    SaveFailed { error: String },
    /// A shortcut target could not be launched.
    LaunchFailed { target: String, error: String },
}

/// Accumulated repaint requests since the presentation last asked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepaintRequest {
    pub all: bool,
    pub zones: BTreeSet<ZoneId>,
}

impl RepaintRequest {
    pub fn is_empty(&self) -> bool {
        !self.all && self.zones.is_empty()
    }
}

pub struct OverlayRuntime {
    pub(crate) host: HostServices,
    pub(crate) config: OverlayConfig,
    pub(crate) manager: WorkspaceManager,
    pub(crate) interaction: InteractionState,
    pub(crate) effects: VecDeque<RuntimeEffect>,
    pub(crate) notices: Vec<RuntimeNotice>,
    pub(crate) repaint: RepaintRequest,
    /// Workspace changed since the last successful save.
    pub(crate) dirty: bool,
}

impl std::fmt::Debug for OverlayRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayRuntime")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("pending_effects", &self.effects.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl OverlayRuntime {
    pub fn new(host: HostServices, config: OverlayConfig) -> Self {
        Self {
            host,
            config,
            manager: WorkspaceManager::default(),
            interaction: InteractionState::default(),
            effects: VecDeque::new(),
            notices: Vec::new(),
            repaint: RepaintRequest::default(),
            dirty: false,
        }
    }

    /// Builds a runtime from stored configuration and workspace.
    pub async fn boot(host: HostServices) -> (Self, LoadOutcome) {
        let config = load_config(host.prefs.as_ref()).await;
        let mut runtime = Self::new(host, config);
        let outcome = runtime.hydrate_from_store().await;
        (runtime, outcome)
    }

    /// Loads (or self-heals) the stored workspace and adopts it.
    pub async fn hydrate_from_store(&mut self) -> LoadOutcome {
        let outcome = load_workspace(self.host.app_state.as_ref()).await;
        let mut workspace = outcome.workspace.clone();
        if !self.config.restore_last_active_page {
            workspace.active_page_id = workspace.pages.first().map(|page| page.id.clone());
        }
        if outcome.recovered {
            self.notices.push(RuntimeNotice::WorkspaceRecovered);
            self.notify_user(
                "Layout restored",
                "Saved layout could not be read; a default layout was created.",
            )
            .await;
        }
        self.interaction.dragging = None;
        self.interaction.resizing = None;
        self.manager.replace_workspace(workspace);
        self.repaint.all = true;
        self.dirty = false;
        tracing::info!(
            host = self.host.host_strategy.as_str(),
            defaulted = outcome.defaulted,
            recovered = outcome.recovered,
            "overlay runtime hydrated"
        );
        outcome
    }

    /// Runs `action` through the reducer and queues its effects.
    ///
    /// # Errors
    ///
    /// Returns the reducer's [`ManagerError`]; nothing is queued in that case.
    pub fn dispatch(&mut self, action: OverlayAction) -> Result<(), ManagerError> {
        match reduce_overlay(
            &mut self.manager,
            &mut self.interaction,
            &mut self.config,
            action,
        ) {
            Ok(effects) => {
                self.effects.extend(effects);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "overlay reducer error");
                Err(err)
            }
        }
    }

    /// Dispatches `action` and immediately drains the effect queue.
    pub async fn dispatch_and_run(&mut self, action: OverlayAction) -> Result<(), ManagerError> {
        self.dispatch(action)?;
        self.run_effects().await;
        Ok(())
    }

    /// Drains queued effects in FIFO order.
    pub async fn run_effects(&mut self) {
        crate::effect_executor::drain(self).await;
    }

    /// Cancels any live drag, drains effects, and saves the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Save`] when the final save fails.
    pub async fn shutdown(&mut self) -> Result<(), PersistenceError> {
        if self.interaction.has_session() {
            if let Err(err) = self.dispatch(OverlayAction::CancelZoneDrag) {
                tracing::debug!(error = %err, "drag cancel during shutdown failed");
            }
        }
        self.run_effects().await;
        save_workspace(self.host.app_state.as_ref(), self.manager.workspace()).await?;
        self.dirty = false;
        tracing::info!("overlay runtime shut down");
        Ok(())
    }

    pub fn manager(&self) -> &WorkspaceManager {
        &self.manager
    }

    /// Mutable access for observer registration and direct manager calls by the host.
    pub fn manager_mut(&mut self) -> &mut WorkspaceManager {
        &mut self.manager
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub fn pending_effects(&self) -> usize {
        self.effects.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn notices(&self) -> &[RuntimeNotice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<RuntimeNotice> {
        std::mem::take(&mut self.notices)
    }

    pub fn take_repaint(&mut self) -> RepaintRequest {
        std::mem::take(&mut self.repaint)
    }

    /// Hit tests the active page using the current search filter.
    pub fn hit_test(&self, point: PointerPosition) -> Option<HitTarget> {
        let page = self.manager.active_page()?;
        hit_test(page, point, self.interaction.search_filter())
    }

    /// Layout of every zone on the active page, in draw order.
    pub fn active_page_layout(&self) -> Vec<(ZoneId, Vec<IconLayout>)> {
        let filter = self.interaction.search_filter();
        self.manager
            .active_page()
            .map(|page| {
                page.zones
                    .iter()
                    .map(|zone| (zone.id.clone(), layout_zone(zone, filter)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves the drawable bitmap for `icon`; `None` means draw a placeholder.
    pub fn icon_bitmap(&self, icon: &Icon) -> Option<BitmapHandle> {
        self.host.bitmaps.resolve_bitmap(icon.bitmap_key())
    }

    pub(crate) async fn notify_user(&self, title: &str, body: &str) {
        if let Err(err) = self.host.notifications.notify(title, body).await {
            tracing::warn!(error = %err, title, "notification delivery failed");
        }
    }
}
