//! Workspace persistence over the host app-state store.
//!
//! Loading never fails: a missing, empty, or unreadable snapshot is replaced with the default
//! layout, which is written back immediately so the next boot reads a valid file.

use overlay_host::{load_state, save_state, AppStateStore, VersionedState, WORKSPACE_STATE_NAMESPACE};
use serde_json::Value;
use thiserror::Error;

use crate::model::{Workspace, WORKSPACE_SCHEMA_VERSION};
use crate::theme::{apply_theme_defaults, Theme};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("workspace load failed: {0}")]
    Load(String),
    #[error("workspace save failed: {0}")]
    Save(String),
}

/// Result of [`load_workspace`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub workspace: Workspace,
    /// The default layout was synthesized because nothing usable was stored.
    pub defaulted: bool,
    /// Stored data existed but could not be read.
    pub recovered: bool,
}

impl VersionedState for Workspace {
    const NAMESPACE: &'static str = WORKSPACE_STATE_NAMESPACE;
    const SCHEMA_VERSION: u32 = WORKSPACE_SCHEMA_VERSION;

    // Schema 0 predates the explicit version field and shares the current layout.
    fn migrate(schema_version: u32, payload: &Value) -> Result<Option<Self>, String> {
        match schema_version {
            0 => serde_json::from_value(payload.clone())
                .map(Some)
                .map_err(|err| err.to_string()),
            _ => Ok(None),
        }
    }
}

/// Reads the stored workspace without self-healing.
///
/// # Errors
///
/// Returns [`PersistenceError::Load`] when the store fails or the snapshot does not decode.
pub async fn read_workspace<S: AppStateStore + ?Sized>(
    store: &S,
) -> Result<Option<Workspace>, PersistenceError> {
    load_state::<Workspace, S>(store)
        .await
        .map_err(PersistenceError::Load)
}

/// Loads the workspace, falling back to (and persisting) the default layout when needed.
pub async fn load_workspace<S: AppStateStore + ?Sized>(store: &S) -> LoadOutcome {
    let (loaded, recovered) = match read_workspace(store).await {
        Ok(loaded) => (loaded, false),
        Err(err) => {
            tracing::warn!(error = %err, "stored workspace unreadable; restoring defaults");
            (None, true)
        }
    };

    match loaded {
        Some(mut workspace) if !workspace.pages.is_empty() => {
            workspace.schema_version = WORKSPACE_SCHEMA_VERSION;
            let repaired = apply_theme_defaults(&mut workspace);
            tracing::info!(
                pages = workspace.pages.len(),
                icons = workspace.icon_count(),
                repaired,
                "workspace loaded"
            );
            LoadOutcome {
                workspace,
                defaulted: false,
                recovered,
            }
        }
        other => {
            let theme = other.map(|workspace| workspace.theme).unwrap_or(Theme::Dark);
            let workspace = Workspace::default_layout(theme);
            if let Err(err) = save_workspace(store, &workspace).await {
                tracing::warn!(error = %err, "failed to persist default workspace");
            } else {
                tracing::info!("default workspace persisted");
            }
            LoadOutcome {
                workspace,
                defaulted: true,
                recovered,
            }
        }
    }
}

/// Replaces the stored workspace with `workspace`, page order re-derived.
///
/// # Errors
///
/// Returns [`PersistenceError::Save`] when serialization or the store write fails, including
/// when the store holds a newer snapshot; the previously stored snapshot is left in place.
pub async fn save_workspace<S: AppStateStore + ?Sized>(
    store: &S,
    workspace: &Workspace,
) -> Result<(), PersistenceError> {
    let mut snapshot = workspace.clone();
    snapshot.rederive_page_order();
    snapshot.schema_version = WORKSPACE_SCHEMA_VERSION;
    save_state(store, &snapshot)
        .await
        .map_err(PersistenceError::Save)?;
    tracing::debug!(pages = snapshot.pages.len(), "workspace saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use overlay_host::{AppStateEnvelope, MemoryAppStateStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{DEFAULT_PAGE_NAME, DEFAULT_ZONE_TITLE};

    #[test]
    fn absent_snapshot_yields_persisted_default_layout() {
        let store = MemoryAppStateStore::default();
        let outcome = block_on(load_workspace(&store));

        assert!(outcome.defaulted);
        assert!(!outcome.recovered);
        assert_eq!(outcome.workspace.pages[0].name, DEFAULT_PAGE_NAME);
        assert_eq!(outcome.workspace.pages[0].zones[0].title, DEFAULT_ZONE_TITLE);
        assert!(store.peek(WORKSPACE_STATE_NAMESPACE).is_some());
    }

    #[test]
    fn empty_snapshot_keeps_stored_theme_for_defaults() {
        let store = MemoryAppStateStore::default();
        let empty = Workspace {
            theme: Theme::Light,
            ..Workspace::default()
        };
        block_on(save_workspace(&store, &empty)).expect("save");

        let outcome = block_on(load_workspace(&store));

        assert!(outcome.defaulted);
        assert_eq!(outcome.workspace.theme, Theme::Light);
        assert_eq!(outcome.workspace.pages.len(), 1);
    }

    #[test]
    fn undecodable_payload_is_recovered() {
        let store = MemoryAppStateStore::default();
        let envelope = AppStateEnvelope::new(
            WORKSPACE_STATE_NAMESPACE,
            WORKSPACE_SCHEMA_VERSION,
            json!({ "pages": "definitely not a list" }),
        );
        block_on(store.save_app_state_envelope(&envelope)).expect("seed");

        let outcome = block_on(load_workspace(&store));

        assert!(outcome.recovered);
        assert!(outcome.defaulted);
        assert_eq!(outcome.workspace.pages.len(), 1);
        assert!(outcome.workspace.pages[0].zones[0].icons.is_empty());
        let stored = block_on(read_workspace(&store)).expect("read").expect("present");
        assert_eq!(stored.pages.len(), 1);
    }

    #[test]
    fn schema_zero_payloads_are_accepted() {
        let store = MemoryAppStateStore::default();
        let workspace = Workspace::default_layout(Theme::Dark);
        let payload = serde_json::to_value(&workspace).expect("encode");
        let envelope = AppStateEnvelope::new(WORKSPACE_STATE_NAMESPACE, 0, payload);
        block_on(store.save_app_state_envelope(&envelope)).expect("seed");

        let outcome = block_on(load_workspace(&store));

        assert!(!outcome.defaulted);
        assert_eq!(outcome.workspace.pages[0].id, workspace.pages[0].id);
        assert_eq!(outcome.workspace.schema_version, WORKSPACE_SCHEMA_VERSION);
    }

    #[test]
    fn save_rederives_page_order() {
        let store = MemoryAppStateStore::default();
        let mut workspace = Workspace::default_layout(Theme::Dark);
        workspace.pages[0].order = 9;
        block_on(save_workspace(&store, &workspace)).expect("save");
        let stored = block_on(read_workspace(&store)).expect("read").expect("present");
        assert_eq!(stored.pages[0].order, 0);
    }
}
