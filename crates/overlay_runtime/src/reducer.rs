//! Reducer actions, side-effect intents, and transition logic for the overlay runtime.

use std::collections::BTreeMap;

use crate::config::OverlayConfig;
use crate::geometry::{PointerPosition, Rect, Rgba};
use crate::interaction::{DragSession, InteractionState, ResizeHandle, ResizeSession};
use crate::manager::{ManagerError, WorkspaceManager};
use crate::model::{IconId, PageId, SortKey, Workspace, ZoneId, ZoneProperties};
use crate::search::SearchFilter;
use crate::theme::{Theme, ThemePalette};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_overlay`].
pub enum OverlayAction {
    AddPage {
        name: String,
    },
    RemovePage {
        page_id: PageId,
    },
    RenamePage {
        page_id: PageId,
        name: String,
    },
    MovePage {
        from: usize,
        to: usize,
    },
    SetActivePage {
        page_id: PageId,
    },
    SetPageWallpaper {
        page_id: PageId,
        wallpaper_path: Option<String>,
    },
    SetPageOverlay {
        page_id: PageId,
        color: Rgba,
    },
    /// Add a zone; missing geometry cascades from the configured default size and a missing
    /// color uses the theme's default zone background.
    AddZone {
        page_id: PageId,
        title: String,
        rect: Option<Rect>,
        color: Option<Rgba>,
    },
    RemoveZone {
        page_id: PageId,
        zone_id: ZoneId,
    },
    /// Apply the hub's property form, then sort and reflow once.
    ApplyZoneProperties {
        zone_id: ZoneId,
        properties: ZoneProperties,
    },
    SetZoneSortKey {
        zone_id: ZoneId,
        key: SortKey,
    },
    ToggleSortDirection {
        zone_id: ZoneId,
    },
    BeginZoneMove {
        zone_id: ZoneId,
        pointer: PointerPosition,
    },
    UpdateZoneMove {
        pointer: PointerPosition,
    },
    EndZoneMove,
    BeginZoneResize {
        zone_id: ZoneId,
        handle: ResizeHandle,
        pointer: PointerPosition,
    },
    UpdateZoneResize {
        pointer: PointerPosition,
    },
    EndZoneResize,
    /// Abort the current drag or resize and restore the geometry captured at press time.
    CancelZoneDrag,
    SetSearchTerm {
        term: String,
    },
    /// Files dropped from the OS shell onto a zone.
    DropFiles {
        zone_id: ZoneId,
        paths: Vec<String>,
    },
    AddIcon {
        zone_id: ZoneId,
        path: String,
        display_name: Option<String>,
    },
    RemoveIcon {
        zone_id: ZoneId,
        icon_id: IconId,
    },
    MoveIcon {
        from_zone: ZoneId,
        icon_id: IconId,
        to_zone: ZoneId,
        index: Option<usize>,
    },
    SelectIcon {
        zone_id: ZoneId,
        icon_id: IconId,
        additive: bool,
    },
    ClearSelection,
    DeleteSelected,
    LaunchIcon {
        zone_id: ZoneId,
        icon_id: IconId,
    },
    SetTheme {
        theme: Theme,
    },
    SetConfig {
        config: OverlayConfig,
    },
    /// Adopt a loaded snapshot wholesale.
    Hydrate {
        workspace: Workspace,
    },
    /// The rendering surface was recreated; every cached bitmap is stale.
    SurfaceRecreated,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_overlay`] for the runtime to execute in order.
pub enum RuntimeEffect {
    PersistWorkspace,
    PersistConfig,
    LaunchTarget(String),
    InvalidateBitmapCache,
    RepaintZone(ZoneId),
    RepaintAll,
}

/// Applies an [`OverlayAction`] through the workspace manager and collects resulting effects.
///
/// Drag and resize updates only touch the dragged zone and never request persistence; the
/// release commits the geometry once.
///
/// # Errors
///
/// Returns the [`ManagerError`] of the first failing manager call. Actions that fail before
/// mutating leave the workspace untouched.
pub fn reduce_overlay(
    manager: &mut WorkspaceManager,
    interaction: &mut InteractionState,
    config: &mut OverlayConfig,
    action: OverlayAction,
) -> Result<Vec<RuntimeEffect>, ManagerError> {
    let mut effects = Vec::new();
    match action {
        OverlayAction::AddPage { name } => {
            manager.add_page(name);
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::RemovePage { page_id } => {
            manager.remove_page(&page_id)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::RenamePage { page_id, name } => {
            manager.rename_page(&page_id, name)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::MovePage { from, to } => {
            manager.move_page(from, to)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::SetActivePage { page_id } => {
            if manager.set_active_page(&page_id)? {
                interaction.dragging = None;
                interaction.resizing = None;
                effects.push(RuntimeEffect::PersistWorkspace);
                effects.push(RuntimeEffect::RepaintAll);
            }
        }
        OverlayAction::SetPageWallpaper {
            page_id,
            wallpaper_path,
        } => {
            manager.set_page_wallpaper(&page_id, wallpaper_path)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::SetPageOverlay { page_id, color } => {
            manager.set_page_overlay(&page_id, color)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::AddZone {
            page_id,
            title,
            rect,
            color,
        } => {
            let existing = manager
                .page(&page_id)
                .map(|page| page.zones.len())
                .unwrap_or_default();
            let rect = rect.unwrap_or_else(|| config.cascaded_zone_rect(existing));
            let color = color
                .unwrap_or_else(|| ThemePalette::for_theme(manager.theme()).zone_default_background);
            let zone_id = manager.add_zone(&page_id, title, rect, color)?.id.clone();
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintZone(zone_id));
        }
        OverlayAction::RemoveZone { page_id, zone_id } => {
            manager.remove_zone(&page_id, &zone_id)?;
            if interaction.active_zone() == Some(&zone_id) {
                interaction.dragging = None;
                interaction.resizing = None;
            }
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::ApplyZoneProperties {
            zone_id,
            properties,
        } => {
            manager.update_zone(&zone_id, |zone| properties.apply_to(zone))?;
            manager.sort_and_reflow(&zone_id)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintZone(zone_id));
        }
        OverlayAction::SetZoneSortKey { zone_id, key } => {
            manager.update_zone(&zone_id, |zone| zone.sort_key = key)?;
            manager.sort_and_reflow(&zone_id)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintZone(zone_id));
        }
        OverlayAction::ToggleSortDirection { zone_id } => {
            manager.update_zone(&zone_id, |zone| zone.sort_ascending = !zone.sort_ascending)?;
            manager.sort_and_reflow(&zone_id)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintZone(zone_id));
        }
        OverlayAction::BeginZoneMove { zone_id, pointer } => {
            let rect_start = zone_rect(manager, &zone_id)?;
            interaction.resizing = None;
            interaction.dragging = Some(DragSession {
                zone_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        OverlayAction::UpdateZoneMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let rect = session.rect_at(pointer);
                manager.preview_zone_geometry(&session.zone_id, rect, false)?;
                effects.push(RuntimeEffect::RepaintZone(session.zone_id.clone()));
            }
        }
        OverlayAction::EndZoneMove => {
            if let Some(session) = interaction.dragging.take() {
                let rect = zone_rect(manager, &session.zone_id)?;
                if rect != session.rect_start {
                    manager.set_zone_geometry(&session.zone_id, rect)?;
                    if config.persist_drag_commits {
                        effects.push(RuntimeEffect::PersistWorkspace);
                    }
                }
                effects.push(RuntimeEffect::RepaintZone(session.zone_id));
            }
        }
        OverlayAction::BeginZoneResize {
            zone_id,
            handle,
            pointer,
        } => {
            let rect_start = zone_rect(manager, &zone_id)?;
            interaction.dragging = None;
            interaction.resizing = Some(ResizeSession {
                zone_id,
                handle,
                pointer_start: pointer,
                rect_start,
            });
        }
        OverlayAction::UpdateZoneResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref() {
                let rect = session.rect_at(pointer);
                manager.preview_zone_geometry(&session.zone_id, rect, true)?;
                effects.push(RuntimeEffect::RepaintZone(session.zone_id.clone()));
            }
        }
        OverlayAction::EndZoneResize => {
            if let Some(session) = interaction.resizing.take() {
                let rect = zone_rect(manager, &session.zone_id)?;
                if rect != session.rect_start {
                    manager.set_zone_geometry(&session.zone_id, rect)?;
                    manager.reflow(&session.zone_id)?;
                    if config.persist_drag_commits {
                        effects.push(RuntimeEffect::PersistWorkspace);
                    }
                }
                effects.push(RuntimeEffect::RepaintZone(session.zone_id));
            }
        }
        OverlayAction::CancelZoneDrag => {
            if let Some(session) = interaction.dragging.take() {
                manager.preview_zone_geometry(&session.zone_id, session.rect_start, false)?;
                effects.push(RuntimeEffect::RepaintZone(session.zone_id));
            }
            if let Some(session) = interaction.resizing.take() {
                manager.preview_zone_geometry(&session.zone_id, session.rect_start, true)?;
                effects.push(RuntimeEffect::RepaintZone(session.zone_id));
            }
        }
        OverlayAction::SetSearchTerm { term } => {
            let filter = SearchFilter::new(&term);
            if filter != interaction.search {
                interaction.search = filter;
                effects.push(RuntimeEffect::RepaintAll);
            }
        }
        OverlayAction::DropFiles { zone_id, paths } => {
            if manager.zone(&zone_id).is_none() {
                tracing::warn!(zone_id = %zone_id, "drop target zone not found");
                return Err(ManagerError::ZoneNotFound(zone_id));
            }
            let mut added = 0usize;
            for path in paths.into_iter().filter(|path| !path.trim().is_empty()) {
                manager.add_icon(&zone_id, path, None)?;
                added += 1;
            }
            tracing::debug!(zone_id = %zone_id, added, "files dropped");
            if added > 0 {
                effects.push(RuntimeEffect::PersistWorkspace);
                effects.push(RuntimeEffect::RepaintZone(zone_id));
            }
        }
        OverlayAction::AddIcon {
            zone_id,
            path,
            display_name,
        } => {
            manager.add_icon(&zone_id, path, display_name)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintZone(zone_id));
        }
        OverlayAction::RemoveIcon { zone_id, icon_id } => {
            manager.remove_icon(&zone_id, &icon_id)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintZone(zone_id));
        }
        OverlayAction::MoveIcon {
            from_zone,
            icon_id,
            to_zone,
            index,
        } => {
            manager.move_icon(&from_zone, &icon_id, &to_zone, index)?;
            effects.push(RuntimeEffect::PersistWorkspace);
            effects.push(RuntimeEffect::RepaintZone(from_zone.clone()));
            if from_zone != to_zone {
                effects.push(RuntimeEffect::RepaintZone(to_zone));
            }
        }
        OverlayAction::SelectIcon {
            zone_id,
            icon_id,
            additive,
        } => {
            manager.select_icon(&zone_id, &icon_id, additive)?;
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::ClearSelection => {
            if manager.clear_selection() {
                effects.push(RuntimeEffect::RepaintAll);
            }
        }
        OverlayAction::DeleteSelected => {
            let mut by_zone: BTreeMap<ZoneId, Vec<IconId>> = BTreeMap::new();
            for (zone_id, icon_id) in manager.selected_icons() {
                by_zone.entry(zone_id).or_default().push(icon_id);
            }
            for (zone_id, icon_ids) in by_zone {
                manager.remove_icons(&zone_id, &icon_ids)?;
                effects.push(RuntimeEffect::RepaintZone(zone_id));
            }
            if !effects.is_empty() {
                effects.insert(0, RuntimeEffect::PersistWorkspace);
            }
        }
        OverlayAction::LaunchIcon { zone_id, icon_id } => {
            let zone = manager
                .zone(&zone_id)
                .ok_or_else(|| ManagerError::ZoneNotFound(zone_id.clone()))?;
            let icon = zone
                .icon(&icon_id)
                .ok_or_else(|| ManagerError::IconNotFound(icon_id.clone()))?;
            effects.push(RuntimeEffect::LaunchTarget(icon.target_path.clone()));
        }
        OverlayAction::SetTheme { theme } => {
            if manager.set_theme(theme) {
                effects.push(RuntimeEffect::PersistWorkspace);
                effects.push(RuntimeEffect::RepaintAll);
            }
        }
        OverlayAction::SetConfig { config: next } => {
            if *config != next {
                *config = next;
                effects.push(RuntimeEffect::PersistConfig);
            }
        }
        OverlayAction::Hydrate { workspace } => {
            interaction.dragging = None;
            interaction.resizing = None;
            manager.replace_workspace(workspace);
            effects.push(RuntimeEffect::RepaintAll);
        }
        OverlayAction::SurfaceRecreated => {
            effects.push(RuntimeEffect::InvalidateBitmapCache);
            effects.push(RuntimeEffect::RepaintAll);
        }
    }
    Ok(effects)
}

fn zone_rect(manager: &WorkspaceManager, zone_id: &ZoneId) -> Result<Rect, ManagerError> {
    manager
        .zone(zone_id)
        .map(|zone| zone.screen_rect)
        .ok_or_else(|| {
            tracing::warn!(zone_id = %zone_id, "zone not found");
            ManagerError::ZoneNotFound(zone_id.clone())
        })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::manager::WorkspaceChange;

    struct Harness {
        manager: WorkspaceManager,
        interaction: InteractionState,
        config: OverlayConfig,
        zone_id: ZoneId,
    }

    impl Harness {
        fn new() -> Self {
            let mut manager = WorkspaceManager::default();
            let page_id = manager.add_page("Desk").id.clone();
            let zone_id = manager
                .add_zone(&page_id, "Files", Rect::new(0.0, 0.0, 400.0, 400.0), Rgba::TRANSPARENT)
                .expect("zone")
                .id
                .clone();
            Self {
                manager,
                interaction: InteractionState::default(),
                config: OverlayConfig::default(),
                zone_id,
            }
        }

        fn dispatch(&mut self, action: OverlayAction) -> Vec<RuntimeEffect> {
            reduce_overlay(
                &mut self.manager,
                &mut self.interaction,
                &mut self.config,
                action,
            )
            .expect("reduce")
        }

        fn rect(&self) -> Rect {
            self.manager.zone(&self.zone_id).expect("zone").screen_rect
        }
    }

    #[test]
    fn zone_drag_updates_live_and_persists_once_on_release() {
        let mut h = Harness::new();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        h.manager
            .subscribe(move |_, change| sink.borrow_mut().push(change.clone()));

        h.dispatch(OverlayAction::BeginZoneMove {
            zone_id: h.zone_id.clone(),
            pointer: PointerPosition::new(10.0, 10.0),
        });
        let update = h.dispatch(OverlayAction::UpdateZoneMove {
            pointer: PointerPosition::new(35.0, 50.0),
        });

        assert_eq!(h.rect(), Rect::new(25.0, 40.0, 425.0, 440.0));
        assert!(!update.contains(&RuntimeEffect::PersistWorkspace));
        assert!(changes.borrow().is_empty());

        let end = h.dispatch(OverlayAction::EndZoneMove);
        assert!(end.contains(&RuntimeEffect::PersistWorkspace));
        assert_eq!(
            changes.borrow().as_slice(),
            &[WorkspaceChange::ZoneChanged(h.zone_id.clone())]
        );
        assert!(h.interaction.dragging.is_none());
    }

    #[test]
    fn cancel_restores_snapshot_geometry_without_persisting() {
        let mut h = Harness::new();
        h.dispatch(OverlayAction::AddIcon {
            zone_id: h.zone_id.clone(),
            path: "/a.txt".to_string(),
            display_name: None,
        });
        let original = h.rect();
        let icon_before = h.manager.zone(&h.zone_id).expect("zone").icons[0].position;

        h.dispatch(OverlayAction::BeginZoneResize {
            zone_id: h.zone_id.clone(),
            handle: ResizeHandle::BottomRight,
            pointer: PointerPosition::new(400.0, 400.0),
        });
        h.dispatch(OverlayAction::UpdateZoneResize {
            pointer: PointerPosition::new(800.0, 500.0),
        });
        assert_eq!(h.rect(), Rect::new(0.0, 0.0, 800.0, 500.0));
        let icon_live = h.manager.zone(&h.zone_id).expect("zone").icons[0].position;
        assert_eq!(icon_live.left, 40.0);

        let effects = h.dispatch(OverlayAction::CancelZoneDrag);

        assert_eq!(h.rect(), original);
        assert_eq!(
            h.manager.zone(&h.zone_id).expect("zone").icons[0].position,
            icon_before
        );
        assert_eq!(effects, vec![RuntimeEffect::RepaintZone(h.zone_id.clone())]);
        assert!(!h.interaction.has_session());
    }

    #[test]
    fn resize_release_commits_and_reflows() {
        let mut h = Harness::new();
        h.dispatch(OverlayAction::AddIcon {
            zone_id: h.zone_id.clone(),
            path: "/a.txt".to_string(),
            display_name: None,
        });
        h.dispatch(OverlayAction::BeginZoneResize {
            zone_id: h.zone_id.clone(),
            handle: ResizeHandle::Right,
            pointer: PointerPosition::new(400.0, 200.0),
        });
        h.dispatch(OverlayAction::UpdateZoneResize {
            pointer: PointerPosition::new(0.0, 200.0),
        });
        let effects = h.dispatch(OverlayAction::EndZoneResize);

        assert_eq!(h.rect().width(), crate::interaction::MIN_ZONE_WIDTH);
        assert!(effects.contains(&RuntimeEffect::PersistWorkspace));
        let icon = h.manager.zone(&h.zone_id).expect("zone").icons[0].position;
        // 160 wide / 4 columns = 40 per cell; the 32-unit minimum icon stays inside it.
        assert_eq!(icon.left, 4.0);
        assert!(icon.right <= h.rect().width());
    }

    #[test]
    fn drag_commits_respect_config() {
        let mut h = Harness::new();
        h.config.persist_drag_commits = false;
        h.dispatch(OverlayAction::BeginZoneMove {
            zone_id: h.zone_id.clone(),
            pointer: PointerPosition::new(0.0, 0.0),
        });
        h.dispatch(OverlayAction::UpdateZoneMove {
            pointer: PointerPosition::new(5.0, 5.0),
        });
        let effects = h.dispatch(OverlayAction::EndZoneMove);
        assert!(!effects.contains(&RuntimeEffect::PersistWorkspace));
        assert_eq!(h.rect().left, 5.0);
    }

    #[test]
    fn drop_files_adds_icons_with_single_persist() {
        let mut h = Harness::new();
        let effects = h.dispatch(OverlayAction::DropFiles {
            zone_id: h.zone_id.clone(),
            paths: vec![
                "C:/Users/me/b.txt".to_string(),
                "  ".to_string(),
                "C:/Users/me/A.txt".to_string(),
            ],
        });

        let zone = h.manager.zone(&h.zone_id).expect("zone");
        assert_eq!(zone.icons.len(), 2);
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::PersistWorkspace,
                RuntimeEffect::RepaintZone(h.zone_id.clone())
            ]
        );
    }

    #[test]
    fn apply_zone_properties_sorts_and_reflows() {
        let mut h = Harness::new();
        for path in ["/x/charlie", "/x/Alpha", "/x/bravo"] {
            h.dispatch(OverlayAction::AddIcon {
                zone_id: h.zone_id.clone(),
                path: path.to_string(),
                display_name: None,
            });
        }
        let mut properties = ZoneProperties::from_zone(h.manager.zone(&h.zone_id).expect("zone"));
        properties.grid_cols = 0;
        properties.sort_ascending = false;
        properties.title = "Projects".to_string();

        h.dispatch(OverlayAction::ApplyZoneProperties {
            zone_id: h.zone_id.clone(),
            properties,
        });

        let zone = h.manager.zone(&h.zone_id).expect("zone");
        let names: Vec<_> = zone.icons.iter().map(|i| i.display_name.as_str()).collect();
        assert_eq!(names, vec!["charlie", "bravo", "Alpha"]);
        assert_eq!(zone.grid_cols, 4);
        assert_eq!(zone.title, "Projects");
        assert_eq!(zone.icons[0].position.left, 20.0);
    }

    #[test]
    fn delete_selected_removes_across_zones() {
        let mut h = Harness::new();
        let page_id = h.manager.active_page().expect("page").id.clone();
        let other = h
            .manager
            .add_zone(&page_id, "Other", Rect::new(500.0, 0.0, 900.0, 400.0), Rgba::TRANSPARENT)
            .expect("zone")
            .id
            .clone();
        let a = h.manager.add_icon(&h.zone_id, "/a", None).expect("a").id.clone();
        h.manager.add_icon(&h.zone_id, "/keep", None).expect("keep");
        let b = h.manager.add_icon(&other, "/b", None).expect("b").id.clone();
        h.dispatch(OverlayAction::SelectIcon {
            zone_id: h.zone_id.clone(),
            icon_id: a,
            additive: false,
        });
        h.dispatch(OverlayAction::SelectIcon {
            zone_id: other.clone(),
            icon_id: b,
            additive: true,
        });

        let effects = h.dispatch(OverlayAction::DeleteSelected);

        assert_eq!(effects[0], RuntimeEffect::PersistWorkspace);
        assert_eq!(h.manager.zone(&h.zone_id).expect("zone").icons.len(), 1);
        assert!(h.manager.zone(&other).expect("zone").icons.is_empty());
        assert!(h.manager.selected_icons().is_empty());
    }

    #[test]
    fn launch_emits_target_and_search_only_repaints() {
        let mut h = Harness::new();
        let icon = h
            .manager
            .add_icon(&h.zone_id, "C:/apps/editor.exe", None)
            .expect("icon")
            .id
            .clone();
        let before = h.manager.workspace().clone();

        let launch = h.dispatch(OverlayAction::LaunchIcon {
            zone_id: h.zone_id.clone(),
            icon_id: icon,
        });
        let search = h.dispatch(OverlayAction::SetSearchTerm {
            term: "edit".to_string(),
        });

        assert_eq!(
            launch,
            vec![RuntimeEffect::LaunchTarget("C:/apps/editor.exe".to_string())]
        );
        assert_eq!(search, vec![RuntimeEffect::RepaintAll]);
        assert_eq!(h.manager.workspace(), &before);
        assert_eq!(h.interaction.search.term(), "edit");
    }

    #[test]
    fn add_zone_without_geometry_uses_theme_and_config_defaults() {
        let mut h = Harness::new();
        let page_id = h.manager.active_page().expect("page").id.clone();
        h.dispatch(OverlayAction::SetTheme {
            theme: Theme::Light,
        });
        h.dispatch(OverlayAction::AddZone {
            page_id: page_id.clone(),
            title: "New".to_string(),
            rect: None,
            color: None,
        });
        let zone = h.manager.page(&page_id).expect("page").zones.last().expect("zone");
        assert_eq!(zone.screen_rect, h.config.cascaded_zone_rect(1));
        assert_eq!(
            zone.background_color,
            ThemePalette::LIGHT.zone_default_background
        );
    }

    #[test]
    fn unknown_zone_errors_leave_state_untouched() {
        let mut h = Harness::new();
        let before = h.manager.workspace().clone();
        let ghost = ZoneId("ghost".to_string());
        let err = reduce_overlay(
            &mut h.manager,
            &mut h.interaction,
            &mut h.config,
            OverlayAction::DropFiles {
                zone_id: ghost.clone(),
                paths: vec!["/a".to_string()],
            },
        )
        .expect_err("missing zone");
        assert_eq!(err, ManagerError::ZoneNotFound(ghost));
        assert_eq!(h.manager.workspace(), &before);
    }

    #[test]
    fn surface_recreation_invalidates_bitmaps() {
        let mut h = Harness::new();
        assert_eq!(
            h.dispatch(OverlayAction::SurfaceRecreated),
            vec![RuntimeEffect::InvalidateBitmapCache, RuntimeEffect::RepaintAll]
        );
    }
}
