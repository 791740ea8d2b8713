//! Workspace manager: the single mutation authority over pages, zones, and icons.
//!
//! Every successful structural mutation emits one or more [`WorkspaceChange`] notifications to
//! subscribed observers after the mutation has fully completed. Failed calls change nothing and
//! notify nobody. Queries hand out shared references only, so presentation code cannot bypass
//! the manager.

use thiserror::Error;

use crate::geometry::{Rect, Rgba};
use crate::model::{Icon, IconId, Page, PageId, Workspace, Zone, ZoneId};
use crate::reflow::reflow_zone;
use crate::sort::sort_zone;
use crate::theme::{apply_theme_defaults, Theme};

/// Change notifications delivered to observers after a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceChange {
    PageAdded(PageId),
    PageRemoved(PageId),
    PageRenamed(PageId),
    PagesReordered,
    /// Wallpaper or overlay tint changed.
    PagePropertiesChanged(PageId),
    ActivePageChanged(Option<PageId>),
    ZoneAdded { page_id: PageId, zone_id: ZoneId },
    ZoneRemoved { page_id: PageId, zone_id: ZoneId },
    /// Zone properties or committed geometry changed.
    ZoneChanged(ZoneId),
    /// Icon membership, order, or positions changed.
    IconsChanged(ZoneId),
    SelectionChanged,
    ThemeChanged(Theme),
    WorkspaceReplaced,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors returned by [`WorkspaceManager`] entry points. A failed call leaves state untouched.
pub enum ManagerError {
    #[error("page `{0}` not found")]
    PageNotFound(PageId),
    #[error("zone `{0}` not found")]
    ZoneNotFound(ZoneId),
    #[error("icon `{0}` not found")]
    IconNotFound(IconId),
    #[error("cannot move page from index {from} to {to} with {len} pages")]
    InvalidPageMove { from: usize, to: usize, len: usize },
}

/// Handle returned by [`WorkspaceManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Workspace, &WorkspaceChange)>;

/// Owns the [`Workspace`] and enforces its identity, ownership, and active-page invariants.
pub struct WorkspaceManager {
    workspace: Workspace,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Default for WorkspaceManager {
    fn default() -> Self {
        Self::new(Workspace::default())
    }
}

impl std::fmt::Debug for WorkspaceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceManager")
            .field("workspace", &self.workspace)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl WorkspaceManager {
    pub fn new(mut workspace: Workspace) -> Self {
        workspace.normalize();
        Self {
            workspace,
            observers: Vec::new(),
            next_subscription: 1,
        }
    }

    // Notification -------------------------------------------------------------------------

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&Workspace, &WorkspaceChange) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` when the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: WorkspaceChange) {
        tracing::trace!(?change, observers = self.observers.len(), "workspace change");
        for (_, observer) in &mut self.observers {
            observer(&self.workspace, &change);
        }
    }

    // Queries ------------------------------------------------------------------------------

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn pages(&self) -> &[Page] {
        &self.workspace.pages
    }

    pub fn page(&self, page_id: &PageId) -> Option<&Page> {
        self.workspace.page(page_id)
    }

    pub fn zone(&self, zone_id: &ZoneId) -> Option<&Zone> {
        self.workspace.zone(zone_id)
    }

    pub fn page_of_zone(&self, zone_id: &ZoneId) -> Option<&Page> {
        self.workspace.page_of_zone(zone_id)
    }

    pub fn icon(&self, zone_id: &ZoneId, icon_id: &IconId) -> Option<&Icon> {
        self.workspace.zone(zone_id).and_then(|zone| zone.icon(icon_id))
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.workspace.active_page()
    }

    pub fn active_page_index(&self) -> Option<usize> {
        self.workspace.active_page_index()
    }

    pub fn theme(&self) -> Theme {
        self.workspace.theme
    }

    /// Returns the snapshot to persist, with page order re-derived from list position.
    pub fn snapshot(&self) -> Workspace {
        let mut snapshot = self.workspace.clone();
        snapshot.rederive_page_order();
        snapshot
    }

    fn page_index_or_err(&self, page_id: &PageId) -> Result<usize, ManagerError> {
        self.workspace.page_index(page_id).ok_or_else(|| {
            tracing::warn!(page_id = %page_id, "page not found");
            ManagerError::PageNotFound(page_id.clone())
        })
    }

    fn zone_or_err(&mut self, zone_id: &ZoneId) -> Result<&mut Zone, ManagerError> {
        self.workspace.zone_mut(zone_id).ok_or_else(|| {
            tracing::warn!(zone_id = %zone_id, "zone not found");
            ManagerError::ZoneNotFound(zone_id.clone())
        })
    }

    fn icon_missing(zone_id: &ZoneId, icon_id: &IconId) -> ManagerError {
        tracing::warn!(zone_id = %zone_id, icon_id = %icon_id, "icon not found");
        ManagerError::IconNotFound(icon_id.clone())
    }

    // Pages --------------------------------------------------------------------------------

    /// Appends a page. The first page added to an empty workspace becomes active.
    pub fn add_page(&mut self, name: impl Into<String>) -> &Page {
        let page = Page::new(name, self.workspace.pages.len() as u32);
        let page_id = page.id.clone();
        tracing::info!(page_id = %page_id, name = %page.name, "page added");
        self.workspace.pages.push(page);
        let activated = self.workspace.active_page().is_none();
        if activated {
            self.workspace.active_page_id = Some(page_id.clone());
        }
        self.notify(WorkspaceChange::PageAdded(page_id.clone()));
        if activated {
            self.notify(WorkspaceChange::ActivePageChanged(Some(page_id)));
        }
        let last = self.workspace.pages.len() - 1;
        &self.workspace.pages[last]
    }

    /// Removes a page with its zones and icons.
    ///
    /// When the removed page was active, the page before it (or the new first page) becomes
    /// active; an emptied workspace has no active page.
    pub fn remove_page(&mut self, page_id: &PageId) -> Result<(), ManagerError> {
        let idx = self.page_index_or_err(page_id)?;
        let was_active = self.workspace.active_page_id.as_ref() == Some(page_id);
        let removed = self.workspace.pages.remove(idx);
        self.workspace.rederive_page_order();
        let next_active = was_active.then(|| {
            self.workspace
                .pages
                .get(idx.saturating_sub(1))
                .map(|page| page.id.clone())
        });
        if let Some(next) = &next_active {
            self.workspace.active_page_id = next.clone();
        }
        tracing::info!(
            page_id = %page_id,
            zones = removed.zones.len(),
            "page removed"
        );

        self.notify(WorkspaceChange::PageRemoved(page_id.clone()));
        if let Some(next) = next_active {
            self.notify(WorkspaceChange::ActivePageChanged(next));
        }
        if removed.zones.iter().any(Zone::has_selection) {
            self.notify(WorkspaceChange::SelectionChanged);
        }
        Ok(())
    }

    pub fn rename_page(&mut self, page_id: &PageId, name: impl Into<String>) -> Result<(), ManagerError> {
        let idx = self.page_index_or_err(page_id)?;
        let name = name.into();
        let page = &mut self.workspace.pages[idx];
        if page.name == name {
            return Ok(());
        }
        page.name = name;
        self.notify(WorkspaceChange::PageRenamed(page_id.clone()));
        Ok(())
    }

    /// Moves the page at `from` to index `to`. The active page stays the same logical page.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<(), ManagerError> {
        let len = self.workspace.pages.len();
        if from >= len || to >= len || from == to {
            tracing::warn!(from, to, len, "rejected page move");
            return Err(ManagerError::InvalidPageMove { from, to, len });
        }
        let page = self.workspace.pages.remove(from);
        self.workspace.pages.insert(to, page);
        self.workspace.rederive_page_order();
        tracing::debug!(from, to, "page moved");
        self.notify(WorkspaceChange::PagesReordered);
        Ok(())
    }

    /// Activates a page. Returns whether the active page actually changed.
    pub fn set_active_page(&mut self, page_id: &PageId) -> Result<bool, ManagerError> {
        self.page_index_or_err(page_id)?;
        if self.workspace.active_page_id.as_ref() == Some(page_id) {
            return Ok(false);
        }
        self.workspace.active_page_id = Some(page_id.clone());
        self.notify(WorkspaceChange::ActivePageChanged(Some(page_id.clone())));
        Ok(true)
    }

    pub fn set_page_wallpaper(
        &mut self,
        page_id: &PageId,
        wallpaper_path: Option<String>,
    ) -> Result<(), ManagerError> {
        let idx = self.page_index_or_err(page_id)?;
        let wallpaper_path = wallpaper_path.filter(|path| !path.is_empty());
        let page = &mut self.workspace.pages[idx];
        if page.wallpaper_path == wallpaper_path {
            return Ok(());
        }
        page.wallpaper_path = wallpaper_path;
        self.notify(WorkspaceChange::PagePropertiesChanged(page_id.clone()));
        Ok(())
    }

    pub fn set_page_overlay(&mut self, page_id: &PageId, color: Rgba) -> Result<(), ManagerError> {
        let idx = self.page_index_or_err(page_id)?;
        let color = color.clamped();
        let page = &mut self.workspace.pages[idx];
        if page.overlay_color == color {
            return Ok(());
        }
        page.overlay_color = color;
        self.notify(WorkspaceChange::PagePropertiesChanged(page_id.clone()));
        Ok(())
    }

    // Zones --------------------------------------------------------------------------------

    pub fn add_zone(
        &mut self,
        page_id: &PageId,
        title: impl Into<String>,
        screen_rect: Rect,
        background_color: Rgba,
    ) -> Result<&Zone, ManagerError> {
        let page_idx = self.page_index_or_err(page_id)?;
        let zone = Zone::new(title, screen_rect, background_color.clamped());
        let zone_id = zone.id.clone();
        tracing::info!(page_id = %page_id, zone_id = %zone_id, "zone added");
        self.workspace.pages[page_idx].zones.push(zone);
        self.notify(WorkspaceChange::ZoneAdded {
            page_id: page_id.clone(),
            zone_id,
        });
        let zones = &self.workspace.pages[page_idx].zones;
        Ok(&zones[zones.len() - 1])
    }

    pub fn remove_zone(&mut self, page_id: &PageId, zone_id: &ZoneId) -> Result<(), ManagerError> {
        let page_idx = self.page_index_or_err(page_id)?;
        let zone_idx = self.workspace.pages[page_idx]
            .zone_index(zone_id)
            .ok_or_else(|| {
                tracing::warn!(page_id = %page_id, zone_id = %zone_id, "zone not found on page");
                ManagerError::ZoneNotFound(zone_id.clone())
            })?;
        let removed = self.workspace.pages[page_idx].zones.remove(zone_idx);
        tracing::info!(zone_id = %zone_id, icons = removed.icons.len(), "zone removed");
        self.notify(WorkspaceChange::ZoneRemoved {
            page_id: page_id.clone(),
            zone_id: zone_id.clone(),
        });
        if removed.has_selection() {
            self.notify(WorkspaceChange::SelectionChanged);
        }
        Ok(())
    }

    /// Applies `mutator` to a zone's properties.
    ///
    /// Non-positive grid dimensions are coerced afterwards and the zone id cannot be changed.
    /// Derived state is not recomputed; follow with [`Self::reflow`], [`Self::sort`], or
    /// [`Self::sort_and_reflow`] as needed.
    pub fn update_zone(
        &mut self,
        zone_id: &ZoneId,
        mutator: impl FnOnce(&mut Zone),
    ) -> Result<(), ManagerError> {
        let zone = self.zone_or_err(zone_id)?;
        mutator(zone);
        zone.id = zone_id.clone();
        zone.background_color = zone.background_color.clamped();
        zone.coerce_grid();
        self.notify(WorkspaceChange::ZoneChanged(zone_id.clone()));
        Ok(())
    }

    /// Commits a zone's screen geometry (end of a drag or resize).
    pub fn set_zone_geometry(&mut self, zone_id: &ZoneId, screen_rect: Rect) -> Result<(), ManagerError> {
        let zone = self.zone_or_err(zone_id)?;
        zone.screen_rect = screen_rect;
        tracing::debug!(zone_id = %zone_id, ?screen_rect, "zone geometry committed");
        self.notify(WorkspaceChange::ZoneChanged(zone_id.clone()));
        Ok(())
    }

    /// Applies in-progress drag geometry without notifying observers.
    ///
    /// Only the dragged zone is touched; when `reflow` is set its icons are re-laid out for the
    /// new width.
    pub fn preview_zone_geometry(
        &mut self,
        zone_id: &ZoneId,
        screen_rect: Rect,
        reflow: bool,
    ) -> Result<(), ManagerError> {
        let zone = self.zone_or_err(zone_id)?;
        zone.screen_rect = screen_rect;
        if reflow {
            reflow_zone(zone);
        }
        Ok(())
    }

    pub fn reflow(&mut self, zone_id: &ZoneId) -> Result<(), ManagerError> {
        reflow_zone(self.zone_or_err(zone_id)?);
        self.notify(WorkspaceChange::IconsChanged(zone_id.clone()));
        Ok(())
    }

    pub fn sort(&mut self, zone_id: &ZoneId) -> Result<(), ManagerError> {
        sort_zone(self.zone_or_err(zone_id)?);
        self.notify(WorkspaceChange::IconsChanged(zone_id.clone()));
        Ok(())
    }

    pub fn sort_and_reflow(&mut self, zone_id: &ZoneId) -> Result<(), ManagerError> {
        let zone = self.zone_or_err(zone_id)?;
        sort_zone(zone);
        reflow_zone(zone);
        self.notify(WorkspaceChange::IconsChanged(zone_id.clone()));
        Ok(())
    }

    // Icons --------------------------------------------------------------------------------

    /// Appends a shortcut to a zone and reflows it.
    pub fn add_icon(
        &mut self,
        zone_id: &ZoneId,
        target_path: impl Into<String>,
        display_name: Option<String>,
    ) -> Result<&Icon, ManagerError> {
        let zone = self.zone_or_err(zone_id)?;
        let icon = Icon::new(target_path, display_name);
        tracing::info!(
            zone_id = %zone_id,
            icon_id = %icon.id,
            path = %icon.target_path,
            "icon added"
        );
        zone.icons.push(icon);
        reflow_zone(zone);
        self.notify(WorkspaceChange::IconsChanged(zone_id.clone()));
        let zone = self.zone_or_err(zone_id)?;
        let last = zone.icons.len() - 1;
        Ok(&zone.icons[last])
    }

    /// Removes one icon and reflows its zone.
    pub fn remove_icon(&mut self, zone_id: &ZoneId, icon_id: &IconId) -> Result<(), ManagerError> {
        self.remove_icons(zone_id, std::slice::from_ref(icon_id))
    }

    /// Removes several icons from one zone with a single reflow.
    ///
    /// Fails without removing anything when any id is unknown.
    pub fn remove_icons(&mut self, zone_id: &ZoneId, icon_ids: &[IconId]) -> Result<(), ManagerError> {
        let zone = self.zone_or_err(zone_id)?;
        if let Some(missing) = icon_ids.iter().find(|id| zone.icon(id).is_none()) {
            return Err(Self::icon_missing(zone_id, missing));
        }
        if icon_ids.is_empty() {
            return Ok(());
        }
        let had_selection = zone
            .icons
            .iter()
            .any(|icon| icon.selected && icon_ids.contains(&icon.id));
        zone.icons.retain(|icon| !icon_ids.contains(&icon.id));
        reflow_zone(zone);
        tracing::info!(zone_id = %zone_id, removed = icon_ids.len(), "icons removed");
        self.notify(WorkspaceChange::IconsChanged(zone_id.clone()));
        if had_selection {
            self.notify(WorkspaceChange::SelectionChanged);
        }
        Ok(())
    }

    /// Moves an icon to another zone (or another slot in the same zone), keeping its identity.
    ///
    /// `index` is clamped to the target's icon count; `None` appends.
    pub fn move_icon(
        &mut self,
        from_zone: &ZoneId,
        icon_id: &IconId,
        to_zone: &ZoneId,
        index: Option<usize>,
    ) -> Result<(), ManagerError> {
        self.zone_or_err(to_zone)?;
        let source = self.zone_or_err(from_zone)?;
        let source_idx = source
            .icon_index(icon_id)
            .ok_or_else(|| Self::icon_missing(from_zone, icon_id))?;
        let icon = source.icons.remove(source_idx);

        let target = self.zone_or_err(to_zone)?;
        let insert_at = index.unwrap_or(target.icons.len()).min(target.icons.len());
        target.icons.insert(insert_at, icon);
        reflow_zone(target);
        if from_zone != to_zone {
            reflow_zone(self.zone_or_err(from_zone)?);
        }

        tracing::debug!(
            icon_id = %icon_id,
            from = %from_zone,
            to = %to_zone,
            index = insert_at,
            "icon moved"
        );
        self.notify(WorkspaceChange::IconsChanged(from_zone.clone()));
        if from_zone != to_zone {
            self.notify(WorkspaceChange::IconsChanged(to_zone.clone()));
        }
        Ok(())
    }

    // Selection ----------------------------------------------------------------------------

    /// Selects an icon. Non-additive selection clears every other selection first; additive
    /// selection toggles the icon.
    pub fn select_icon(
        &mut self,
        zone_id: &ZoneId,
        icon_id: &IconId,
        additive: bool,
    ) -> Result<(), ManagerError> {
        let zone = self.zone_or_err(zone_id)?;
        if zone.icon(icon_id).is_none() {
            return Err(Self::icon_missing(zone_id, icon_id));
        }
        if additive {
            if let Some(icon) = zone.icon_mut(icon_id) {
                icon.selected = !icon.selected;
            }
        } else {
            for icon in self.workspace.zones_mut().flat_map(|zone| zone.icons.iter_mut()) {
                icon.selected = &icon.id == icon_id;
            }
        }
        self.notify(WorkspaceChange::SelectionChanged);
        Ok(())
    }

    /// Clears every selection. Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        let mut cleared = false;
        for icon in self.workspace.zones_mut().flat_map(|zone| zone.icons.iter_mut()) {
            cleared |= icon.selected;
            icon.selected = false;
        }
        if cleared {
            self.notify(WorkspaceChange::SelectionChanged);
        }
        cleared
    }

    /// Returns `(zone, icon)` pairs for every selected icon in workspace order.
    pub fn selected_icons(&self) -> Vec<(ZoneId, IconId)> {
        self.workspace
            .zones()
            .flat_map(|zone| {
                zone.icons
                    .iter()
                    .filter(|icon| icon.selected)
                    .map(move |icon| (zone.id.clone(), icon.id.clone()))
            })
            .collect()
    }

    // Workspace ----------------------------------------------------------------------------

    /// Switches theme and repairs solid zones left without a visible color. Returns whether the
    /// theme changed.
    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.workspace.theme == theme {
            return false;
        }
        self.workspace.theme = theme;
        let repaired = apply_theme_defaults(&mut self.workspace);
        tracing::info!(theme = theme.as_str(), repaired, "theme changed");
        self.notify(WorkspaceChange::ThemeChanged(theme));
        true
    }

    /// Adopts a loaded snapshot wholesale after normalizing it.
    pub fn replace_workspace(&mut self, mut workspace: Workspace) {
        if workspace.normalize() {
            tracing::debug!("adopted workspace required repairs");
        }
        tracing::info!(
            pages = workspace.pages.len(),
            icons = workspace.icon_count(),
            "workspace replaced"
        );
        self.workspace = workspace;
        self.notify(WorkspaceChange::WorkspaceReplaced);
    }
}
