//! Workspace data model: identifiers, icons, zones, pages, and the persisted workspace shape.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geometry::{Rect, Rgba};
use crate::theme::{Theme, ThemePalette};

pub const WORKSPACE_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_GRID_SIZE: i32 = 4;
pub const DEFAULT_PAGE_NAME: &str = "My Desktop";
pub const DEFAULT_ZONE_TITLE: &str = "My Files";
pub const DEFAULT_ZONE_RECT: Rect = Rect::new(50.0, 50.0, 350.0, 350.0);

/// Builds an identifier of the form `<prefix>_<unix ms>_<8 hex chars>`.
fn generate_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{prefix}_{}_{}",
        overlay_host::unix_time_ms_now(),
        &uuid[..8]
    )
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconId(pub String);

impl PageId {
    pub fn generate() -> Self {
        Self(generate_id("page"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ZoneId {
    pub fn generate() -> Self {
        Self(generate_id("zone"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl IconId {
    pub fn generate() -> Self {
        Self(generate_id("icon"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundType {
    #[default]
    Transparent,
    SolidColor,
    Blurred,
    Image,
}

/// Icon ordering key. `Type` and `DateAdded` are accepted and persisted but order nothing yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Name,
    Path,
    Type,
    DateAdded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub id: IconId,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "path")]
    pub target_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    #[serde(rename = "relativePosition", default)]
    pub position: Rect,
    #[serde(skip)]
    pub selected: bool,
}

impl Icon {
    /// Creates an icon with a fresh id; the display name defaults to the path's file stem.
    pub fn new(target_path: impl Into<String>, display_name: Option<String>) -> Self {
        let target_path = target_path.into();
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| file_stem(&target_path));
        Self {
            id: IconId::generate(),
            display_name,
            target_path,
            icon_path: None,
            position: Rect::default(),
            selected: false,
        }
    }

    /// Key used to look up the icon's bitmap in the rendering cache.
    pub fn bitmap_key(&self) -> &str {
        self.icon_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or(&self.target_path)
    }
}

/// Returns the final path component without its last extension.
///
/// Both `/` and `\` are treated as separators so Windows paths stored on any host resolve the
/// same name. Dotfiles such as `.profile` keep their full name.
pub fn file_stem(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    let file_name = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[..idx].to_string(),
        _ => file_name.to_string(),
    }
}

fn default_grid() -> i32 {
    DEFAULT_GRID_SIZE
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: ZoneId,
    #[serde(default)]
    pub title: String,
    pub screen_rect: Rect,
    #[serde(default)]
    pub background_type: BackgroundType,
    #[serde(default)]
    pub background_color: Rgba,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_path: Option<String>,
    #[serde(default)]
    pub corner_radius: u32,
    #[serde(default)]
    pub blur_background_image: bool,
    #[serde(default = "default_grid")]
    pub grid_rows: i32,
    #[serde(default = "default_grid")]
    pub grid_cols: i32,
    #[serde(default)]
    pub sort_key: SortKey,
    #[serde(default = "default_true")]
    pub sort_ascending: bool,
    #[serde(default)]
    pub icons: Vec<Icon>,
}

impl Zone {
    pub fn new(title: impl Into<String>, screen_rect: Rect, background_color: Rgba) -> Self {
        Self {
            id: ZoneId::generate(),
            title: title.into(),
            screen_rect,
            background_type: BackgroundType::Transparent,
            background_color,
            background_image_path: None,
            corner_radius: 0,
            blur_background_image: false,
            grid_rows: DEFAULT_GRID_SIZE,
            grid_cols: DEFAULT_GRID_SIZE,
            sort_key: SortKey::Name,
            sort_ascending: true,
            icons: Vec::new(),
        }
    }

    pub fn icon(&self, icon_id: &IconId) -> Option<&Icon> {
        self.icons.iter().find(|icon| &icon.id == icon_id)
    }

    pub fn icon_mut(&mut self, icon_id: &IconId) -> Option<&mut Icon> {
        self.icons.iter_mut().find(|icon| &icon.id == icon_id)
    }

    pub fn icon_index(&self, icon_id: &IconId) -> Option<usize> {
        self.icons.iter().position(|icon| &icon.id == icon_id)
    }

    pub fn has_selection(&self) -> bool {
        self.icons.iter().any(|icon| icon.selected)
    }

    /// Zone rectangle in its own coordinate space (origin at the top-left corner).
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.screen_rect.width(), self.screen_rect.height())
    }

    /// Replaces non-positive grid dimensions with the default. Returns whether anything changed.
    pub fn coerce_grid(&mut self) -> bool {
        let mut changed = false;
        if self.grid_rows <= 0 {
            tracing::debug!(zone_id = %self.id, grid_rows = self.grid_rows, "coercing grid rows");
            self.grid_rows = DEFAULT_GRID_SIZE;
            changed = true;
        }
        if self.grid_cols <= 0 {
            tracing::debug!(zone_id = %self.id, grid_cols = self.grid_cols, "coercing grid cols");
            self.grid_cols = DEFAULT_GRID_SIZE;
            changed = true;
        }
        changed
    }
}

/// Editable zone properties as presented by the hub panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneProperties {
    pub title: String,
    pub background_type: BackgroundType,
    pub background_color: Rgba,
    pub background_image_path: Option<String>,
    pub corner_radius: u32,
    pub blur_background_image: bool,
    pub grid_rows: i32,
    pub grid_cols: i32,
    pub sort_key: SortKey,
    pub sort_ascending: bool,
}

impl ZoneProperties {
    pub fn from_zone(zone: &Zone) -> Self {
        Self {
            title: zone.title.clone(),
            background_type: zone.background_type,
            background_color: zone.background_color,
            background_image_path: zone.background_image_path.clone(),
            corner_radius: zone.corner_radius,
            blur_background_image: zone.blur_background_image,
            grid_rows: zone.grid_rows,
            grid_cols: zone.grid_cols,
            sort_key: zone.sort_key,
            sort_ascending: zone.sort_ascending,
        }
    }

    pub fn apply_to(self, zone: &mut Zone) {
        zone.title = self.title;
        zone.background_type = self.background_type;
        zone.background_color = self.background_color;
        zone.background_image_path = self.background_image_path.filter(|path| !path.is_empty());
        zone.corner_radius = self.corner_radius;
        zone.blur_background_image = self.blur_background_image;
        zone.grid_rows = self.grid_rows;
        zone.grid_cols = self.grid_cols;
        zone.sort_key = self.sort_key;
        zone.sort_ascending = self.sort_ascending;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallpaper_path: Option<String>,
    #[serde(default)]
    pub overlay_color: Rgba,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl Page {
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        Self {
            id: PageId::generate(),
            name: name.into(),
            order,
            wallpaper_path: None,
            overlay_color: Rgba::TRANSPARENT,
            zones: Vec::new(),
        }
    }

    pub fn zone(&self, zone_id: &ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|zone| &zone.id == zone_id)
    }

    pub fn zone_index(&self, zone_id: &ZoneId) -> Option<usize> {
        self.zones.iter().position(|zone| &zone.id == zone_id)
    }
}

mod active_page_id_serde {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<PageId>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_ref().map(PageId::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PageId>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|id| !id.is_empty()).map(PageId))
    }
}

fn default_schema_version() -> u32 {
    WORKSPACE_SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default, with = "active_page_id_serde")]
    pub active_page_id: Option<PageId>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            schema_version: WORKSPACE_SCHEMA_VERSION,
            active_page_id: None,
            pages: Vec::new(),
        }
    }
}

impl Workspace {
    /// First-run layout: one active page holding one empty zone tinted with the theme default.
    pub fn default_layout(theme: Theme) -> Self {
        let mut page = Page::new(DEFAULT_PAGE_NAME, 0);
        page.zones.push(Zone::new(
            DEFAULT_ZONE_TITLE,
            DEFAULT_ZONE_RECT,
            ThemePalette::for_theme(theme).zone_default_background,
        ));
        Self {
            theme,
            schema_version: WORKSPACE_SCHEMA_VERSION,
            active_page_id: Some(page.id.clone()),
            pages: vec![page],
        }
    }

    pub fn page(&self, page_id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|page| &page.id == page_id)
    }

    pub fn page_mut(&mut self, page_id: &PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|page| &page.id == page_id)
    }

    pub fn page_index(&self, page_id: &PageId) -> Option<usize> {
        self.pages.iter().position(|page| &page.id == page_id)
    }

    /// Returns `(page index, zone index)` for the zone, scanning pages in order.
    pub fn locate_zone(&self, zone_id: &ZoneId) -> Option<(usize, usize)> {
        self.pages.iter().enumerate().find_map(|(page_idx, page)| {
            page.zone_index(zone_id).map(|zone_idx| (page_idx, zone_idx))
        })
    }

    pub fn zone(&self, zone_id: &ZoneId) -> Option<&Zone> {
        self.pages.iter().find_map(|page| page.zone(zone_id))
    }

    pub fn zone_mut(&mut self, zone_id: &ZoneId) -> Option<&mut Zone> {
        self.pages
            .iter_mut()
            .flat_map(|page| page.zones.iter_mut())
            .find(|zone| &zone.id == zone_id)
    }

    pub fn page_of_zone(&self, zone_id: &ZoneId) -> Option<&Page> {
        self.pages.iter().find(|page| page.zone(zone_id).is_some())
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.pages.iter().flat_map(|page| page.zones.iter())
    }

    pub fn zones_mut(&mut self) -> impl Iterator<Item = &mut Zone> {
        self.pages.iter_mut().flat_map(|page| page.zones.iter_mut())
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.active_page_id
            .as_ref()
            .and_then(|page_id| self.page(page_id))
    }

    pub fn active_page_index(&self) -> Option<usize> {
        self.active_page_id
            .as_ref()
            .and_then(|page_id| self.page_index(page_id))
    }

    pub fn icon_count(&self) -> usize {
        self.zones().map(|zone| zone.icons.len()).sum()
    }

    pub fn rederive_page_order(&mut self) {
        for (idx, page) in self.pages.iter_mut().enumerate() {
            page.order = idx as u32;
        }
    }

    /// Repairs a snapshot adopted from outside the manager.
    ///
    /// Pages are stably ordered by their stored `order` and renumbered, duplicate ids are
    /// regenerated, grid dimensions are coerced, and a dangling active page falls back to the
    /// first page. Returns whether anything was repaired.
    pub fn normalize(&mut self) -> bool {
        let mut repaired = false;

        let order_before: Vec<u32> = self.pages.iter().map(|page| page.order).collect();
        self.pages.sort_by_key(|page| page.order);
        self.rederive_page_order();
        let order_after: Vec<u32> = self.pages.iter().map(|page| page.order).collect();
        repaired |= order_before != order_after;

        let mut seen = HashSet::new();
        for page in &mut self.pages {
            if !seen.insert(page.id.0.clone()) {
                tracing::warn!(page_id = %page.id, "duplicate page id regenerated");
                page.id = PageId::generate();
                seen.insert(page.id.0.clone());
                repaired = true;
            }
            for zone in &mut page.zones {
                if !seen.insert(zone.id.0.clone()) {
                    tracing::warn!(zone_id = %zone.id, "duplicate zone id regenerated");
                    zone.id = ZoneId::generate();
                    seen.insert(zone.id.0.clone());
                    repaired = true;
                }
                repaired |= zone.coerce_grid();
                for icon in &mut zone.icons {
                    if !seen.insert(icon.id.0.clone()) {
                        tracing::warn!(icon_id = %icon.id, "duplicate icon id regenerated");
                        icon.id = IconId::generate();
                        seen.insert(icon.id.0.clone());
                        repaired = true;
                    }
                    icon.selected = false;
                }
            }
        }

        if self.active_page().is_none() {
            let fallback = self.pages.first().map(|page| page.id.clone());
            if fallback != self.active_page_id {
                self.active_page_id = fallback;
                repaired = true;
            }
        }
        repaired
    }
}
