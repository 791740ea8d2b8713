//! Theme selection and the color palettes that drive tabs, zones, and the hub panel.

use serde::{Deserialize, Serialize};

use crate::geometry::Rgba;
use crate::model::{BackgroundType, Workspace};

/// Overlay color theme. Persisted by name; unknown names fall back to [`Theme::Dark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "Light" => Self::Light,
            "Dark" => Self::Dark,
            other => {
                tracing::debug!(theme = other, "unknown theme name, falling back to Dark");
                Self::Dark
            }
        }
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<Theme> for String {
    fn from(value: Theme) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub tab_inactive: Rgba,
    pub tab_active: Rgba,
    pub tab_text_active: Rgba,
    pub tab_text_inactive: Rgba,
    pub zone_default_background: Rgba,
    pub hub_background: Rgba,
    pub hub_text: Rgba,
}

impl ThemePalette {
    pub const DARK: Self = Self {
        tab_inactive: Rgba::new(0.15, 0.15, 0.15, 0.85),
        tab_active: Rgba::new(0.05, 0.05, 0.05, 0.9),
        tab_text_active: Rgba::new(1.0, 1.0, 1.0, 1.0),
        tab_text_inactive: Rgba::new(0.7, 0.7, 0.7, 1.0),
        zone_default_background: Rgba::new(0.2, 0.2, 0.2, 0.5),
        hub_background: Rgba::new(0.1, 0.1, 0.1, 1.0),
        hub_text: Rgba::new(0.9, 0.9, 0.9, 1.0),
    };

    pub const LIGHT: Self = Self {
        tab_inactive: Rgba::new(0.85, 0.85, 0.85, 0.9),
        tab_active: Rgba::new(1.0, 1.0, 1.0, 0.95),
        tab_text_active: Rgba::new(0.0, 0.0, 0.0, 1.0),
        tab_text_inactive: Rgba::new(0.2, 0.2, 0.2, 1.0),
        zone_default_background: Rgba::new(0.9, 0.9, 0.9, 0.6),
        hub_background: Rgba::new(0.95, 0.95, 0.95, 1.0),
        hub_text: Rgba::new(0.0, 0.0, 0.0, 1.0),
    };

    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::DARK,
            Theme::Light => Self::LIGHT,
        }
    }
}

/// Gives solid-color zones whose color was fully transparent the theme's default background.
///
/// Returns the number of zones repaired.
pub fn apply_theme_defaults(workspace: &mut Workspace) -> usize {
    let fallback = ThemePalette::for_theme(workspace.theme).zone_default_background;
    let mut repaired = 0;
    for zone in workspace.zones_mut() {
        if zone.background_type == BackgroundType::SolidColor && zone.background_color.is_transparent()
        {
            zone.background_color = fallback;
            repaired += 1;
        }
    }
    repaired
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::geometry::Rect;
    use crate::model::{Page, Zone};

    #[test]
    fn unknown_theme_names_fall_back_to_dark() {
        assert_eq!(Theme::from_name("Light"), Theme::Light);
        assert_eq!(Theme::from_name("Solarized"), Theme::Dark);
        let decoded: Theme = serde_json::from_str("\"neon\"").expect("decode");
        assert_eq!(decoded, Theme::Dark);
        assert_eq!(serde_json::to_string(&Theme::Light).expect("encode"), "\"Light\"");
    }

    #[test]
    fn repair_only_touches_transparent_solid_zones() {
        let mut workspace = Workspace {
            theme: Theme::Light,
            ..Workspace::default()
        };
        let mut page = Page::new("p", 0);
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut solid_clear = Zone::new("a", rect, Rgba::TRANSPARENT);
        solid_clear.background_type = BackgroundType::SolidColor;
        let mut solid_red = Zone::new("b", rect, Rgba::new(1.0, 0.0, 0.0, 1.0));
        solid_red.background_type = BackgroundType::SolidColor;
        let see_through = Zone::new("c", rect, Rgba::TRANSPARENT);
        page.zones = vec![solid_clear, solid_red, see_through];
        workspace.pages.push(page);

        assert_eq!(apply_theme_defaults(&mut workspace), 1);

        let zones = &workspace.pages[0].zones;
        assert_eq!(zones[0].background_color, ThemePalette::LIGHT.zone_default_background);
        assert_eq!(zones[1].background_color, Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(zones[2].background_color, Rgba::TRANSPARENT);
    }
}
