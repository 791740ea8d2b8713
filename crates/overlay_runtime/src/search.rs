//! Display-only icon filter driven by the search box.

use crate::model::Icon;

/// Case-insensitive substring filter over icon display names and target paths.
///
/// The filter never reorders or repositions icons; it only decides which ones are drawn and
/// hit-testable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    /// Builds a filter from the search box text. Surrounding whitespace is ignored, so a blank
    /// term shows every icon.
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
        }
    }

    pub fn term(&self) -> &str {
        &self.needle
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, icon: &Icon) -> bool {
        self.is_empty()
            || icon.display_name.to_lowercase().contains(&self.needle)
            || icon.target_path.to_lowercase().contains(&self.needle)
    }
}

/// Returns whether `icon` is visible under an optional filter.
pub fn is_visible(icon: &Icon, filter: Option<&SearchFilter>) -> bool {
    filter.map_or(true, |filter| filter.matches(icon))
}
