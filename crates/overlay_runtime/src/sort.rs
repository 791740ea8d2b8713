//! Stable icon ordering by a zone's sort key and direction.

use std::cmp::Ordering;

use crate::model::{Icon, SortKey, Zone};

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Compares two icons under `key`. Keys without an ordering yet compare equal.
pub fn compare_icons(a: &Icon, b: &Icon, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => cmp_ignore_case(&a.display_name, &b.display_name),
        SortKey::Path => cmp_ignore_case(&a.target_path, &b.target_path),
        SortKey::Type | SortKey::DateAdded => Ordering::Equal,
    }
}

/// Reorders `zone.icons` by the zone's key and direction. Never touches positions.
///
/// Equal keys keep their relative order in both directions.
pub fn sort_zone(zone: &mut Zone) {
    let key = zone.sort_key;
    let ascending = zone.sort_ascending;
    zone.icons.sort_by(|a, b| {
        let ordering = compare_icons(a, b, key);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    tracing::debug!(zone_id = %zone.id, ?key, ascending, icons = zone.icons.len(), "zone sorted");
}
