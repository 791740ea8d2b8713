//! Pointer hit testing against the active page.
//!
//! Zones later in a page's list are drawn on top, so they are tested first. Resize handles
//! straddle the zone border and take priority over icons and the zone body.

use crate::geometry::{PointerPosition, Rect};
use crate::interaction::ResizeHandle;
use crate::model::{Icon, IconId, Page, Zone, ZoneId};
use crate::search::{is_visible, SearchFilter};

pub const RESIZE_HANDLE_SIZE: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    ResizeHandle { zone_id: ZoneId, handle: ResizeHandle },
    Icon { zone_id: ZoneId, icon_id: IconId },
    Zone(ZoneId),
}

pub fn resize_handle_at(zone: &Zone, point: PointerPosition) -> Option<ResizeHandle> {
    ResizeHandle::ALL.into_iter().find(|handle| {
        let anchor = handle.anchor(&zone.screen_rect);
        Rect::centered_square(anchor.x, anchor.y, RESIZE_HANDLE_SIZE).contains(point)
    })
}

/// Returns the visible icon under `point` (in overlay coordinates).
pub fn icon_at<'a>(
    zone: &'a Zone,
    point: PointerPosition,
    filter: Option<&SearchFilter>,
) -> Option<&'a Icon> {
    let local = PointerPosition::new(point.x - zone.screen_rect.left, point.y - zone.screen_rect.top);
    zone.icons
        .iter()
        .find(|icon| is_visible(icon, filter) && icon.position.contains(local))
}

pub fn zone_at(page: &Page, point: PointerPosition) -> Option<&Zone> {
    page.zones
        .iter()
        .rev()
        .find(|zone| zone.screen_rect.contains(point))
}

pub fn hit_test(
    page: &Page,
    point: PointerPosition,
    filter: Option<&SearchFilter>,
) -> Option<HitTarget> {
    for zone in page.zones.iter().rev() {
        if let Some(handle) = resize_handle_at(zone, point) {
            return Some(HitTarget::ResizeHandle {
                zone_id: zone.id.clone(),
                handle,
            });
        }
        if !zone.screen_rect.contains(point) {
            continue;
        }
        if let Some(icon) = icon_at(zone, point, filter) {
            return Some(HitTarget::Icon {
                zone_id: zone.id.clone(),
                icon_id: icon.id.clone(),
            });
        }
        return Some(HitTarget::Zone(zone.id.clone()));
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::geometry::Rgba;
    use crate::reflow::reflow_zone;

    fn page_with_zone() -> (Page, ZoneId, IconId) {
        let mut page = Page::new("p", 0);
        let mut zone = Zone::new("z", Rect::new(100.0, 100.0, 500.0, 500.0), Rgba::TRANSPARENT);
        zone.icons.push(Icon::new("/docs/report.pdf", None));
        reflow_zone(&mut zone);
        let ids = (zone.id.clone(), zone.icons[0].id.clone());
        page.zones.push(zone);
        (page, ids.0, ids.1)
    }

    #[test]
    fn handles_win_over_zone_body() {
        let (page, zone_id, _) = page_with_zone();
        assert_eq!(
            hit_test(&page, PointerPosition::new(103.0, 98.0), None),
            Some(HitTarget::ResizeHandle {
                zone_id: zone_id.clone(),
                handle: ResizeHandle::TopLeft
            })
        );
        assert_eq!(
            hit_test(&page, PointerPosition::new(500.0, 300.0), None),
            Some(HitTarget::ResizeHandle {
                zone_id,
                handle: ResizeHandle::Right
            })
        );
    }

    #[test]
    fn icons_hit_in_zone_local_space() {
        let (page, zone_id, icon_id) = page_with_zone();
        // Icon 0 occupies (20,30)-(80,90) inside the zone.
        assert_eq!(
            hit_test(&page, PointerPosition::new(150.0, 160.0), None),
            Some(HitTarget::Icon { zone_id, icon_id })
        );
    }

    #[test]
    fn filtered_icons_are_not_hittable() {
        let (page, zone_id, _) = page_with_zone();
        let filter = SearchFilter::new("nothing-matches");
        assert_eq!(
            hit_test(&page, PointerPosition::new(150.0, 160.0), Some(&filter)),
            Some(HitTarget::Zone(zone_id))
        );
    }

    #[test]
    fn topmost_zone_wins_and_misses_return_none() {
        let (mut page, _, _) = page_with_zone();
        let top = Zone::new("top", Rect::new(300.0, 300.0, 600.0, 600.0), Rgba::TRANSPARENT);
        let top_id = top.id.clone();
        page.zones.push(top);
        assert_eq!(zone_at(&page, PointerPosition::new(400.0, 400.0)).map(|z| &z.id), Some(&top_id));
        assert_eq!(hit_test(&page, PointerPosition::new(10.0, 10.0), None), None);
    }
}
