use futures::executor::block_on;
use overlay_host::{AppStateEnvelope, AppStateStore, MemoryAppStateStore, WORKSPACE_STATE_NAMESPACE};
use overlay_runtime::{
    load_workspace, read_workspace, save_workspace, BackgroundType, PageId, Rect, Rgba, SortKey,
    Theme, Workspace, WorkspaceManager, WORKSPACE_SCHEMA_VERSION,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn zone_rect(x: f32) -> Rect {
    Rect::new(x, 0.0, x + 400.0, 400.0)
}

#[test]
fn add_sort_reflow_scenario_places_icons_by_name() {
    let mut manager = WorkspaceManager::default();
    let page = manager.add_page("Desk").id.clone();
    let zone = manager
        .add_zone(&page, "Files", Rect::new(0.0, 0.0, 400.0, 400.0), Rgba::TRANSPARENT)
        .expect("zone")
        .id
        .clone();
    for path in ["C:/docs/zeta.txt", "C:/docs/alpha.txt", "C:/docs/Mid.txt"] {
        manager.add_icon(&zone, path, None).expect("icon");
    }

    manager
        .update_zone(&zone, |z| z.sort_key = SortKey::Name)
        .expect("update");
    manager.sort(&zone).expect("sort");
    manager.reflow(&zone).expect("reflow");

    let zone = manager.zone(&zone).expect("zone");
    let names: Vec<_> = zone.icons.iter().map(|i| i.display_name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "Mid", "zeta"]);
    assert_eq!(zone.icons[0].position.left, 20.0);
    assert_eq!(zone.icons[0].position.top, 30.0);
    assert_eq!(zone.icons[1].position.left, 120.0);
}

#[test]
fn ascending_then_descending_reverses_distinct_names() {
    let mut manager = WorkspaceManager::default();
    let page = manager.add_page("Desk").id.clone();
    let zone = manager
        .add_zone(&page, "Files", zone_rect(0.0), Rgba::TRANSPARENT)
        .expect("zone")
        .id
        .clone();
    for name in ["delta", "Bravo", "alpha", "charlie"] {
        manager
            .add_icon(&zone, format!("/x/{name}"), None)
            .expect("icon");
    }

    manager.sort(&zone).expect("asc");
    let ascending: Vec<_> = manager.zone(&zone).expect("zone").icons.iter().map(|i| i.id.clone()).collect();
    manager
        .update_zone(&zone, |z| z.sort_ascending = false)
        .expect("direction");
    manager.sort(&zone).expect("desc");
    let descending: Vec<_> = manager.zone(&zone).expect("zone").icons.iter().map(|i| i.id.clone()).collect();

    let mut reversed = ascending;
    reversed.reverse();
    assert_eq!(descending, reversed);
}

fn rich_workspace() -> Workspace {
    let mut manager = WorkspaceManager::default();
    manager.set_theme(Theme::Light);
    let backgrounds = [
        BackgroundType::Transparent,
        BackgroundType::SolidColor,
        BackgroundType::Blurred,
        BackgroundType::Image,
    ];
    let mut kind = 0;
    for page_name in ["Work", "Games"] {
        let page = manager.add_page(page_name).id.clone();
        manager
            .set_page_overlay(&page, Rgba::new(0.0, 0.0, 0.2, 0.3))
            .expect("overlay");
        for zone_idx in 0..2 {
            let zone = manager
                .add_zone(
                    &page,
                    format!("{page_name} {zone_idx}"),
                    zone_rect(zone_idx as f32 * 450.0),
                    Rgba::new(0.1, 0.2, 0.3, 0.8),
                )
                .expect("zone")
                .id
                .clone();
            let background = backgrounds[kind % backgrounds.len()];
            kind += 1;
            manager
                .update_zone(&zone, |z| {
                    z.background_type = background;
                    z.corner_radius = 8;
                    z.blur_background_image = background == BackgroundType::Image;
                    if background == BackgroundType::Image {
                        z.background_image_path = Some("C:/wall/forest.png".to_string());
                    }
                    z.grid_cols = 3;
                    z.sort_key = SortKey::Path;
                    z.sort_ascending = false;
                })
                .expect("update");
            for icon_idx in 0..3 {
                manager
                    .add_icon(
                        &zone,
                        format!("C:\\Users\\me\\{page_name}\\item{icon_idx}.lnk"),
                        None,
                    )
                    .expect("icon");
            }
        }
    }
    let second = manager.pages()[1].id.clone();
    manager
        .set_page_wallpaper(&second, Some("C:/wall/night.jpg".to_string()))
        .expect("wallpaper");
    manager.snapshot()
}

#[test]
fn snapshot_round_trips_through_store() {
    let store = MemoryAppStateStore::default();
    let workspace = rich_workspace();
    assert_eq!(workspace.pages.len(), 2);
    assert!(workspace.pages.iter().all(|p| p.zones.len() == 2));

    block_on(save_workspace(&store, &workspace)).expect("save");
    let loaded = block_on(read_workspace(&store)).expect("read").expect("stored");

    assert_eq!(loaded, workspace);
}

#[test]
fn snapshot_json_uses_persisted_field_names() {
    let workspace = rich_workspace();
    let value = serde_json::to_value(&workspace).expect("encode");
    assert_eq!(value["theme"], json!("Light"));
    assert_eq!(value["schemaVersion"], json!(WORKSPACE_SCHEMA_VERSION));
    let zone = &value["pages"][0]["zones"][0];
    assert!(zone.get("screenRect").is_some());
    assert!(zone.get("gridCols").is_some());
    assert_eq!(zone["sortKey"], json!("Path"));
    let icon = &zone["icons"][0];
    assert!(icon.get("relativePosition").is_some());
    assert!(icon["name"].as_str().expect("name").starts_with("item"));
}

#[test]
fn corrupt_store_recovers_to_default_layout_and_saves_again() {
    let store = MemoryAppStateStore::default();
    let garbage = AppStateEnvelope::new(
        WORKSPACE_STATE_NAMESPACE,
        WORKSPACE_SCHEMA_VERSION,
        json!("\u{0}\u{1}not a workspace"),
    );
    block_on(store.save_app_state_envelope(&garbage)).expect("seed");

    let outcome = block_on(load_workspace(&store));

    assert!(outcome.recovered);
    let workspace = &outcome.workspace;
    assert_eq!(workspace.pages.len(), 1);
    assert_eq!(workspace.pages[0].zones.len(), 1);
    assert_eq!(workspace.icon_count(), 0);
    block_on(save_workspace(&store, workspace)).expect("save after recovery");
}

#[test]
fn unknown_schema_versions_are_recovered() {
    let store = MemoryAppStateStore::default();
    let envelope = AppStateEnvelope::new(WORKSPACE_STATE_NAMESPACE, 99, json!({}));
    block_on(store.save_app_state_envelope(&envelope)).expect("seed");

    let outcome = block_on(load_workspace(&store));

    assert!(outcome.recovered);
    assert_eq!(outcome.workspace.pages.len(), 1);
}

#[test]
fn replace_workspace_repairs_dangling_active_page() {
    let mut workspace = rich_workspace();
    workspace.active_page_id = Some(PageId("gone".to_string()));
    let mut manager = WorkspaceManager::default();

    manager.replace_workspace(workspace);

    assert_eq!(manager.active_page_index(), Some(0));
}
