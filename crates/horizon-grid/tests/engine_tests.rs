//! End-to-end engine tests.

use std::collections::HashSet;
use std::sync::Arc;

use horizon_grid::model::{
    Column, FilterSyntax, Row, RowId, SelectionMode, SortDirection, SortState,
};
use horizon_grid::{DataMode, GridConfig, HierarchicalDataEngine};
use parking_lot::Mutex;
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn color_engine() -> HierarchicalDataEngine {
    init_tracing();
    let columns = vec![Column::new("name", "Name")];
    let mut engine = HierarchicalDataEngine::new(GridConfig::default(), columns);
    engine
        .set_data_json(json!([
            {"id": "red", "name": "red", "children": [
                {"id": "innerRed1", "name": "inner red1"},
            ]},
            {"id": "black", "name": "black"},
        ]))
        .expect("valid rows");
    engine
}

fn device_engine() -> HierarchicalDataEngine {
    init_tracing();
    let config = GridConfig::default()
        .with_child_keys(["groups", "devices"])
        .with_id_key("mac");
    let columns = vec![
        Column::new("name", "Name"),
        Column::new("ip", "IP Address"),
        Column::new("online", "Status").with_format(|value, _| {
            let status = if value.as_bool() == Some(true) { "Online" } else { "Offline" };
            status.to_string()
        }),
    ];
    let mut engine = HierarchicalDataEngine::new(config, columns);
    engine
        .set_data_json(json!([
            {"mac": "s1", "name": "HQ", "groups": [
                {"mac": "g1", "name": "Lobby", "devices": [
                    {"mac": "d1", "name": "Camera", "ip": "10.0.0.21", "online": true},
                    {"mac": "d2", "name": "Access Point", "ip": "10.0.0.2", "online": false},
                ]},
            ], "devices": [
                {"mac": "d3", "name": "Gateway", "ip": "10.0.0.1", "online": true},
            ]},
            {"mac": "s2", "name": "Warehouse", "devices": [
                {"mac": "d4", "name": "Scanner", "ip": "10.1.0.5", "online": false},
            ]},
        ]))
        .expect("valid rows");
    engine
}

fn names(view: &horizon_grid::TreeSnapshot) -> Vec<String> {
    view.flatten().iter().map(|flat| flat.row.text("name")).collect()
}

#[test]
fn test_filter_red_and_black() {
    let mut engine = color_engine();

    let view = engine.set_filter("red");
    assert_eq!(names(&view), vec!["red", "inner red1"]);

    let view = engine.set_filter("black");
    assert_eq!(names(&view), vec!["black"]);
}

#[test]
fn test_sort_grey_black_red() {
    init_tracing();
    let columns = vec![Column::new("name", "Name")];
    let mut engine = HierarchicalDataEngine::new(GridConfig::default(), columns);
    engine.set_data(
        ["grey", "black", "red"]
            .into_iter()
            .map(|name| Row::new().with_field("id", name).with_field("name", name))
            .collect(),
    );

    let top = |engine: &HierarchicalDataEngine| -> Vec<String> {
        engine.view().rows().iter().map(|r| r.text("name")).collect()
    };

    engine.set_sort("name", SortDirection::Ascending);
    assert_eq!(top(&engine), vec!["black", "grey", "red"]);
    engine.set_sort("name", SortDirection::Descending);
    assert_eq!(top(&engine), vec!["red", "grey", "black"]);
    engine.set_sort("name", SortDirection::Unsorted);
    assert_eq!(top(&engine), vec!["grey", "black", "red"]);
}

#[test]
fn test_select_all_then_toggle_third_row() {
    init_tracing();
    let columns = vec![Column::new("name", "Name")];
    let mut engine = HierarchicalDataEngine::new(GridConfig::default(), columns);
    engine.set_data(
        (1..=5)
            .map(|i| Row::new().with_field("id", i).with_field("name", format!("row {i}")))
            .collect(),
    );

    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    engine.selection_changed.connect(move |rows: &Vec<Row>| {
        sink.lock().push(rows.len());
    });

    engine.select_all();
    engine.toggle("3");

    let selected: Vec<String> = engine.get_selected().iter().map(|r| r.text("id")).collect();
    assert_eq!(selected, vec!["1", "2", "4", "5"]);
    assert_eq!(*reported.lock(), vec![5, 4]);
}

#[test]
fn test_multiple_child_keys_filter() {
    let mut engine = device_engine();

    let view = engine.set_filter("scanner");
    assert_eq!(names(&view), vec!["Warehouse", "Scanner"]);

    // Formatted values take part in matching.
    let view = engine.set_filter("offline");
    assert_eq!(names(&view), vec!["HQ", "Lobby", "Access Point", "Warehouse", "Scanner"]);
}

#[test]
fn test_flatten_reports_structure() {
    let engine = device_engine();
    let view = engine.view();
    let flat = view.flatten();

    let depths: Vec<_> = flat.iter().map(|f| f.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 2, 1, 0, 1]);
    assert_eq!(flat[2].parent_id, Some(RowId::from("g1")));
    assert_eq!(flat[4].child_key, Some("devices"));
    assert_eq!(view.row_count(), 7);

    let collapsed: HashSet<RowId> = [RowId::from("s1")].into_iter().collect();
    let visible: Vec<_> = view
        .flatten_collapsed(&collapsed)
        .iter()
        .map(|f| f.row.text("mac"))
        .collect();
    assert_eq!(visible, vec!["s1", "s2", "d4"]);
}

#[test]
fn test_sort_is_per_level_across_child_keys() {
    let mut engine = device_engine();
    let view = engine.set_sort("name", SortDirection::Descending);
    assert_eq!(
        names(&view),
        vec!["Warehouse", "Scanner", "HQ", "Lobby", "Camera", "Access Point", "Gateway"]
    );
}

#[test]
fn test_selection_pruned_by_filter() {
    let mut engine = device_engine();
    engine.select("d1");
    engine.select("d4");

    let last = Arc::new(Mutex::new(Vec::new()));
    let sink = last.clone();
    engine.selection_changed.connect(move |rows: &Vec<Row>| {
        *sink.lock() = rows.iter().map(|r| r.text("mac")).collect::<Vec<_>>();
    });

    engine.set_filter("camera");
    assert_eq!(*last.lock(), vec!["d1"]);
    assert!(!engine.is_selected(&RowId::from("d4")));
}

#[test]
fn test_literal_filter_syntax() {
    init_tracing();
    let config = GridConfig::default().with_filter_syntax(FilterSyntax::Literal);
    let mut engine = HierarchicalDataEngine::new(config, vec![Column::new("ip", "IP")]);
    engine
        .set_data_json(json!([
            {"id": 1, "ip": "10.0.0.1"},
            {"id": 2, "ip": "10a0b0c1"},
        ]))
        .expect("valid rows");

    let view = engine.set_filter("10.0");
    assert_eq!(view.rows().len(), 1);
}

#[test]
fn test_external_mode_round_trip() {
    init_tracing();
    let config = GridConfig::default().with_data_mode(DataMode::External);
    let mut engine = HierarchicalDataEngine::new(config, vec![Column::new("name", "Name")]);
    engine.set_data(vec![
        Row::new().with_field("id", "b").with_field("name", "b"),
        Row::new().with_field("id", "a").with_field("name", "a"),
    ]);
    engine.select_all();

    let requests = Arc::new(Mutex::new(Vec::<SortState>::new()));
    let sink = requests.clone();
    engine.sort_requested.connect(move |sort| sink.lock().push(sort.clone()));

    engine.toggle_sort("name");
    assert_eq!(*requests.lock(), vec![SortState::new("name", SortDirection::Ascending)]);

    // The caller replies with its own result; selection is pruned against it.
    let view = engine.set_data(vec![Row::new().with_field("id", "a").with_field("name", "a")]);
    assert_eq!(view.sort(), &SortState::new("name", SortDirection::Ascending));
    assert_eq!(engine.selected_ids(), vec![RowId::from("a")]);
}

#[test]
fn test_config_file_drives_engine() {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("grid.toml");
    std::fs::write(
        &path,
        "child_keys = [\"devices\"]\nid_key = \"mac\"\nselection_mode = \"single_selection\"\n",
    )
    .expect("write config");

    let config = GridConfig::load(&path).expect("config loads");
    let mut engine = HierarchicalDataEngine::new(config, vec![Column::new("name", "Name")]);
    engine
        .set_data_json(json!([{"mac": "a", "name": "A", "devices": [{"mac": "b", "name": "B"}]}]))
        .expect("valid rows");

    assert_eq!(engine.view().row_count(), 2);
    assert_eq!(engine.selection_mode(), SelectionMode::SingleSelection);
    engine.select("a");
    engine.select("b");
    assert_eq!(engine.selected_ids(), vec![RowId::from("b")]);
}

#[test]
fn test_snapshots_shared_across_threads() {
    let mut engine = color_engine();
    let view = engine.set_filter("red");

    let handle = std::thread::spawn(move || view.row_count());
    engine.set_filter("black");
    assert_eq!(handle.join().expect("thread"), 2);
}
