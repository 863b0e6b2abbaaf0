//! Device table demo.
//!
//! Builds an engine over a small site/group/device tree, then filters,
//! sorts and selects the way a table view would while a user types in the
//! search box and clicks column headers.
//!
//! Run with `RUST_LOG=horizon_grid=debug cargo run --example device_table`
//! to see the engine's tracing output.

use horizon_grid::debug::{TreeFormatOptions, ViewTreeDebug};
use horizon_grid::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = GridConfig::default()
        .with_child_keys(["groups", "devices"])
        .with_id_key("mac");

    let columns = vec![
        Column::new("name", "Name").with_width(180.0),
        Column::new("model", "Model"),
        Column::new("ip", "IP Address"),
        Column::new("online", "Status").with_format(|value, _| {
            let status = if value.as_bool() == Some(true) { "Online" } else { "Offline" };
            status.to_string()
        }),
    ];

    let mut engine = HierarchicalDataEngine::new(config, columns);
    let tree = ViewTreeDebug::with_options(TreeFormatOptions::minimal()).label_column("name");

    engine.selection_changed.connect(|rows| {
        let names: Vec<String> = rows.iter().map(|row| row.text("name")).collect();
        println!("selection -> {names:?}");
    });

    engine.set_data_json(json!([
        {"mac": "00:01", "name": "Headquarters", "groups": [
            {"mac": "00:02", "name": "Lobby", "devices": [
                {"mac": "aa:01", "name": "Door Camera", "model": "G4", "ip": "10.0.0.21", "online": true},
                {"mac": "aa:02", "name": "Access Point", "model": "U6", "ip": "10.0.0.2", "online": false},
            ]},
            {"mac": "00:03", "name": "Server Room", "devices": [
                {"mac": "aa:03", "name": "Core Switch", "model": "USW", "ip": "10.0.0.3", "online": true},
            ]},
        ], "devices": [
            {"mac": "aa:04", "name": "Gateway", "model": "UDM", "ip": "10.0.0.1", "online": true},
        ]},
        {"mac": "00:04", "name": "Warehouse", "devices": [
            {"mac": "aa:05", "name": "Dock Camera", "model": "G4", "ip": "10.1.0.21", "online": false},
        ]},
    ]))?;
    print!("{}", tree.format_with_header(&engine.view()));

    // Typing in the search box.
    let view = engine.set_filter("camera");
    print!("{}", tree.format_with_header(&view));

    // Clicking the Name header twice.
    engine.toggle_sort("name");
    let view = engine.toggle_sort("name");
    print!("{}", tree.format_with_header(&view));

    engine.select_all();
    engine.toggle("aa:05");

    // Narrowing the filter drops selections that are no longer visible.
    engine.set_filter("offline");
    println!("selected ids: {:?}", engine.selected_ids());

    engine.clear_filter();
    engine.clear_sort();
    for flat in engine.view().flatten() {
        let marker = if flat.has_children { "+" } else { " " };
        println!("{}{marker} {}", "    ".repeat(flat.depth), flat.row.text("name"));
    }

    Ok(())
}
