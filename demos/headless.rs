//! Drives a viewer session without a window: loads small overlays from
//! disk, switches layers, measures, inspects and searches.
//!
//! Run with `RUST_LOG=debug cargo run --example headless`.

use indimap::{
    constants::{DISTRICTS_OVERLAY, STATES_OVERLAY},
    data::loader::load_overlays,
    prelude::*,
};
use std::path::Path;

const STATES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "NCT of Delhi", "ST_NM": "Delhi"},
     "geometry": {"type": "Polygon", "coordinates": [[[76.84, 28.41], [77.35, 28.41], [77.35, 28.88], [76.84, 28.88], [76.84, 28.41]]]}},
    {"type": "Feature", "properties": {"ST_NM": "Kerala", "capital": "Thiruvananthapuram"},
     "geometry": {"type": "Polygon", "coordinates": [[[74.85, 8.18], [77.42, 8.18], [77.42, 12.79], [74.85, 12.79], [74.85, 8.18]]]}}
  ]
}"#;

const DISTRICTS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "Pune", "state_name": "Maharashtra"},
     "geometry": {"type": "Polygon", "coordinates": [[[73.3, 17.9], [75.2, 17.9], [75.2, 19.4], [73.3, 19.4], [73.3, 17.9]]]}}
  ]
}"#;

fn write_sample(dir: &Path, name: &str, body: &str) -> anyhow::Result<String> {
    let path = dir.join(name);
    std::fs::write(&path, body)?;
    Ok(path.to_string_lossy().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dir = std::env::temp_dir().join("indimap_headless");
    std::fs::create_dir_all(&dir)?;
    let states = write_sample(&dir, "india_states.geojson", STATES)?;
    let districts = write_sample(&dir, "india_districts.geojson", DISTRICTS)?;
    // Roads are left missing on purpose: the overlay ends up failed
    let roads = dir.join("india_roads.geojson").to_string_lossy().to_string();

    let config = ViewerConfig::default().with_data_sources(&states, &districts, &roads);
    let mut session = MapSession::new(MemoryEngine::new(1280.0, 800.0), config)?;

    for (id, outcome) in load_overlays(&mut session).await {
        match outcome {
            Ok(count) => println!("{}: {} features", id, count),
            Err(e) => println!("{}: not loaded ({})", id, e),
        }
    }

    session.select_base_layer("Satellite")?;
    let visible: Vec<&str> = session
        .registry()
        .base_layers()
        .iter()
        .filter(|l| l.is_visible())
        .map(|l| l.id.as_str())
        .collect();
    println!("visible base layers: {:?}", visible);
    if let Some(url) = session.center_tile_url() {
        println!("center tile: {}", url);
    }
    println!("attribution: {}", session.attribution().unwrap_or_default());

    // Measure Delhi to Kerala
    session.set_mode(ToolMode::DrawLength);
    let delhi = session.engine().pixel_for(LatLng::new(28.61, 77.21));
    let kochi = session.engine().pixel_for(LatLng::new(9.93, 76.27));
    session.engine_mut().draw(&[delhi, kochi]);
    for event in session.process_events() {
        if let ToolEvent::Annotated { measurement, .. } = event {
            println!("measured: {}", measurement.text);
        }
    }

    session.set_mode(ToolMode::DrawCircle);
    let edge = session.engine().pixel_for(LatLng::new(28.61, 78.0));
    session.engine_mut().draw_circle(delhi, edge);
    session.process_events();
    println!("measurements on map: {}", session.measurements().len());

    session.set_mode(ToolMode::ClearAll);
    println!("after clear: {} (mode {})", session.measurements().len(), session.mode());

    // Feature info
    session.set_mode(ToolMode::QueryState);
    let kerala = session.engine().pixel_for(LatLng::new(10.5, 76.2));
    session.engine_mut().click(kerala);
    session.process_events();
    for line in session.popup().content() {
        println!("  {}", line);
    }

    session.set_overlay_visible(DISTRICTS_OVERLAY, false)?;
    session.set_mode(ToolMode::QueryDistrict);
    let pune = session.engine().pixel_for(LatLng::new(18.52, 73.85));
    session.engine_mut().click(pune);
    session.process_events();
    println!("{}", session.popup().content().join(" "));
    session.close_popup();

    for query in ["new delhi", "NCT", "pune", "Atlantis", "  "] {
        let outcome = session.search(query);
        println!("search {:?}: found={}", query, outcome.is_found());
    }
    for notice in session.take_notices() {
        println!("[{:?}] {}", notice.level, notice);
    }

    let states_ready = session
        .overlay_handle(STATES_OVERLAY)
        .map(|h| session.engine().source_ready(h))
        .unwrap_or(false);
    println!("states ready: {}", states_ready);

    Ok(())
}
