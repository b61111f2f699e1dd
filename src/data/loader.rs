//! Fetching overlay data
//!
//! `http(s)://` locations go through `reqwest`; anything else is read from
//! disk. A source whose fetch or parse fails is marked failed so the viewer
//! keeps treating it as "no data" rather than an error.

use crate::{
    data::geojson::GeoJson,
    engine::{memory::MemoryEngine, LayerHandle},
    session::MapSession,
    Result,
};
use once_cell::sync::Lazy;
use reqwest::Client;

/// Shared HTTP client; public data hosts reject requests without a
/// User-Agent
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("indimap/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
});

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetches and parses a GeoJSON document
pub async fn fetch_geojson(location: &str) -> Result<GeoJson> {
    let text = if is_remote(location) {
        log::debug!("fetching {}", location);
        HTTP_CLIENT
            .get(location)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?
    } else {
        tokio::fs::read_to_string(location).await?
    };

    log::info!("downloaded {} ({} bytes)", location, text.len());
    GeoJson::from_str(&text)
}

/// Fetches `location` into the vector source of `layer`
pub async fn load_into(
    engine: &mut MemoryEngine,
    layer: LayerHandle,
    location: &str,
) -> Result<usize> {
    match fetch_geojson(location).await {
        Ok(geojson) => engine.load_features(layer, geojson.into_features()),
        Err(e) => {
            log::warn!("failed to load {}: {}", location, e);
            engine.mark_failed(layer)?;
            Err(e)
        }
    }
}

/// Loads every overlay of `session` from its configured location, one
/// after another. Returns the outcome per overlay id.
pub async fn load_overlays(session: &mut MapSession<MemoryEngine>) -> Vec<(String, Result<usize>)> {
    let targets: Vec<(String, LayerHandle, String)> = session
        .registry()
        .overlays()
        .iter()
        .map(|o| (o.id.clone(), o.handle, o.url.clone()))
        .collect();

    let mut results = Vec::with_capacity(targets.len());
    for (id, handle, url) in targets {
        let outcome = load_into(session.engine_mut(), handle, &url).await;
        results.push((id, outcome));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MapEngine, SourceState};
    use crate::layers::style::StyleDescriptor;
    use crate::MapError;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/india_states.geojson"));
        assert!(!is_remote("india_states.geojson"));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let path = std::env::temp_dir().join("indimap_loader_districts.geojson");
        tokio::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"name":"Pune"},"geometry":{"type":"Point","coordinates":[73.85,18.52]}}]}"#,
        )
        .await
        .unwrap();

        let mut engine = MemoryEngine::default();
        let location = path.to_string_lossy().to_string();
        let layer = engine.create_vector_overlay(
            "india_districts",
            &location,
            &StyleDescriptor::districts(),
            true,
        );

        let count = load_into(&mut engine, layer, &location).await.unwrap();
        assert_eq!(count, 1);
        assert!(engine.source_ready(layer));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_missing_file_marks_failed() {
        let mut engine = MemoryEngine::default();
        let layer = engine.create_vector_overlay(
            "india_roads",
            "does/not/exist.geojson",
            &StyleDescriptor::roads(),
            true,
        );

        let err = load_into(&mut engine, layer, "does/not/exist.geojson")
            .await
            .unwrap_err();
        assert!(matches!(err, MapError::Io(_)));
        assert_eq!(engine.source_state(layer), Some(SourceState::Failed));
    }
}
