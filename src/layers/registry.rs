use crate::{
    constants::MAX_TILE_ZOOM,
    core::{
        config::BaseLayerConfig,
        geo::{LatLng, TileCoord},
    },
    engine::{LayerHandle, MapEngine},
    layers::style::StyleDescriptor,
    tiles::source::{TileSource, TileSourceConfig},
    MapError, Result,
};

/// Mutually exclusive background imagery
#[derive(Debug, Clone)]
pub struct BaseLayer {
    pub id: String,
    pub title: String,
    pub source: TileSourceConfig,
    pub handle: LayerHandle,
    visible: bool,
}

impl BaseLayer {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn tile_source(&self) -> Box<dyn TileSource> {
        self.source.build()
    }
}

/// A GeoJSON dataset drawn above the base map
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    pub id: String,
    pub title: String,
    pub url: String,
    pub style: StyleDescriptor,
    pub handle: LayerHandle,
    visible: bool,
}

impl OverlayLayer {
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Holds the base layers and overlays of a session and keeps their
/// visibility in sync with the engine
#[derive(Debug, Default)]
pub struct LayerRegistry {
    base_layers: Vec<BaseLayer>,
    overlays: Vec<OverlayLayer>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_base_layer<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        config: &BaseLayerConfig,
    ) -> Result<LayerHandle> {
        if self.base_layer(&config.id).is_some() {
            return Err(MapError::Layer(format!(
                "base layer '{}' already registered",
                config.id
            )));
        }

        let handle = engine.create_tiled_base_layer(&config.title, &config.source, config.visible);
        self.base_layers.push(BaseLayer {
            id: config.id.clone(),
            title: config.title.clone(),
            source: config.source.clone(),
            handle,
            visible: config.visible,
        });
        Ok(handle)
    }

    pub fn add_overlay<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        id: &str,
        title: &str,
        url: &str,
        style: &StyleDescriptor,
    ) -> Result<LayerHandle> {
        if self.overlay(id).is_some() {
            return Err(MapError::Layer(format!("overlay '{}' already registered", id)));
        }

        let handle = engine.create_vector_overlay(title, url, style, true);
        self.overlays.push(OverlayLayer {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            style: style.clone(),
            handle,
            visible: true,
        });
        Ok(handle)
    }

    /// Shows `id` and hides every other base layer. The whole set is
    /// rewritten on every call.
    pub fn select_base_layer<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        id: &str,
    ) -> Result<()> {
        if self.base_layer(id).is_none() {
            return Err(MapError::UnknownLayer(id.to_string()));
        }

        // A flag only changes once the engine accepted it
        for layer in &mut self.base_layers {
            let visible = layer.id == id;
            engine.set_visible(layer.handle, visible)?;
            layer.visible = visible;
        }
        log::debug!("base layer switched to {}", id);
        Ok(())
    }

    pub fn set_overlay_visible<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        id: &str,
        visible: bool,
    ) -> Result<()> {
        let overlay = self
            .overlays
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| MapError::UnknownLayer(id.to_string()))?;

        engine.set_visible(overlay.handle, visible)?;
        overlay.visible = visible;
        Ok(())
    }

    pub fn base_layer(&self, id: &str) -> Option<&BaseLayer> {
        self.base_layers.iter().find(|l| l.id == id)
    }

    pub fn base_layers(&self) -> &[BaseLayer] {
        &self.base_layers
    }

    pub fn visible_base_layer(&self) -> Option<&BaseLayer> {
        self.base_layers.iter().find(|l| l.visible)
    }

    /// URL of the visible base layer's tile under `center` at `zoom`
    pub fn visible_tile_url(&self, center: &LatLng, zoom: f64) -> Option<String> {
        let layer = self.visible_base_layer()?;
        let zoom = zoom.round().clamp(0.0, f64::from(MAX_TILE_ZOOM)) as u8;
        Some(layer.tile_source().url(TileCoord::containing(center, zoom)))
    }

    /// Attribution of the visible base layer, if its source has one
    pub fn visible_attribution(&self) -> Option<String> {
        self.visible_base_layer()?
            .tile_source()
            .attribution()
            .map(str::to_string)
    }

    pub fn overlay(&self, id: &str) -> Option<&OverlayLayer> {
        self.overlays.iter().find(|o| o.id == id)
    }

    pub fn overlays(&self) -> &[OverlayLayer] {
        &self.overlays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ViewerConfig;
    use crate::engine::memory::MemoryEngine;

    fn registry_with_defaults(engine: &mut MemoryEngine) -> LayerRegistry {
        let mut registry = LayerRegistry::new();
        for config in &ViewerConfig::default().base_layers {
            registry.add_base_layer(engine, config).unwrap();
        }
        registry
            .add_overlay(engine, "states", "india_states", "s.geojson", &StyleDescriptor::states())
            .unwrap();
        registry
            .add_overlay(engine, "roads", "india_roads", "r.geojson", &StyleDescriptor::roads())
            .unwrap();
        registry
    }

    #[test]
    fn test_select_base_layer_leaves_exactly_one_visible() {
        let mut engine = MemoryEngine::default();
        let mut registry = registry_with_defaults(&mut engine);

        registry.select_base_layer(&mut engine, "Satellite").unwrap();

        let visible: Vec<_> = registry
            .base_layers()
            .iter()
            .filter(|l| engine.is_visible(l.handle))
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(visible, ["Satellite"]);
        assert_eq!(registry.visible_base_layer().map(|l| l.id.as_str()), Some("Satellite"));
    }

    #[test]
    fn test_select_repairs_drifted_engine_state() {
        let mut engine = MemoryEngine::default();
        let mut registry = registry_with_defaults(&mut engine);

        for layer in registry.base_layers() {
            engine.set_visible(layer.handle, true).unwrap();
        }
        registry.select_base_layer(&mut engine, "Terrain").unwrap();

        let count = registry
            .base_layers()
            .iter()
            .filter(|l| engine.is_visible(l.handle))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unknown_base_layer_changes_nothing() {
        let mut engine = MemoryEngine::default();
        let mut registry = registry_with_defaults(&mut engine);

        let err = registry.select_base_layer(&mut engine, "Hybrid").unwrap_err();
        assert!(matches!(err, MapError::UnknownLayer(_)));
        assert_eq!(registry.visible_base_layer().map(|l| l.id.as_str()), Some("OSM"));
    }

    #[test]
    fn test_failed_select_keeps_flags_in_step_with_engine() {
        let mut engine = MemoryEngine::default();
        let mut registry = registry_with_defaults(&mut engine);

        // Knows OSM and Satellite by handle, but not Terrain
        let mut partial = MemoryEngine::default();
        partial.create_tiled_base_layer("a", &TileSourceConfig::Osm, true);
        partial.create_tiled_base_layer("b", &TileSourceConfig::Osm, true);

        let err = registry.select_base_layer(&mut partial, "Terrain").unwrap_err();
        assert!(matches!(err, MapError::UnknownLayer(_)));

        for id in ["OSM", "Satellite"] {
            let layer = registry.base_layer(id).unwrap();
            assert_eq!(layer.is_visible(), partial.is_visible(layer.handle), "{}", id);
        }
        assert!(!registry.base_layer("Terrain").unwrap().is_visible());
        assert!(registry.visible_base_layer().is_none());
    }

    #[test]
    fn test_visible_tile_url_follows_selection() {
        let mut engine = MemoryEngine::default();
        let mut registry = registry_with_defaults(&mut engine);
        let india = LatLng::new(23.5937, 78.9629);

        let osm = registry.visible_tile_url(&india, 4.0).unwrap();
        assert!(osm.ends_with(".tile.openstreetmap.org/4/11/6.png"), "{}", osm);
        assert_eq!(
            registry.visible_attribution().as_deref(),
            Some("© OpenStreetMap contributors")
        );

        registry.select_base_layer(&mut engine, "Satellite").unwrap();
        assert_eq!(
            registry.visible_tile_url(&india, 3.6).unwrap(),
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/4/6/11"
        );
        assert!(registry.visible_attribution().is_none());
    }

    #[test]
    fn test_overlay_toggles_are_independent() {
        let mut engine = MemoryEngine::default();
        let mut registry = registry_with_defaults(&mut engine);

        registry.set_overlay_visible(&mut engine, "states", false).unwrap();

        let states = registry.overlay("states").unwrap();
        let roads = registry.overlay("roads").unwrap();
        assert!(!states.is_visible());
        assert!(!engine.is_visible(states.handle));
        assert!(roads.is_visible());
        assert!(engine.is_visible(roads.handle));
    }

    #[test]
    fn test_duplicate_overlay_rejected() {
        let mut engine = MemoryEngine::default();
        let mut registry = registry_with_defaults(&mut engine);

        assert!(registry
            .add_overlay(&mut engine, "states", "again", "x", &StyleDescriptor::default())
            .is_err());
    }
}
