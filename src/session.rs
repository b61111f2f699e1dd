//! The viewer session
//!
//! [`MapSession`] owns the engine together with everything the UI callbacks
//! act on: the layer registry, the tool controller, the inspector popup and
//! the queue of user notices.

use crate::{
    constants::{DISTRICTS_OVERLAY, ROADS_OVERLAY, STATES_OVERLAY},
    core::{config::ViewerConfig, geo::LatLng},
    engine::{feature::Feature, LayerHandle, MapEngine},
    layers::registry::LayerRegistry,
    tools::{
        controller::{ToolController, ToolEvent},
        inspect::FeatureInspector,
        mode::ToolMode,
        search::{SearchNavigator, SearchOutcome},
    },
    ui::{notice::Notice, popup::Popup},
    Result,
};

pub struct MapSession<E: MapEngine> {
    engine: E,
    config: ViewerConfig,
    registry: LayerRegistry,
    tools: ToolController,
    inspector: FeatureInspector,
    navigator: SearchNavigator,
    popup: Popup,
    notices: Vec<Notice>,
}

impl<E: MapEngine> MapSession<E> {
    /// Builds the base layers and overlays in `engine`, centres the view and
    /// starts with no tool selected
    pub fn new(mut engine: E, config: ViewerConfig) -> Result<Self> {
        config.validate()?;

        let mut registry = LayerRegistry::new();
        for base in &config.base_layers {
            registry.add_base_layer(&mut engine, base)?;
        }
        let initial = config
            .base_layers
            .iter()
            .find(|b| b.visible)
            .or_else(|| config.base_layers.first())
            .map(|b| b.id.clone());
        if let Some(id) = initial {
            registry.select_base_layer(&mut engine, &id)?;
        }

        let sources = &config.data_sources;
        let styles = &config.overlay_styles;
        registry.add_overlay(&mut engine, STATES_OVERLAY, "india_states", &sources.states, &styles.states)?;
        registry.add_overlay(
            &mut engine,
            DISTRICTS_OVERLAY,
            "india_districts",
            &sources.districts,
            &styles.districts,
        )?;
        registry.add_overlay(&mut engine, ROADS_OVERLAY, "india_roads", &sources.roads, &styles.roads)?;

        let tools = ToolController::new(&mut engine, &config.measure);

        let [lon, lat] = config.view.center;
        let center = engine.from_lon_lat(LatLng::from_lon_lat(lon, lat));
        engine.set_view(center, config.view.zoom);

        log::info!(
            "session ready: {} base layers, {} overlays",
            registry.base_layers().len(),
            registry.overlays().len()
        );

        Ok(Self {
            inspector: FeatureInspector::new(&config.inspector),
            navigator: SearchNavigator::new(&config.search),
            engine,
            config,
            registry,
            tools,
            popup: Popup::new(),
            notices: Vec::new(),
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable engine access, e.g. to feed loaded data or simulated input
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn tools(&self) -> &ToolController {
        &self.tools
    }

    pub fn mode(&self) -> ToolMode {
        self.tools.mode()
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    /// Tile of the visible base map under the view center
    pub fn center_tile_url(&self) -> Option<String> {
        let center = self.engine.to_lon_lat(self.engine.view_center());
        self.registry.visible_tile_url(&center, self.engine.view_zoom())
    }

    pub fn attribution(&self) -> Option<String> {
        self.registry.visible_attribution()
    }

    pub fn overlay_handle(&self, id: &str) -> Option<LayerHandle> {
        self.registry.overlay(id).map(|o| o.handle)
    }

    /// Drawn features currently on the map
    pub fn measurements(&self) -> Vec<Feature> {
        self.engine.source_features(self.tools.measurement_layer())
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        if let Some(notice) = self.tools.set_mode(&mut self.engine, mode) {
            self.notices.push(notice);
        }
    }

    pub fn select_base_layer(&mut self, id: &str) -> Result<()> {
        self.registry.select_base_layer(&mut self.engine, id)
    }

    pub fn set_overlay_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        self.registry.set_overlay_visible(&mut self.engine, id, visible)
    }

    /// Searches states, then districts, and zooms to the first match
    pub fn search(&mut self, query: &str) -> SearchOutcome {
        let outcome = self
            .navigator
            .find_and_navigate(&mut self.engine, &self.registry, query);

        match (&outcome, outcome.notice()) {
            (SearchOutcome::Found { .. }, Some(message)) => self.notices.push(Notice::info(message)),
            (SearchOutcome::NotFound { .. }, Some(message)) => {
                self.notices.push(Notice::warning(message))
            }
            _ => {}
        }
        outcome
    }

    /// Routes every queued engine event to the tools. Info clicks open the
    /// popup at the clicked coordinate.
    pub fn process_events(&mut self) -> Vec<ToolEvent> {
        let events = self.engine.drain_events();
        let mut handled = Vec::with_capacity(events.len());

        for event in events {
            let result = self.tools.handle_event(&mut self.engine, event);
            if let ToolEvent::Query {
                kind,
                pixel,
                coordinate,
            } = &result
            {
                let payload = self
                    .inspector
                    .query_at(&self.engine, &self.registry, *pixel, *kind);
                self.popup.show(*coordinate, payload);
            }
            handled.push(result);
        }
        handled
    }

    pub fn close_popup(&mut self) {
        self.popup.close();
    }

    /// Notices raised since the last call, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
