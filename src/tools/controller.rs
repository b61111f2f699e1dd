//! Tool mode state machine
//!
//! Exactly one managed interaction is attached at a time. Every mode switch
//! detaches by tag first and only then attaches the interaction of the new
//! mode; events raised by interactions that are no longer attached are
//! dropped.

use crate::{
    constants::{DELETE_TOOL_TAG, DRAW_TOOL_TAG, INFO_CLICK_TAG, MANAGED_TAGS},
    core::{
        config::MeasureConfig,
        geo::{Pixel, Point},
    },
    engine::{
        event::MapEvent, feature::FeatureId, Annotation, InteractionHandle, InteractionKind,
        InteractionSpec, LayerHandle, MapEngine, OverlayHandle,
    },
    tools::{
        inspect::QueryKind,
        measure::{Measurement, MeasurementAnnotator},
        mode::ToolMode,
    },
    ui::notice::Notice,
};
use std::collections::BTreeMap;

pub const DELETE_ACTIVATED_NOTICE: &str =
    "Delete tool activated: Click on a measurement to remove it.";

/// What handling an engine event amounted to
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    /// A drawing completed and received its label
    Annotated {
        feature: FeatureId,
        measurement: Measurement,
    },
    Deleted {
        feature: FeatureId,
    },
    /// A click in one of the info modes, to be answered by the inspector
    Query {
        kind: QueryKind,
        pixel: Pixel,
        coordinate: Point,
    },
    Ignored,
}

pub struct ToolController {
    mode: ToolMode,
    active: Option<InteractionHandle>,
    measurement_layer: LayerHandle,
    /// Label overlay of each drawn feature
    annotations: BTreeMap<FeatureId, OverlayHandle>,
    hit_tolerance_px: f64,
}

impl ToolController {
    /// Creates the measurement layer and starts inactive
    pub fn new<E: MapEngine + ?Sized>(engine: &mut E, config: &MeasureConfig) -> Self {
        let measurement_layer = engine.create_vector_layer("measurements");
        Self {
            mode: ToolMode::Inactive,
            active: None,
            measurement_layer,
            annotations: BTreeMap::new(),
            hit_tolerance_px: config.hit_tolerance_px,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn active_interaction(&self) -> Option<InteractionHandle> {
        self.active
    }

    pub fn measurement_layer(&self) -> LayerHandle {
        self.measurement_layer
    }

    pub fn annotation_for(&self, feature: FeatureId) -> Option<OverlayHandle> {
        self.annotations.get(&feature).copied()
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Switches the active tool. Returns a notice when the new mode wants
    /// to tell the user something.
    pub fn set_mode<E: MapEngine + ?Sized>(&mut self, engine: &mut E, mode: ToolMode) -> Option<Notice> {
        self.detach(engine);
        log::debug!("tool mode {} -> {}", self.mode, mode);
        self.mode = mode;

        match mode {
            ToolMode::Inactive => None,
            ToolMode::ClearAll => {
                self.clear_all(engine);
                self.mode = ToolMode::Inactive;
                None
            }
            ToolMode::DrawLength | ToolMode::DrawArea | ToolMode::DrawCircle => {
                let geometry = mode.draw_geometry()?;
                self.attach(
                    engine,
                    DRAW_TOOL_TAG,
                    InteractionKind::Draw {
                        layer: self.measurement_layer,
                        geometry,
                    },
                );
                None
            }
            ToolMode::DeleteFeature => {
                self.attach(
                    engine,
                    DELETE_TOOL_TAG,
                    InteractionKind::Select {
                        layers: vec![self.measurement_layer],
                        hit_tolerance_px: self.hit_tolerance_px,
                    },
                );
                Some(Notice::info(DELETE_ACTIVATED_NOTICE))
            }
            ToolMode::QueryCoordinates | ToolMode::QueryState | ToolMode::QueryDistrict => {
                self.attach(engine, INFO_CLICK_TAG, InteractionKind::Click);
                None
            }
        }
    }

    /// Routes an engine event to the active tool
    pub fn handle_event<E: MapEngine + ?Sized>(&mut self, engine: &mut E, event: MapEvent) -> ToolEvent {
        if self.active != Some(event.interaction()) {
            log::debug!("dropping event of detached {}", event.interaction());
            return ToolEvent::Ignored;
        }

        match event {
            MapEvent::DrawEnd { feature, .. } if self.mode.draw_geometry().is_some() => {
                let measurement = MeasurementAnnotator::compute_label(&*engine, &feature.geometry);
                if let Some(measurement) = &measurement {
                    self.annotate(engine, feature.id, measurement);
                }

                // Draw again with a fresh interaction
                self.set_mode(engine, self.mode);

                match measurement {
                    Some(measurement) => ToolEvent::Annotated {
                        feature: feature.id,
                        measurement,
                    },
                    None => ToolEvent::Ignored,
                }
            }
            MapEvent::Select {
                interaction,
                feature,
            } if self.mode == ToolMode::DeleteFeature => {
                self.delete_feature(engine, feature.id);
                engine.clear_selection(interaction);
                ToolEvent::Deleted {
                    feature: feature.id,
                }
            }
            MapEvent::Click {
                pixel, coordinate, ..
            } => match self.mode.query_kind() {
                Some(kind) => ToolEvent::Query {
                    kind,
                    pixel,
                    coordinate,
                },
                None => ToolEvent::Ignored,
            },
            _ => ToolEvent::Ignored,
        }
    }

    /// Removes a drawn feature together with its label. Returns whether the
    /// feature existed.
    pub fn delete_feature<E: MapEngine + ?Sized>(&mut self, engine: &mut E, feature: FeatureId) -> bool {
        if let Some(overlay) = self.annotations.remove(&feature) {
            engine.remove_overlay(overlay);
        }
        let removed = engine.remove_feature(self.measurement_layer, feature).is_some();
        if removed {
            log::debug!("deleted measurement {:?}", feature);
        }
        removed
    }

    /// Removes every drawn feature and label
    pub fn clear_all<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        for (_, overlay) in std::mem::take(&mut self.annotations) {
            engine.remove_overlay(overlay);
        }
        engine.clear_features(self.measurement_layer);
        log::debug!("cleared measurements");
    }

    fn annotate<E: MapEngine + ?Sized>(&mut self, engine: &mut E, feature: FeatureId, measurement: &Measurement) {
        let overlay = engine.add_overlay(Annotation {
            position: measurement.anchor,
            text: measurement.text.clone(),
        });
        if let Some(previous) = self.annotations.insert(feature, overlay) {
            engine.remove_overlay(previous);
        }
    }

    fn attach<E: MapEngine + ?Sized>(&mut self, engine: &mut E, tag: &str, kind: InteractionKind) {
        self.active = Some(engine.add_interaction(InteractionSpec::new(tag, kind)));
    }

    fn detach<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        engine.remove_interactions_tagged(&MANAGED_TAGS);
        if let Some(handle) = self.active.take() {
            engine.remove_interaction(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ViewerConfig;
    use crate::core::geometry::GeometryKind;
    use crate::engine::memory::MemoryEngine;

    fn setup() -> (MemoryEngine, ToolController) {
        let mut engine = MemoryEngine::new(800.0, 600.0);
        engine.set_view(Point::default(), 10.0);
        let controller = ToolController::new(&mut engine, &ViewerConfig::default().measure);
        (engine, controller)
    }

    fn managed(engine: &MemoryEngine) -> Vec<(InteractionHandle, InteractionSpec)> {
        engine
            .interactions()
            .into_iter()
            .filter(|(_, spec)| MANAGED_TAGS.contains(&spec.tag.as_str()))
            .collect()
    }

    fn process(engine: &mut MemoryEngine, controller: &mut ToolController) -> Vec<ToolEvent> {
        engine
            .drain_events()
            .into_iter()
            .map(|event| controller.handle_event(engine, event))
            .collect()
    }

    fn expected_kind(mode: ToolMode) -> Option<&'static str> {
        match mode {
            ToolMode::Inactive | ToolMode::ClearAll => None,
            ToolMode::DrawLength | ToolMode::DrawArea | ToolMode::DrawCircle => Some(DRAW_TOOL_TAG),
            ToolMode::DeleteFeature => Some(DELETE_TOOL_TAG),
            _ => Some(INFO_CLICK_TAG),
        }
    }

    #[test]
    fn test_at_most_one_handler_under_rapid_switching() {
        let (mut engine, mut controller) = setup();
        let mut modes: Vec<ToolMode> = ToolMode::MEASUREMENT
            .iter()
            .chain(ToolMode::INFO.iter())
            .copied()
            .collect();

        for _ in 0..4 {
            for mode in &modes {
                controller.set_mode(&mut engine, *mode);

                let attached = managed(&engine);
                match expected_kind(*mode) {
                    None => assert!(attached.is_empty(), "{} left {:?}", mode, attached),
                    Some(tag) => {
                        assert_eq!(attached.len(), 1, "{}", mode);
                        assert_eq!(attached[0].1.tag, tag);
                        assert_eq!(Some(attached[0].0), controller.active_interaction());
                    }
                }
            }
            modes.reverse();
        }
    }

    #[test]
    fn test_draw_kinds_match_mode() {
        let (mut engine, mut controller) = setup();
        for (mode, kind) in [
            (ToolMode::DrawLength, GeometryKind::LineString),
            (ToolMode::DrawArea, GeometryKind::Polygon),
            (ToolMode::DrawCircle, GeometryKind::Circle),
        ] {
            controller.set_mode(&mut engine, mode);
            let attached = managed(&engine);
            assert_eq!(
                attached[0].1.kind,
                InteractionKind::Draw {
                    layer: controller.measurement_layer(),
                    geometry: kind
                }
            );
        }
    }

    #[test]
    fn test_completed_drawing_is_labelled_and_rearmed() {
        let (mut engine, mut controller) = setup();
        controller.set_mode(&mut engine, ToolMode::DrawLength);
        let first_handle = controller.active_interaction();

        let id = engine
            .draw(&[Pixel::new(100.0, 100.0), Pixel::new(300.0, 100.0)])
            .unwrap();
        let events = process(&mut engine, &mut controller);

        assert!(matches!(&events[..], [ToolEvent::Annotated { feature, .. }] if *feature == id));
        let overlay = controller.annotation_for(id).unwrap();
        assert!(engine.overlay(overlay).unwrap().text.ends_with(" km"));

        // Still drawing lines, with a new handler
        assert_eq!(controller.mode(), ToolMode::DrawLength);
        assert_ne!(controller.active_interaction(), first_handle);
        assert_eq!(managed(&engine).len(), 1);

        engine.draw(&[Pixel::new(100.0, 200.0), Pixel::new(120.0, 200.0)]).unwrap();
        process(&mut engine, &mut controller);
        assert_eq!(controller.annotation_count(), 2);
    }

    #[test]
    fn test_circle_label_is_a_radius() {
        let (mut engine, mut controller) = setup();
        controller.set_mode(&mut engine, ToolMode::DrawCircle);

        engine
            .draw_circle(Pixel::new(400.0, 300.0), Pixel::new(450.0, 300.0))
            .unwrap();
        match &process(&mut engine, &mut controller)[..] {
            [ToolEvent::Annotated { measurement, .. }] => {
                assert!(measurement.text.starts_with("Radius: "))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_switching_mid_gesture_cancels_the_sketch() {
        let (mut engine, mut controller) = setup();
        controller.set_mode(&mut engine, ToolMode::DrawArea);

        assert!(engine.begin_sketch(Pixel::new(10.0, 10.0)));
        engine.add_sketch_vertex(Pixel::new(50.0, 10.0));
        controller.set_mode(&mut engine, ToolMode::QueryCoordinates);

        assert!(!engine.is_sketching());
        assert!(engine.finish_sketch().is_none());
        assert!(process(&mut engine, &mut controller).is_empty());
        assert!(engine.source_features(controller.measurement_layer()).is_empty());
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let (mut engine, mut controller) = setup();
        controller.set_mode(&mut engine, ToolMode::QueryState);
        engine.click(Pixel::new(1.0, 1.0));
        let stale = engine.drain_events();

        controller.set_mode(&mut engine, ToolMode::QueryDistrict);
        for event in stale {
            assert_eq!(controller.handle_event(&mut engine, event), ToolEvent::Ignored);
        }

        engine.click(Pixel::new(1.0, 1.0));
        let events = process(&mut engine, &mut controller);
        assert!(matches!(
            events[..],
            [ToolEvent::Query {
                kind: QueryKind::District,
                ..
            }]
        ));
    }

    #[test]
    fn test_delete_removes_feature_and_label() {
        let (mut engine, mut controller) = setup();
        controller.set_mode(&mut engine, ToolMode::DrawLength);
        let id = engine
            .draw(&[Pixel::new(100.0, 300.0), Pixel::new(700.0, 300.0)])
            .unwrap();
        process(&mut engine, &mut controller);
        let overlay = controller.annotation_for(id).unwrap();

        let notice = controller.set_mode(&mut engine, ToolMode::DeleteFeature);
        assert_eq!(notice, Some(Notice::info(DELETE_ACTIVATED_NOTICE)));

        engine.click(Pixel::new(400.0, 300.0));
        let events = process(&mut engine, &mut controller);
        assert_eq!(events, [ToolEvent::Deleted { feature: id }]);
        assert!(engine.overlay(overlay).is_none());
        assert!(controller.annotation_for(id).is_none());
        assert!(engine.source_features(controller.measurement_layer()).is_empty());

        // Mode persists; empty space is a no-op
        assert_eq!(controller.mode(), ToolMode::DeleteFeature);
        engine.click(Pixel::new(400.0, 300.0));
        engine.click(Pixel::new(20.0, 20.0));
        assert!(process(&mut engine, &mut controller).is_empty());
    }

    #[test]
    fn test_delete_clears_selection_between_picks() {
        let (mut engine, mut controller) = setup();
        controller.set_mode(&mut engine, ToolMode::DrawLength);
        let upper = engine.draw(&[Pixel::new(100.0, 200.0), Pixel::new(700.0, 200.0)]).unwrap();
        process(&mut engine, &mut controller);
        let lower = engine.draw(&[Pixel::new(100.0, 400.0), Pixel::new(700.0, 400.0)]).unwrap();
        process(&mut engine, &mut controller);
        assert_eq!(controller.annotation_count(), 2);

        controller.set_mode(&mut engine, ToolMode::DeleteFeature);
        let handle = controller.active_interaction().unwrap();
        engine.click(Pixel::new(400.0, 200.0));
        assert_eq!(
            process(&mut engine, &mut controller),
            [ToolEvent::Deleted { feature: upper }]
        );
        assert!(engine.selection(handle).is_empty());

        engine.click(Pixel::new(400.0, 400.0));
        let events = process(&mut engine, &mut controller);
        assert_eq!(events, [ToolEvent::Deleted { feature: lower }]);
        assert!(controller.annotation_for(upper).is_none());
        assert_eq!(controller.annotation_count(), 0);
    }

    #[test]
    fn test_clear_all_is_one_shot() {
        let (mut engine, mut controller) = setup();
        controller.set_mode(&mut engine, ToolMode::DrawArea);
        engine
            .draw(&[Pixel::new(100.0, 100.0), Pixel::new(200.0, 100.0), Pixel::new(200.0, 200.0)])
            .unwrap();
        process(&mut engine, &mut controller);
        assert_eq!(engine.overlays().count(), 1);

        assert!(controller.set_mode(&mut engine, ToolMode::ClearAll).is_none());
        assert_eq!(controller.mode(), ToolMode::Inactive);
        assert!(managed(&engine).is_empty());
        assert_eq!(engine.overlays().count(), 0);
        assert_eq!(controller.annotation_count(), 0);
        assert!(engine.source_features(controller.measurement_layer()).is_empty());
    }
}
