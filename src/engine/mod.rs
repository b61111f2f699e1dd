//! The map engine capability surface
//!
//! Everything that draws, projects, measures or hit-tests lives behind
//! [`MapEngine`]. The viewer only holds opaque handles and reacts to the
//! [`MapEvent`]s the engine reports for interactions it attached.

pub mod event;
pub mod feature;
pub mod index;
pub mod memory;

pub use event::MapEvent;
pub use feature::{Feature, FeatureId, Properties};
pub use memory::MemoryEngine;

use crate::{
    core::{
        extent::Extent,
        geo::{LatLng, Pixel, Point},
        geometry::{Geometry, GeometryKind},
    },
    layers::style::StyleDescriptor,
    tiles::source::TileSourceConfig,
    Result,
};
use serde::{Deserialize, Serialize};

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

handle_type!(
    /// A tile or vector layer owned by the engine
    LayerHandle
);
handle_type!(
    /// An attached interaction; disposing it detaches the interaction
    InteractionHandle
);
handle_type!(
    /// A positioned overlay element such as a measurement callout
    OverlayHandle
);

/// What an interaction does with pointer input
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionKind {
    /// Sketch a geometry and add it to `layer` when the gesture completes
    Draw {
        layer: LayerHandle,
        geometry: GeometryKind,
    },
    /// Pick features of `layers` on click
    Select {
        layers: Vec<LayerHandle>,
        hit_tolerance_px: f64,
    },
    /// Report every click
    Click,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSpec {
    /// Opaque tag used for bulk removal
    pub tag: String,
    pub kind: InteractionKind,
}

impl InteractionSpec {
    pub fn new(tag: &str, kind: InteractionKind) -> Self {
        Self {
            tag: tag.to_string(),
            kind,
        }
    }
}

/// A text callout anchored at a map coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub position: Point,
    pub text: String,
}

/// Options for an animated view fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub duration_ms: u64,
    /// top, right, bottom, left
    pub padding_px: [f64; 4],
}

impl FitOptions {
    pub fn new(duration_ms: u64, padding_px: f64) -> Self {
        Self {
            duration_ms,
            padding_px: [padding_px; 4],
        }
    }
}

/// Loading state of a vector source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceState {
    Loading,
    Ready,
    Failed,
}

/// The capabilities the viewer consumes from a rendering/projection engine.
///
/// All calls happen on the single UI thread. Callbacks of attached
/// interactions are queued as [`MapEvent`]s and handed out by
/// [`MapEngine::drain_events`].
pub trait MapEngine {
    fn create_tiled_base_layer(
        &mut self,
        title: &str,
        source: &TileSourceConfig,
        visible: bool,
    ) -> LayerHandle;

    /// Creates an overlay whose features are loaded from `url`. The source
    /// stays [`SourceState::Loading`] until the data arrives.
    fn create_vector_overlay(
        &mut self,
        title: &str,
        url: &str,
        style: &StyleDescriptor,
        visible: bool,
    ) -> LayerHandle;

    /// Creates an empty, immediately ready vector layer (e.g. for drawings)
    fn create_vector_layer(&mut self, title: &str) -> LayerHandle;

    fn set_visible(&mut self, layer: LayerHandle, visible: bool) -> Result<()>;

    fn is_visible(&self, layer: LayerHandle) -> bool;

    fn add_interaction(&mut self, spec: InteractionSpec) -> InteractionHandle;

    /// Detaches an interaction, cancelling any gesture in progress.
    /// Returns `false` if it was not attached.
    fn remove_interaction(&mut self, handle: InteractionHandle) -> bool;

    /// Detaches every interaction whose tag is in `tags`
    fn remove_interactions_tagged(&mut self, tags: &[&str]) -> Vec<InteractionHandle>;

    /// Attached interactions in attachment order
    fn interactions(&self) -> Vec<(InteractionHandle, InteractionSpec)>;

    /// Forgets the current selection of a select interaction
    fn clear_selection(&mut self, handle: InteractionHandle);

    /// Geodesic length in meters
    fn compute_length(&self, geometry: &Geometry) -> f64;

    /// Geodesic area in square meters
    fn compute_area(&self, geometry: &Geometry) -> f64;

    fn to_lon_lat(&self, coordinate: Point) -> LatLng;

    fn from_lon_lat(&self, lat_lng: LatLng) -> Point;

    fn pixel_to_coordinate(&self, pixel: Pixel) -> Point;

    /// Features under `pixel`, topmost first. With a filter only that layer
    /// is considered. Hidden layers never hit.
    fn features_at_pixel(&self, pixel: Pixel, layer_filter: Option<LayerHandle>) -> Vec<Feature>;

    fn source_state(&self, layer: LayerHandle) -> Option<SourceState>;

    fn source_ready(&self, layer: LayerHandle) -> bool {
        self.source_state(layer) == Some(SourceState::Ready)
    }

    /// Features of a vector source in load order
    fn source_features(&self, layer: LayerHandle) -> Vec<Feature>;

    fn remove_feature(&mut self, layer: LayerHandle, id: FeatureId) -> Option<Feature>;

    fn clear_features(&mut self, layer: LayerHandle);

    fn add_overlay(&mut self, annotation: Annotation) -> OverlayHandle;

    fn remove_overlay(&mut self, handle: OverlayHandle) -> bool;

    fn set_view(&mut self, center: Point, zoom: f64);

    /// Current view center in map coordinates
    fn view_center(&self) -> Point;

    fn view_zoom(&self) -> f64;

    fn fit_extent(&mut self, extent: Extent, options: FitOptions);

    fn drain_events(&mut self) -> Vec<MapEvent>;
}
