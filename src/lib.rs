//! # indimap
//!
//! An interactive map viewer for India built around a pluggable map engine.
//!
//! The crate owns the coordination layer of the viewer: switching base maps,
//! toggling the states/districts/roads overlays, the measurement and delete
//! tools, click-to-inspect feature info and name search with zoom-to-extent.
//! Rendering, projection and geometry math are delegated to a [`MapEngine`];
//! [`MemoryEngine`] is a complete in-process implementation used headless and
//! in tests.

pub mod core;
pub mod data;
pub mod engine;
pub mod layers;
pub mod session;
pub mod tiles;
pub mod tools;
pub mod ui;

pub mod prelude;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::ViewerConfig,
    extent::Extent,
    geo::{LatLng, Pixel, Point, TileCoord},
    geometry::{Geometry, GeometryKind},
};

pub use engine::{
    event::MapEvent, feature::Feature, memory::MemoryEngine, MapEngine,
};

pub use layers::registry::LayerRegistry;

pub use tools::{
    controller::ToolController, inspect::FeatureInspector, measure::MeasurementAnnotator,
    mode::ToolMode, search::SearchNavigator,
};

pub use session::MapSession;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
