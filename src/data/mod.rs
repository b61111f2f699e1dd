pub mod geojson;
#[cfg(feature = "tokio-runtime")]
pub mod loader;

pub use geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};
