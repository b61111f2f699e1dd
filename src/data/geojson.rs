use crate::core::{
    geo::{LatLng, Point},
    geometry::Geometry,
};
use crate::engine::feature::Properties;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// A GeoJSON position; a third (elevation) value is ignored
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    /// Parses a GeoJSON document
    pub fn from_str(geojson_str: &str) -> Result<Self> {
        serde_json::from_str(geojson_str)
            .map_err(|e| MapError::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    /// Features with their geometry projected to Web Mercator. Features
    /// without a geometry, or with point collections, are dropped.
    pub fn into_features(self) -> Vec<(Geometry, Properties)> {
        let features = match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features,
        };

        features
            .into_iter()
            .filter_map(|feature| {
                let geometry = feature.geometry.as_ref().and_then(project_geometry);
                if geometry.is_none() {
                    log::debug!("skipping feature {:?} without a usable geometry", feature.id);
                }
                Some((geometry?, feature.properties.unwrap_or_default()))
            })
            .collect()
    }
}

fn project_position(position: &Position) -> Option<Point> {
    match position.as_slice() {
        [lon, lat, ..] => Some(LatLng::from_lon_lat(*lon, *lat).to_mercator()),
        _ => None,
    }
}

fn project_line(positions: &[Position]) -> Option<Vec<Point>> {
    positions.iter().map(project_position).collect()
}

fn project_rings(rings: &[Vec<Position>]) -> Option<Vec<Vec<Point>>> {
    rings.iter().map(|ring| project_line(ring)).collect()
}

fn project_geometry(geometry: &GeoJsonGeometry) -> Option<Geometry> {
    match geometry {
        GeoJsonGeometry::Point { coordinates } => project_position(coordinates).map(Geometry::Point),
        GeoJsonGeometry::LineString { coordinates } => {
            project_line(coordinates).map(Geometry::LineString)
        }
        GeoJsonGeometry::Polygon { coordinates } => {
            project_rings(coordinates).map(Geometry::Polygon)
        }
        GeoJsonGeometry::MultiLineString { coordinates } => {
            project_rings(coordinates).map(Geometry::MultiLineString)
        }
        GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
            .iter()
            .map(|polygon| project_rings(polygon))
            .collect::<Option<Vec<_>>>()
            .map(Geometry::MultiPolygon),
        GeoJsonGeometry::MultiPoint { .. } | GeoJsonGeometry::GeometryCollection { .. } => None,
    }
}
