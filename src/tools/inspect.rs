//! Click-to-inspect: coordinates, or the attributes of the state/district
//! under the pointer

use crate::{
    constants::{DISTRICTS_OVERLAY, STATES_OVERLAY},
    core::{config::InspectorConfig, geo::Pixel},
    engine::{feature::Feature, MapEngine},
    layers::registry::LayerRegistry,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
    Coordinates,
    State,
    District,
}

impl QueryKind {
    /// Overlay consulted for attribute queries
    pub fn overlay_id(&self) -> Option<&'static str> {
        match self {
            QueryKind::Coordinates => None,
            QueryKind::State => Some(STATES_OVERLAY),
            QueryKind::District => Some(DISTRICTS_OVERLAY),
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKind::Coordinates => write!(f, "Coordinates"),
            QueryKind::State => write!(f, "State"),
            QueryKind::District => write!(f, "District"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoField {
    pub label: String,
    pub value: String,
}

/// What the info popup shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InfoPayload {
    Coordinates {
        lon: String,
        lat: String,
    },
    Attributes {
        kind: QueryKind,
        fields: Vec<InfoField>,
        /// The feature carries no attributes besides its geometry
        data_missing: bool,
    },
    NotFound {
        kind: QueryKind,
    },
}

impl InfoPayload {
    pub fn title(&self) -> String {
        match self {
            InfoPayload::Coordinates { .. } => "Coordinates:".to_string(),
            InfoPayload::Attributes { kind, .. } => format!("{} Info:", kind),
            InfoPayload::NotFound { kind } => {
                format!("No {} feature found here. (Check layer visibility)", kind)
            }
        }
    }

    /// Body lines below the title
    pub fn lines(&self) -> Vec<String> {
        match self {
            InfoPayload::Coordinates { lon, lat } => {
                vec![format!("Lon: {}", lon), format!("Lat: {}", lat)]
            }
            InfoPayload::Attributes {
                fields,
                data_missing,
                ..
            } => {
                let mut lines: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}: {}", f.label, f.value))
                    .collect();
                if *data_missing {
                    lines.push(
                        "Note: Data is simulated or GeoJSON properties are missing.".to_string(),
                    );
                }
                lines
            }
            InfoPayload::NotFound { .. } => Vec::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InfoPayload::NotFound { .. })
    }
}

pub struct FeatureInspector {
    coordinate_precision: usize,
    geometry_field: String,
}

impl FeatureInspector {
    pub fn new(config: &InspectorConfig) -> Self {
        Self {
            coordinate_precision: config.coordinate_precision,
            geometry_field: config.geometry_field.clone(),
        }
    }

    /// Answers a click at `pixel`. Misses are a `NotFound` payload, never
    /// an error.
    pub fn query_at<E: MapEngine + ?Sized>(
        &self,
        engine: &E,
        registry: &LayerRegistry,
        pixel: Pixel,
        kind: QueryKind,
    ) -> InfoPayload {
        let overlay_id = match kind.overlay_id() {
            Some(id) => id,
            None => {
                let lon_lat = engine.to_lon_lat(engine.pixel_to_coordinate(pixel));
                return InfoPayload::Coordinates {
                    lon: format!("{:.*}", self.coordinate_precision, lon_lat.lng),
                    lat: format!("{:.*}", self.coordinate_precision, lon_lat.lat),
                };
            }
        };

        let hit = registry
            .overlay(overlay_id)
            .and_then(|overlay| engine.features_at_pixel(pixel, Some(overlay.handle)).into_iter().next());

        match hit {
            Some(feature) => self.describe(kind, &feature),
            None => InfoPayload::NotFound { kind },
        }
    }

    /// Attribute payload for a hit feature
    pub fn describe(&self, kind: QueryKind, feature: &Feature) -> InfoPayload {
        let fields = feature
            .properties
            .iter()
            .filter(|(key, value)| **key != self.geometry_field && !value.is_null())
            .map(|(key, value)| InfoField {
                label: key.replace('_', " ").to_uppercase(),
                value: display_value(value),
            })
            .collect();

        InfoPayload::Attributes {
            kind,
            fields,
            data_missing: feature.attribute_count(&self.geometry_field) <= 1,
        }
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
