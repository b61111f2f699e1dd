use crate::core::geometry::Geometry;
use serde::{Deserialize, Serialize};

/// Attribute table of a feature
pub type Properties = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

/// A vector feature as the engine stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub properties: Properties,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Geometry, properties: Properties) -> Self {
        Self {
            id,
            geometry,
            properties,
        }
    }

    /// Number of attribute fields, counting the geometry once even when the
    /// properties also carry a `geometry_field` entry
    pub fn attribute_count(&self, geometry_field: &str) -> usize {
        self.properties
            .keys()
            .filter(|key| key.as_str() != geometry_field)
            .count()
            + 1
    }

    /// String value of a property, if present and textual
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}
