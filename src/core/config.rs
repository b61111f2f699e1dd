//! Viewer configuration
//!
//! Every section has defaults matching the stock India viewer, so a config
//! file only needs the keys it wants to override.

use crate::constants::{
    COORDINATE_PRECISION, DEFAULT_CENTER_LON_LAT, DEFAULT_ZOOM, DELETE_HIT_TOLERANCE_PX,
    DISTRICTS_OVERLAY, ROADS_OVERLAY, SEARCH_FIT_DURATION_MS, SEARCH_FIT_PADDING_PX,
    STATES_OVERLAY,
};
use crate::core::geo::LatLng;
use crate::layers::style::StyleDescriptor;
use crate::tiles::source::TileSourceConfig;
use crate::tools::search::AliasRule;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub data_sources: DataSources,
    pub view: ViewConfig,
    pub base_layers: Vec<BaseLayerConfig>,
    pub overlay_styles: OverlayStyles,
    pub search: SearchConfig,
    pub inspector: InspectorConfig,
    pub measure: MeasureConfig,
}

/// Locations of the three GeoJSON overlays. Plain paths are read from disk,
/// `http(s)://` locations are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    pub states: String,
    pub districts: String,
    pub roads: String,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            states: "india_states.geojson".to_string(),
            districts: "india_districts.geojson".to_string(),
            roads: "india_roads.geojson".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [DEFAULT_CENTER_LON_LAT.0, DEFAULT_CENTER_LON_LAT.1],
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayerConfig {
    pub id: String,
    pub title: String,
    pub source: TileSourceConfig,
    #[serde(default)]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyles {
    pub states: StyleDescriptor,
    pub districts: StyleDescriptor,
    pub roads: StyleDescriptor,
}

impl Default for OverlayStyles {
    fn default() -> Self {
        Self {
            states: StyleDescriptor::states(),
            districts: StyleDescriptor::districts(),
            roads: StyleDescriptor::roads(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Synonym folding applied to the query before matching
    pub aliases: Vec<AliasRule>,
    /// Attributes probed, in order, when matching a feature by name
    pub name_fields: Vec<String>,
    /// Attributes probed, in order, for the name reported on a hit
    pub display_name_fields: Vec<String>,
    /// Overlay ids searched, in order
    pub layers: Vec<String>,
    pub fit_duration_ms: u64,
    pub fit_padding_px: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            aliases: vec![AliasRule::new(&["delhi", "nct", "new delhi"], "delhi")],
            name_fields: ["name", "NAME", "ADM1_EN", "ST_NM", "STATE_NAME"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            display_name_fields: vec!["name".to_string(), "NAME".to_string()],
            layers: vec![STATES_OVERLAY.to_string(), DISTRICTS_OVERLAY.to_string()],
            fit_duration_ms: SEARCH_FIT_DURATION_MS,
            fit_padding_px: SEARCH_FIT_PADDING_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub coordinate_precision: usize,
    /// Attribute name holding the geometry; never displayed
    pub geometry_field: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            coordinate_precision: COORDINATE_PRECISION,
            geometry_field: "geometry".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Pick tolerance of the delete tool
    pub hit_tolerance_px: f64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            hit_tolerance_px: DELETE_HIT_TOLERANCE_PX,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_sources: DataSources::default(),
            view: ViewConfig::default(),
            base_layers: default_base_layers(),
            overlay_styles: OverlayStyles::default(),
            search: SearchConfig::default(),
            inspector: InspectorConfig::default(),
            measure: MeasureConfig::default(),
        }
    }
}

fn default_base_layers() -> Vec<BaseLayerConfig> {
    vec![
        BaseLayerConfig {
            id: "OSM".to_string(),
            title: "OSM".to_string(),
            source: TileSourceConfig::Osm,
            visible: true,
        },
        BaseLayerConfig {
            id: "Satellite".to_string(),
            title: "Satellite".to_string(),
            source: TileSourceConfig::Xyz {
                url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
                attributions: None,
            },
            visible: false,
        },
        BaseLayerConfig {
            id: "Terrain".to_string(),
            title: "Terrain".to_string(),
            source: TileSourceConfig::Xyz {
                url: "https://a.tile.opentopomap.org/{z}/{x}/{y}.png".to_string(),
                attributions: Some(
                    "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)"
                        .to_string(),
                ),
            },
            visible: false,
        },
    ]
}

impl ViewerConfig {
    /// Parses a JSON config; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::info!("loaded viewer config from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Replaces the three GeoJSON locations
    pub fn with_data_sources(mut self, states: &str, districts: &str, roads: &str) -> Self {
        self.data_sources = DataSources {
            states: states.to_string(),
            districts: districts.to_string(),
            roads: roads.to_string(),
        };
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_layers.is_empty() {
            return Err(MapError::Config("at least one base layer is required".into()));
        }

        for (i, layer) in self.base_layers.iter().enumerate() {
            if self.base_layers[..i].iter().any(|other| other.id == layer.id) {
                return Err(MapError::Config(format!(
                    "duplicate base layer id '{}'",
                    layer.id
                )));
            }
        }

        let [lon, lat] = self.view.center;
        if !LatLng::from_lon_lat(lon, lat).in_range() {
            return Err(MapError::Config(format!(
                "view center [{}, {}] is not a longitude/latitude pair",
                lon, lat
            )));
        }

        let overlay_ids = [STATES_OVERLAY, DISTRICTS_OVERLAY, ROADS_OVERLAY];
        if let Some(unknown) = self
            .search
            .layers
            .iter()
            .find(|id| !overlay_ids.contains(&id.as_str()))
        {
            return Err(MapError::Config(format!(
                "search layer '{}' is not an overlay",
                unknown
            )));
        }

        Ok(())
    }
}
