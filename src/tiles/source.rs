use crate::core::geo::TileCoord;
use serde::{Deserialize, Serialize};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// Attribution text shown while this source is the visible base map.
    fn attribution(&self) -> Option<&str> {
        None
    }
}

/// Simple implementation that hits the default OpenStreetMap tile server.
pub struct OpenStreetMapSource {
    subdomains: Vec<&'static str>,
}

impl OpenStreetMapSource {
    pub fn new() -> Self {
        Self { subdomains: vec!["a", "b", "c"] }
    }
}

impl Default for OpenStreetMapSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for OpenStreetMapSource {
    fn url(&self, coord: TileCoord) -> String {
        let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
        let sub = self.subdomains[idx];
        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            sub, coord.z, coord.x, coord.y
        )
    }

    fn attribution(&self) -> Option<&str> {
        Some("© OpenStreetMap contributors")
    }
}

/// Generic `{z}/{x}/{y}` URL template source.
pub struct XyzSource {
    template: String,
    attribution: Option<String>,
}

impl XyzSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            attribution: None,
        }
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }
}

impl TileSource for XyzSource {
    fn url(&self, coord: TileCoord) -> String {
        self.template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }
}

/// Serializable description of a base layer's tile source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TileSourceConfig {
    Osm,
    Xyz {
        url: String,
        #[serde(default)]
        attributions: Option<String>,
    },
}

impl TileSourceConfig {
    /// Builds the tile source this descriptor names
    pub fn build(&self) -> Box<dyn TileSource> {
        match self {
            TileSourceConfig::Osm => Box::new(OpenStreetMapSource::new()),
            TileSourceConfig::Xyz { url, attributions } => {
                let source = XyzSource::new(url.clone());
                match attributions {
                    Some(text) => Box::new(source.with_attribution(text.clone())),
                    None => Box::new(source),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osm_rotates_subdomains() {
        let source = OpenStreetMapSource::new();
        assert_eq!(
            source.url(TileCoord::new(11, 6, 4)),
            "https://c.tile.openstreetmap.org/4/11/6.png"
        );
        assert_eq!(
            source.url(TileCoord::new(0, 0, 0)),
            "https://a.tile.openstreetmap.org/0/0/0.png"
        );
    }

    #[test]
    fn test_xyz_respects_axis_order_in_template() {
        let satellite = TileSourceConfig::Xyz {
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
            attributions: None,
        }
        .build();

        assert_eq!(
            satellite.url(TileCoord::new(11, 6, 4)),
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/4/6/11"
        );
        assert!(satellite.attribution().is_none());
    }

    #[test]
    fn test_config_deserializes_tagged() {
        let config: TileSourceConfig = serde_json::from_str(
            r#"{"type":"Xyz","url":"https://a.tile.opentopomap.org/{z}/{x}/{y}.png","attributions":"OpenTopoMap"}"#,
        )
        .unwrap();

        let source = config.build();
        assert_eq!(source.attribution(), Some("OpenTopoMap"));
        assert_eq!(
            source.url(TileCoord::new(1, 2, 3)),
            "https://a.tile.opentopomap.org/3/1/2.png"
        );
    }
}
