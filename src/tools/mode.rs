use crate::{core::geometry::GeometryKind, tools::inspect::QueryKind, MapError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The single interactive tool attached to the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Inactive,
    DrawLength,
    DrawArea,
    DrawCircle,
    /// One-shot: removes every measurement, then falls back to `Inactive`
    ClearAll,
    DeleteFeature,
    QueryCoordinates,
    QueryState,
    QueryDistrict,
}

impl ToolMode {
    /// Options of the measurement selector, in display order
    pub const MEASUREMENT: [ToolMode; 6] = [
        ToolMode::Inactive,
        ToolMode::DrawLength,
        ToolMode::DrawArea,
        ToolMode::DrawCircle,
        ToolMode::ClearAll,
        ToolMode::DeleteFeature,
    ];

    /// Options of the feature-info selector, in display order
    pub const INFO: [ToolMode; 4] = [
        ToolMode::Inactive,
        ToolMode::QueryCoordinates,
        ToolMode::QueryState,
        ToolMode::QueryDistrict,
    ];

    pub fn draw_geometry(&self) -> Option<GeometryKind> {
        match self {
            ToolMode::DrawLength => Some(GeometryKind::LineString),
            ToolMode::DrawArea => Some(GeometryKind::Polygon),
            ToolMode::DrawCircle => Some(GeometryKind::Circle),
            _ => None,
        }
    }

    pub fn query_kind(&self) -> Option<QueryKind> {
        match self {
            ToolMode::QueryCoordinates => Some(QueryKind::Coordinates),
            ToolMode::QueryState => Some(QueryKind::State),
            ToolMode::QueryDistrict => Some(QueryKind::District),
            _ => None,
        }
    }

    /// Human-readable selector label
    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::Inactive => "None",
            ToolMode::DrawLength => "Length (LineString)",
            ToolMode::DrawArea => "Area (Polygon)",
            ToolMode::DrawCircle => "Circle Radius",
            ToolMode::ClearAll => "Clear Measurements",
            ToolMode::DeleteFeature => "Remove Line/Square/Circle",
            ToolMode::QueryCoordinates => "Coordinates",
            ToolMode::QueryState => "State Info",
            ToolMode::QueryDistrict => "District Info",
        }
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            ToolMode::Inactive => "none",
            ToolMode::DrawLength => "Length",
            ToolMode::DrawArea => "Area",
            ToolMode::DrawCircle => "Circle",
            ToolMode::ClearAll => "Clear",
            ToolMode::DeleteFeature => "Remove",
            ToolMode::QueryCoordinates => "Coordinates",
            ToolMode::QueryState => "State",
            ToolMode::QueryDistrict => "District",
        };
        write!(f, "{}", value)
    }
}

/// Parses the selector values used by the viewer UI
impl FromStr for ToolMode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ToolMode::Inactive),
            "Length" => Ok(ToolMode::DrawLength),
            "Area" => Ok(ToolMode::DrawArea),
            "Circle" => Ok(ToolMode::DrawCircle),
            "Clear" => Ok(ToolMode::ClearAll),
            "Remove" => Ok(ToolMode::DeleteFeature),
            "Coordinates" => Ok(ToolMode::QueryCoordinates),
            "State" => Ok(ToolMode::QueryState),
            "District" => Ok(ToolMode::QueryDistrict),
            other => Err(MapError::ParseError(format!("unknown tool mode '{}'", other))),
        }
    }
}
