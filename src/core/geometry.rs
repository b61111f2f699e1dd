//! Geometries exchanged with the map engine. Coordinates are in the map
//! projection; circles keep their radius in projected units.

use crate::core::{extent::Extent, geo::Point};
use serde::{Deserialize, Serialize};

/// Geometry kinds a draw interaction can be constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    LineString,
    Polygon,
    Circle,
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::LineString => write!(f, "LineString"),
            GeometryKind::Polygon => write!(f, "Polygon"),
            GeometryKind::Circle => write!(f, "Circle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    LineString(Vec<Point>),
    /// Exterior ring first, then holes
    Polygon(Vec<Vec<Point>>),
    Circle {
        center: Point,
        radius: f64,
    },
    MultiLineString(Vec<Vec<Point>>),
    MultiPolygon(Vec<Vec<Vec<Point>>>),
}

impl Geometry {
    /// The drawable kind this geometry belongs to, if any
    pub fn kind(&self) -> Option<GeometryKind> {
        match self {
            Geometry::LineString(_) => Some(GeometryKind::LineString),
            Geometry::Polygon(_) => Some(GeometryKind::Polygon),
            Geometry::Circle { .. } => Some(GeometryKind::Circle),
            _ => None,
        }
    }

    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::Point(p) => Some(Extent::new(*p, *p)),
            Geometry::LineString(coords) => Extent::from_points(coords),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                Extent::from_points(rings.iter().flatten())
            }
            Geometry::Circle { center, radius } => Some(Extent::from_coords(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            )),
            Geometry::MultiPolygon(polygons) => {
                Extent::from_points(polygons.iter().flatten().flatten())
            }
        }
    }

    /// Last coordinate in drawing order
    pub fn last_coordinate(&self) -> Option<Point> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::LineString(coords) => coords.last().copied(),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.last().and_then(|ring| ring.last()).copied()
            }
            Geometry::Circle { center, .. } => Some(*center),
            Geometry::MultiPolygon(polygons) => polygons
                .last()
                .and_then(|rings| rings.last())
                .and_then(|ring| ring.last())
                .copied(),
        }
    }

    /// Circle center, or the center of the extent for everything else
    pub fn center(&self) -> Option<Point> {
        match self {
            Geometry::Circle { center, .. } => Some(*center),
            other => other.extent().map(|e| e.center()),
        }
    }
}
