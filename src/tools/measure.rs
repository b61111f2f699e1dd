//! Measurement labels for completed drawings

use crate::{
    constants::{METERS_PER_KILOMETER, SQUARE_METERS_PER_SQUARE_KILOMETER},
    core::{geo::Point, geometry::Geometry},
    engine::MapEngine,
};

/// What a measurement reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKind {
    Length,
    Area,
    Radius,
}

/// Result of measuring one drawn geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub kind: MeasureKind,
    /// Meters for lengths and radii, square meters for areas
    pub value: f64,
    /// Display text
    pub text: String,
    /// Where the callout is anchored
    pub anchor: Point,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Meters below 1 km, kilometers from there on, both to two decimals
pub fn format_length(meters: f64) -> String {
    if meters < METERS_PER_KILOMETER {
        format!("{} m", round2(meters))
    } else {
        format!("{} km", round2(meters / METERS_PER_KILOMETER))
    }
}

/// Square meters below 1 km², square kilometers from there on
pub fn format_area(square_meters: f64) -> String {
    if square_meters < SQUARE_METERS_PER_SQUARE_KILOMETER {
        format!("{} m²", round2(square_meters))
    } else {
        format!(
            "{} km²",
            round2(square_meters / SQUARE_METERS_PER_SQUARE_KILOMETER)
        )
    }
}

/// Turns a drawn geometry into a label using the engine's geodesic
/// primitives. Attaching the label is left to the caller.
pub struct MeasurementAnnotator;

impl MeasurementAnnotator {
    /// `None` for geometries the drawing tools never produce
    pub fn compute_label<E: MapEngine + ?Sized>(
        engine: &E,
        geometry: &Geometry,
    ) -> Option<Measurement> {
        match geometry {
            Geometry::LineString(_) => {
                let meters = engine.compute_length(geometry);
                Some(Measurement {
                    kind: MeasureKind::Length,
                    value: meters,
                    text: format_length(meters),
                    anchor: geometry.last_coordinate()?,
                })
            }
            Geometry::Polygon(_) => {
                let square_meters = engine.compute_area(geometry);
                Some(Measurement {
                    kind: MeasureKind::Area,
                    value: square_meters,
                    text: format_area(square_meters),
                    anchor: geometry.center()?,
                })
            }
            Geometry::Circle { center, .. } => {
                // The radius is measured towards a corner of the extent
                let corner = geometry.extent()?.bottom_left();
                let meters = engine.compute_length(&Geometry::LineString(vec![*center, corner]));
                Some(Measurement {
                    kind: MeasureKind::Radius,
                    value: meters,
                    text: format!("Radius: {}", format_length(meters)),
                    anchor: *center,
                })
            }
            _ => None,
        }
    }
}
