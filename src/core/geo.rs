use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// WGS84 semi-major axis used by EPSG:3857
const EARTH_RADIUS: f64 = 6378137.0;
/// Latitude where the square Web Mercator world ends
const MAX_LATITUDE: f64 = 85.0511287798;

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from GeoJSON axis order (longitude first)
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self::new(lat, lon)
    }

    /// Latitude within ±90° and longitude within ±180°
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Latitude limited to what Web Mercator can project
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Projects to EPSG:3857 meters
    pub fn to_mercator(&self) -> Point {
        let phi = Self::clamp_lat(self.lat).to_radians();
        Point::new(
            EARTH_RADIUS * self.lng.to_radians(),
            EARTH_RADIUS * (PI / 4.0 + phi / 2.0).tan().ln(),
        )
    }

    /// Inverse of [`to_mercator`](Self::to_mercator)
    pub fn from_mercator(point: Point) -> Self {
        let phi = 2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0;
        Self::new(phi.to_degrees(), (point.x / EARTH_RADIUS).to_degrees())
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A coordinate in the map projection (Web Mercator meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A position on screen, in pixels from the top-left corner of the map viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Slippy-map tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Tile containing `lat_lng` at `zoom`
    pub fn containing(lat_lng: &LatLng, zoom: u8) -> Self {
        let tiles = f64::from(1_u32 << zoom);
        let phi = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let column = (lat_lng.lng + 180.0) / 360.0 * tiles;
        let row = (1.0 - phi.tan().asinh() / PI) / 2.0 * tiles;
        let last = tiles - 1.0;

        Self::new(
            column.floor().clamp(0.0, last) as u32,
            row.floor().clamp(0.0, last) as u32,
            zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_round_trip_over_india() {
        let delhi = LatLng::new(28.6139, 77.2090);
        let back = LatLng::from_mercator(delhi.to_mercator());

        assert!((back.lat - delhi.lat).abs() < 1e-9);
        assert!((back.lng - delhi.lng).abs() < 1e-9);
    }

    #[test]
    fn test_origin_projects_to_origin() {
        let p = LatLng::new(0.0, 0.0).to_mercator();
        assert!(p.x.abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn test_tile_coord_for_india_center() {
        let center = LatLng::new(23.5937, 78.9629);
        let tile = TileCoord::containing(&center, 4);

        assert_eq!(tile, TileCoord::new(11, 6, 4));
        assert_eq!(
            TileCoord::containing(&LatLng::new(-89.0, 180.0), 2),
            TileCoord::new(3, 3, 2)
        );
    }

    #[test]
    fn test_range_check() {
        assert!(LatLng::new(23.5937, 78.9629).in_range());
        assert!(!LatLng::new(78.9629, 223.5937).in_range());
    }
}
