use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding rectangle in map coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: Point,
    pub max: Point,
}

impl Extent {
    /// Creates a new extent from two corners
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates an extent from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Smallest extent covering every point, or `None` for an empty slice
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut extent = Self::new(first, first);
        for point in iter {
            extent.extend(point);
        }
        Some(extent)
    }

    /// Grows the extent to include the point
    fn extend(&mut self, point: &Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Gets the width of the extent
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the extent
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Gets the center point of the extent
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// The lower-left corner
    pub fn bottom_left(&self) -> Point {
        self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let points = [
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(1.0, 1.0),
        ];
        let extent = Extent::from_points(&points).unwrap();

        assert_eq!(extent, Extent::from_coords(-2.0, -1.0, 3.0, 4.0));
        assert_eq!(extent.center(), Point::new(0.5, 1.5));
        assert!(Extent::from_points(&Vec::<Point>::new()).is_none());
    }

    #[test]
    fn test_degenerate_extent_of_one_point() {
        let extent = Extent::from_points(&[Point::new(7.0, -3.0)]).unwrap();

        assert_eq!(extent.width(), 0.0);
        assert_eq!(extent.height(), 0.0);
        assert_eq!(extent.bottom_left(), Point::new(7.0, -3.0));
        assert_eq!(extent.center(), Point::new(7.0, -3.0));
    }
}
