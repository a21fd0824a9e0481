//! Input point storage.
//!
//! Points are kept in an arena; a point's stable identifier is its
//! ingestion index. Every cross-level lookup uses that index, never the
//! coordinate values themselves (distinct points may share coordinates).

/// A latitude/longitude pair. Coordinates are opaque 2-D values; no
/// projection or wrap-around handling is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }
}

/// Immutable, indexable collection of input points.
///
/// Built once from input and never mutated; the index of a point is its
/// identifier for the lifetime of the invocation.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: usize) -> Point {
        self.points[id]
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl std::ops::Index<usize> for PointSet {
    type Output = Point;

    fn index(&self, id: usize) -> &Point {
        &self.points[id]
    }
}
