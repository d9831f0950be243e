use serde::{Deserialize, Serialize};

/// A planar data point as it arrives from the data source.
///
/// Extra fields in the source record are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        geo::coord! { x: p.x, y: p.y }
    }
}

/// A point paired with its membership in the bounding polygon.
///
/// Computed on demand; never cached alongside the points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedPoint {
    #[serde(flatten)]
    pub point: Point,
    pub inside: bool,
}

/// Inside/outside counts over a point set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub inside: usize,
    pub outside: usize,
}

impl Classification {
    pub fn tally(points: &[ClassifiedPoint]) -> Self {
        points.iter().fold(Self::default(), |mut acc, p| {
            if p.inside {
                acc.inside += 1;
            } else {
                acc.outside += 1;
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.inside + self.outside
    }
}
