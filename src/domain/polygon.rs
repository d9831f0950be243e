use geo::{BoundingRect, LineString, Rect};

use super::Point;
use crate::error::InvalidGeometryError;

/// Number of vertices in a map bounding box.
pub const BBOX_VERTICES: usize = 4;

/// A closed polygon with exactly `N` vertices.
///
/// Only the vertex count is validated. Convexity and simplicity are not
/// checked; a self-intersecting input is accepted and classifies points by
/// the even-odd rule like any other.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<const N: usize> {
    vertices: [Point; N],
}

/// The quadrilateral enclosing a map.
pub type BoundingPolygon = Polygon<BBOX_VERTICES>;

impl<const N: usize> Polygon<N> {
    pub fn new<I, P>(vertices: I) -> Result<Self, InvalidGeometryError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        const { assert!(N >= 3, "a polygon needs at least 3 vertices") };

        let vertices: Vec<Point> = vertices.into_iter().map(Into::into).collect();
        let found = vertices.len();
        let vertices = <[Point; N]>::try_from(vertices)
            .map_err(|_| InvalidGeometryError { expected: N, found })?;

        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point; N] {
        &self.vertices
    }

    /// Even-odd ray cast: counts crossings of a horizontal ray running from
    /// `point` towards +x.
    ///
    /// The straddle test must short-circuit before the intersection term,
    /// otherwise a horizontal edge (`yi == yj`) divides by zero. Points that
    /// sit exactly on an edge get a deterministic but unspecified answer.
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        let mut j = N - 1;

        for i in 0..N {
            let vi = self.vertices[i];
            let vj = self.vertices[j];

            if (vi.y > point.y) != (vj.y > point.y)
                && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }

            j = i;
        }

        inside
    }

    /// Axis-aligned envelope of the vertices.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.to_geo().bounding_rect()
    }

    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let exterior: LineString<f64> = self.vertices.iter().map(|&p| geo::Coord::from(p)).collect();
        geo::Polygon::new(exterior, vec![])
    }

    /// Vertex list in SVG `points` attribute form: `x1,y1 x2,y2 ...`.
    pub fn svg_points(&self) -> String {
        self.vertices
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
