pub mod loader;

pub use loader::{DEFAULT_LOAD_TIMEOUT, PointCache};

use std::sync::Arc;
use std::time::Duration;

use crate::api::PointSource;
use crate::domain::{BoundingPolygon, Classification, ClassifiedPoint, Point};
use crate::error::{InvalidGeometryError, LoadError};

/// A named map: its bounding quadrilateral plus the points loaded for it.
pub struct MapModel {
    name: String,
    bbox: BoundingPolygon,
    points: PointCache,
}

impl MapModel {
    /// Build a model over `source`.
    ///
    /// Fails unless `bbox` yields exactly four vertices.
    pub fn new<I, P>(
        name: impl Into<String>,
        bbox: I,
        source: Arc<dyn PointSource>,
    ) -> Result<Self, InvalidGeometryError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Ok(Self {
            name: name.into(),
            bbox: BoundingPolygon::new(bbox)?,
            points: PointCache::new(source),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.points = self.points.with_timeout(timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bbox(&self) -> &BoundingPolygon {
        &self.bbox
    }

    pub fn source_id(&self) -> &str {
        self.points.source_id()
    }

    /// Load the map's points, fetching at most once.
    pub async fn get_points(&self) -> Result<Arc<[Point]>, LoadError> {
        self.points.get().await
    }

    pub fn cached_points(&self) -> Option<Arc<[Point]>> {
        self.points.cached()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bbox.contains(point)
    }

    pub fn classify(&self, point: Point) -> ClassifiedPoint {
        ClassifiedPoint {
            point,
            inside: self.contains(point),
        }
    }

    pub fn classify_all(&self, points: &[Point]) -> Vec<ClassifiedPoint> {
        points.iter().map(|&p| self.classify(p)).collect()
    }

    pub fn summarize(&self, points: &[Point]) -> Classification {
        Classification::tally(&self.classify_all(points))
    }
}

impl std::fmt::Debug for MapModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapModel")
            .field("name", &self.name)
            .field("bbox", &self.bbox)
            .field("source", &self.source_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubSource;
    use std::sync::atomic::Ordering;

    const BBOX: [[f64; 2]; 4] = [[130.0, 30.0], [370.0, 30.0], [370.0, 270.0], [130.0, 270.0]];

    fn model(body: &str) -> MapModel {
        MapModel::new("Points", BBOX, Arc::new(StubSource::ok(body))).unwrap()
    }

    #[test]
    fn test_rejects_three_and_five_vertices() {
        let source: Arc<dyn PointSource> = Arc::new(StubSource::ok("[]"));

        let err = MapModel::new("Points", [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]], Arc::clone(&source))
            .unwrap_err();
        assert_eq!(err.found, 3);

        let five = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.5]];
        let err = MapModel::new("Points", five, source).unwrap_err();
        assert_eq!(err.found, 5);
        assert_eq!(err.expected, 4);
    }

    #[test]
    fn test_contains_reference_points() {
        let model = model("[]");
        assert!(model.contains(Point::new(250.0, 150.0)));
        assert!(!model.contains(Point::new(50.0, 50.0)));
        assert_eq!(
            model.contains(Point::new(130.0, 150.0)),
            model.contains(Point::new(130.0, 150.0))
        );
    }

    #[test]
    fn test_accepts_tuple_vertices() {
        let vertices = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let model = MapModel::new("tuples", vertices, Arc::new(StubSource::ok("[]"))).unwrap();
        assert_eq!(model.name(), "tuples");
        assert!(model.contains(Point::new(5.0, 5.0)));
    }

    #[tokio::test]
    async fn test_get_points_then_classify() {
        let source = StubSource::ok(r#"[{"x": 250, "y": 150}, {"x": 50, "y": 50}, {"x": 300, "y": 100}]"#);
        let calls = source.calls();
        let model = MapModel::new("Points", BBOX, Arc::new(source)).unwrap();

        let points = model.get_points().await.unwrap();
        let again = model.get_points().await.unwrap();
        assert_eq!(points, again);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let classified = model.classify_all(&points);
        assert_eq!(
            classified.iter().map(|c| c.inside).collect::<Vec<_>>(),
            vec![true, false, true]
        );

        let summary = model.summarize(&points);
        assert_eq!(summary, Classification { inside: 2, outside: 1 });
    }

    #[tokio::test]
    async fn test_timeout_is_forwarded() {
        let source = StubSource::ok("[]").with_delay(Duration::from_secs(60));
        let model = MapModel::new("Points", BBOX, Arc::new(source))
            .unwrap()
            .with_timeout(Duration::from_millis(20));

        let err = model.get_points().await.unwrap_err();
        assert!(matches!(err, LoadError::Timeout { .. }));
        assert!(model.cached_points().is_none());
    }
}
