pub mod point;
pub mod polygon;

pub use point::{Classification, ClassifiedPoint, Point};
pub use polygon::{BBOX_VERTICES, BoundingPolygon};
