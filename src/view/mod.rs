pub mod controller;
pub mod filter;
pub mod surface;

pub use controller::{MarkerStyle, ViewController, ViewOptions};
pub use filter::Filter;
pub use surface::{BBOX_CLASS, Circle, Document, POINT_CLASS, Surface, SvgSurface};
