//! pointmap - classify map points against a bounding quadrilateral and render them as SVG

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod model;
pub mod view;
