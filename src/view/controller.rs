use serde::Deserialize;

use super::filter::Filter;
use super::surface::{BBOX_CLASS, Circle, Document, POINT_CLASS, Surface};
use crate::domain::{ClassifiedPoint, Point};
use crate::error::{LoadError, SurfaceNotFoundError};
use crate::model::MapModel;

fn default_radius() -> f64 {
    5.0
}
fn default_fill() -> String {
    "black".to_string()
}

/// Look of a point marker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkerStyle {
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_fill")]
    pub fill: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            fill: default_fill(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub width: u32,
    pub height: u32,
    pub marker: MarkerStyle,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 300,
            marker: MarkerStyle::default(),
        }
    }
}

/// Drives one map surface: draws the bounding box, loads points through the
/// model and keeps the drawn markers in step with the active filter.
pub struct ViewController<S> {
    selector: String,
    surface: S,
    model: MapModel,
    options: ViewOptions,
    filter: Filter,
    listening: bool,
}

impl<S: Surface> ViewController<S> {
    /// Attach to the surface at `selector`, taking it out of `document`.
    pub fn new(
        document: &mut Document<S>,
        selector: &str,
        model: MapModel,
        options: ViewOptions,
    ) -> Result<Self, SurfaceNotFoundError> {
        let surface = document.take(selector).ok_or_else(|| SurfaceNotFoundError {
            selector: selector.to_string(),
        })?;

        Ok(Self {
            selector: selector.to_string(),
            surface,
            model,
            options,
            filter: Filter::default(),
            listening: false,
        })
    }

    /// Size the surface, outline the bounding box, start listening for
    /// filter clicks, then load and draw the points.
    ///
    /// The outline is drawn and the buttons work even when loading fails;
    /// calling [`ViewController::render_points`] again retries the load.
    pub async fn init(&mut self) -> Result<usize, LoadError> {
        self.surface
            .set_size(self.options.width, self.options.height);
        self.surface
            .draw_polygon(&self.model.bbox().svg_points(), BBOX_CLASS);
        self.add_events();

        tracing::debug!(
            surface = %self.selector,
            map = %self.model.name(),
            "map surface initialised"
        );

        self.render_points().await
    }

    fn add_events(&mut self) {
        self.listening = true;
    }

    /// Dispatch a click on the button at `selector`.
    ///
    /// Returns whether the click was handled. Clicks before `init` or on
    /// unknown selectors are ignored.
    pub fn click(&mut self, selector: &str) -> bool {
        if !self.listening {
            return false;
        }
        match Filter::from_button(selector) {
            Some(filter) => {
                self.set_filter(filter);
                true
            }
            None => false,
        }
    }

    /// Switch the active filter and redraw whatever points are loaded.
    pub fn set_filter(&mut self, filter: Filter) {
        tracing::debug!(from = ?self.filter, to = ?filter, "filter changed");
        self.filter = filter;
        if let Some(points) = self.model.cached_points() {
            self.draw_points(&points);
        }
    }

    /// Load points if needed and redraw them under the active filter.
    ///
    /// Returns the number of markers drawn.
    pub async fn render_points(&mut self) -> Result<usize, LoadError> {
        let points = self.model.get_points().await?;
        Ok(self.draw_points(&points))
    }

    /// Points the active filter lets through, in load order.
    pub fn visible_points(&self, points: &[Point]) -> Vec<ClassifiedPoint> {
        points
            .iter()
            .map(|&p| self.model.classify(p))
            .filter(|c| self.filter.admits(c.inside))
            .collect()
    }

    fn draw_points(&mut self, points: &[Point]) -> usize {
        let visible = self.visible_points(points);
        self.surface.clear(POINT_CLASS);
        for classified in &visible {
            self.draw_point(classified.point);
        }
        tracing::debug!(
            filter = ?self.filter,
            drawn = visible.len(),
            total = points.len(),
            "points rendered"
        );
        visible.len()
    }

    fn draw_point(&mut self, point: Point) {
        self.surface.draw_circle(Circle {
            cx: point.x,
            cy: point.y,
            r: self.options.marker.radius,
            fill: self.options.marker.fill.clone(),
            class: POINT_CLASS.to_string(),
        });
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Selector of the button currently marked selected.
    pub fn selected_button(&self) -> &'static str {
        self.filter.button_selector()
    }

    /// Every filter button with its selected flag.
    pub fn buttons(&self) -> [(&'static str, bool); 3] {
        Filter::ALL.map(|f| (f.button_selector(), f == self.filter))
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn model(&self) -> &MapModel {
        &self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
