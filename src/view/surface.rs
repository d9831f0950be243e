use std::collections::HashMap;
use std::fmt::Write;

/// Class on the bounding polygon outline.
pub const BBOX_CLASS: &str = "bbox";
/// Class on every point marker.
pub const POINT_CLASS: &str = "map__point";

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const DEFAULT_STYLESHEET: &str =
    ".bbox { fill: none; stroke: #c0392b; stroke-width: 2; stroke-dasharray: 6 4; }";

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
    pub class: String,
}

/// Something the controller can draw on.
pub trait Surface {
    fn set_size(&mut self, width: u32, height: u32);

    /// `points` uses the SVG `points` attribute syntax.
    fn draw_polygon(&mut self, points: &str, class: &str);

    fn draw_circle(&mut self, circle: Circle);

    /// Remove every shape carrying `class`.
    fn clear(&mut self, class: &str);
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Polygon { points: String, class: String },
    Circle(Circle),
}

impl Shape {
    fn class(&self) -> &str {
        match self {
            Shape::Polygon { class, .. } => class,
            Shape::Circle(c) => &c.class,
        }
    }
}

/// In-memory SVG canvas.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    width: Option<u32>,
    height: Option<u32>,
    stylesheet: Option<String>,
    shapes: Vec<Shape>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self {
            stylesheet: Some(DEFAULT_STYLESHEET.to_string()),
            ..Self::default()
        }
    }

    pub fn with_stylesheet(mut self, css: Option<String>) -> Self {
        self.stylesheet = css;
        self
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    pub fn circles(&self) -> impl Iterator<Item = &Circle> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Circle(c) => Some(c),
            Shape::Polygon { .. } => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = (&str, &str)> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Polygon { points, class } => Some((points.as_str(), class.as_str())),
            Shape::Circle(_) => None,
        })
    }

    /// Serialise as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, r#"<svg xmlns="{SVG_NS}""#);
        if let Some(w) = self.width {
            let _ = write!(out, r#" width="{w}""#);
        }
        if let Some(h) = self.height {
            let _ = write!(out, r#" height="{h}""#);
        }
        out.push_str(">\n");

        if let Some(css) = &self.stylesheet {
            let _ = writeln!(out, "  <style>{}</style>", escape(css));
        }

        for shape in &self.shapes {
            match shape {
                Shape::Polygon { points, class } => {
                    let _ = writeln!(
                        out,
                        r#"  <polygon class="{}" points="{}"/>"#,
                        escape(class),
                        escape(points)
                    );
                }
                Shape::Circle(c) => {
                    let _ = writeln!(
                        out,
                        r#"  <circle class="{}" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                        escape(&c.class),
                        c.cx,
                        c.cy,
                        c.r,
                        escape(&c.fill)
                    );
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = Some(width);
        self.height = Some(height);
    }

    fn draw_polygon(&mut self, points: &str, class: &str) {
        self.shapes.push(Shape::Polygon {
            points: points.to_string(),
            class: class.to_string(),
        });
    }

    fn draw_circle(&mut self, circle: Circle) {
        self.shapes.push(Shape::Circle(circle));
    }

    fn clear(&mut self, class: &str) {
        self.shapes.retain(|s| s.class() != class);
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Surfaces addressable by selector.
#[derive(Debug, Default)]
pub struct Document<S> {
    surfaces: HashMap<String, S>,
}

impl<S: Surface> Document<S> {
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
        }
    }

    pub fn with_surface(mut self, selector: impl Into<String>, surface: S) -> Self {
        self.insert(selector, surface);
        self
    }

    pub fn insert(&mut self, selector: impl Into<String>, surface: S) {
        self.surfaces.insert(selector.into(), surface);
    }

    /// Detach the surface registered under `selector`.
    pub fn take(&mut self, selector: &str) -> Option<S> {
        self.surfaces.remove(selector)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.surfaces.contains_key(selector)
    }
}
