//! Public types and constants for the visualization module.

use serde::{Deserialize, Serialize};

/// Surface size used when the surface reports none.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 400;
/// Inset on all four sides between the surface edge and the plot.
pub const DEFAULT_MARGIN: f64 = 40.0;

/// A pixel position on a surface; origin is top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when this rectangle covers all of a `width` x `height` surface.
    pub fn covers(&self, width: f64, height: f64) -> bool {
        self.x <= 0.0 && self.y <= 0.0 && self.x + self.width >= width && self.y + self.height >= height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLUE: Rgb8 = Rgb8::new(0, 0, 255);
    pub const BACKGROUND: Rgb8 = Rgb8::new(0xf8, 0xf8, 0xf8);
    pub const AXIS: Rgb8 = Rgb8::new(0x44, 0x44, 0x44);
}

/// How a polyline is stroked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgb8,
    pub width: f64,
    /// Alternating dash/gap lengths in pixels; `None` strokes solid.
    pub dash: Option<Vec<f64>>,
}

impl Stroke {
    pub fn solid(color: Rgb8, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }
}

/// Horizontal placement of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    #[default]
    Left,
    Center,
}

/// Labels sit on their anchor point (the anchor is the text's bottom edge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub color: Rgb8,
    pub size_px: f64,
    pub anchor: TextAnchor,
}

/// Chart kinds accepted at construction. Every kind renders as a line chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    /// A kind name this engine has no renderer for; drawn as a line.
    Unsupported(String),
}

impl ChartKind {
    /// Accept any kind name. Anything other than `line` is kept as [`ChartKind::Unsupported`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("line") {
            ChartKind::Line
        } else {
            ChartKind::Unsupported(name.to_string())
        }
    }
}

/// Per-series styling.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub color: Rgb8,
    pub width: f64,
    pub dash: Option<Vec<f64>>,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: Rgb8::BLUE,
            width: 2.0,
            dash: None,
        }
    }
}

impl SeriesStyle {
    pub fn with_color(mut self, color: Rgb8) -> Self {
        self.color = color;
        self
    }

    /// Color from a `#rgb`/`#rrggbb` or named color string; unknown strings give blue.
    pub fn with_color_str(self, color: &str) -> Self {
        self.with_color(super::util::color_or_default(color))
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_dash(mut self, dash: Vec<f64>) -> Self {
        self.dash = Some(dash);
        self
    }

    pub(crate) fn stroke(&self) -> Stroke {
        Stroke {
            color: self.color,
            width: if self.width > 0.0 { self.width } else { 2.0 },
            dash: self.dash.clone(),
        }
    }
}

/// One named sequence of values plotted as a single polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
            style: SeriesStyle::default(),
        }
    }

    pub fn styled(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }
}

/// Every option the line chart understands.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub kind: ChartKind,
    pub margin: f64,
    pub background: Rgb8,
    pub axis_color: Rgb8,
    pub label_color: Rgb8,
    pub label_size_px: f64,
    /// Distance of the category label baseline from the bottom edge.
    pub label_offset_px: f64,
    /// Decorative titles; not needed for a correct chart.
    pub x_title: Option<String>,
    pub y_title: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            kind: ChartKind::Line,
            margin: DEFAULT_MARGIN,
            background: Rgb8::BACKGROUND,
            axis_color: Rgb8::AXIS,
            label_color: Rgb8::AXIS,
            label_size_px: 10.0,
            label_offset_px: 6.0,
            x_title: None,
            y_title: None,
        }
    }
}

impl ChartOptions {
    pub fn with_titles(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_title = Some(x.into());
        self.y_title = Some(y.into());
        self
    }
}
