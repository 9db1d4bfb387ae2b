//! Visualization: a minimal line-chart engine drawing onto any [`Surface`].
//!
//! - One shared linear scale per chart, so series magnitudes are comparable
//! - Background, two axes, one label per category, one polyline per series
//! - Per-series color, width and dash pattern
//! - Output to SVG/PNG via plotters ([`backend`]) or to the GUI via [`DisplayList`]

pub mod backend;
pub mod dash;
pub mod scale;
pub mod surface;
pub mod types;
pub mod util;

pub use scale::{PlotFrame, Scale};
pub use surface::{DisplayList, DrawOp, Surface};
pub use types::{
    ChartKind, ChartOptions, DEFAULT_HEIGHT, DEFAULT_MARGIN, DEFAULT_WIDTH, LabelStyle, Point,
    Rect, Rgb8, Series, SeriesStyle, Stroke, TextAnchor,
};

use crate::error::{DashboardError, Result};

/// Categories and series checked to be plottable.
///
/// Every series has exactly one finite value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    categories: Vec<String>,
    series: Vec<Series>,
}

impl ChartData {
    pub fn new(categories: Vec<String>, series: Vec<Series>) -> Result<Self> {
        if categories.is_empty() {
            return Err(DashboardError::EmptyChart);
        }
        for s in &series {
            if s.values.len() != categories.len() {
                return Err(DashboardError::LengthMismatch {
                    what: format!("series {:?}", s.label),
                    expected: categories.len(),
                    found: s.values.len(),
                });
            }
            if let Some(index) = s.values.iter().position(|v| !v.is_finite()) {
                return Err(DashboardError::InvalidValue {
                    what: format!("series {:?}", s.label),
                    index,
                });
            }
        }
        Ok(Self { categories, series })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }
}

/// A line chart bound to the surface it draws on.
#[derive(Debug)]
pub struct LineChart<S: Surface> {
    surface: S,
    data: ChartData,
    options: ChartOptions,
    frame: PlotFrame,
}

impl<S: Surface> LineChart<S> {
    /// Bind `data` to `surface`. Size comes from the surface, or 800x400 when it reports none.
    pub fn new(surface: S, data: ChartData, options: ChartOptions) -> Self {
        let (w, h) = surface.size();
        let width = if w == 0 { DEFAULT_WIDTH } else { w };
        let height = if h == 0 { DEFAULT_HEIGHT } else { h };
        let frame = PlotFrame::new(width as f64, height as f64, options.margin);
        Self {
            surface,
            data,
            options,
            frame,
        }
    }

    /// Build and draw in one go.
    pub fn render(surface: S, data: ChartData, options: ChartOptions) -> Result<Self> {
        let mut chart = Self::new(surface, data, options);
        chart.draw()?;
        Ok(chart)
    }

    pub fn frame(&self) -> PlotFrame {
        self.frame
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scale(&self) -> Option<Scale> {
        Scale::from_series(&self.data.series)
    }

    /// Pixel positions of every point of series `idx`.
    pub fn series_points(&self, idx: usize) -> Option<Vec<Point>> {
        let series = self.data.series.get(idx)?;
        let scale = self.scale()?;
        let n = self.data.categories.len();
        Some(
            series
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| self.frame.point(i, n, *v, scale))
                .collect(),
        )
    }

    /// Background, axes, category labels, then one polyline per series.
    pub fn draw(&mut self) -> Result<()> {
        log::debug!(
            "drawing line chart: {} categories, {} series, {}x{}",
            self.data.categories.len(),
            self.data.series.len(),
            self.frame.width,
            self.frame.height
        );
        if let ChartKind::Unsupported(name) = &self.options.kind {
            log::debug!("chart kind {name:?} is not supported, drawing as line");
        }
        self.draw_background()?;
        self.draw_axes()?;
        self.draw_labels()?;
        self.draw_series()?;
        self.draw_titles()?;
        Ok(())
    }

    /// Clear the chart's region and hand the surface back for the next chart.
    pub fn destroy(mut self) -> Result<S> {
        self.clear()?;
        Ok(self.surface)
    }

    /// Clear the rectangle the chart occupies.
    pub fn clear(&mut self) -> Result<()> {
        let area = Rect::new(0.0, 0.0, self.frame.width, self.frame.height);
        self.surface.clear(area)?;
        Ok(())
    }

    /// Give up the surface without clearing it.
    pub fn into_surface(self) -> S {
        self.surface
    }

    fn draw_background(&mut self) -> Result<()> {
        let area = Rect::new(0.0, 0.0, self.frame.width, self.frame.height);
        self.surface.clear(area)?;
        self.surface.fill_rect(area, self.options.background)?;
        Ok(())
    }

    fn draw_axes(&mut self) -> Result<()> {
        let PlotFrame { width, margin, .. } = self.frame;
        let bottom = self.frame.baseline();
        let stroke = Stroke::solid(self.options.axis_color, 1.0);
        self.surface.stroke_line(
            &[Point::new(margin, margin), Point::new(margin, bottom)],
            &stroke,
        )?;
        self.surface.stroke_line(
            &[Point::new(margin, bottom), Point::new(width - margin, bottom)],
            &stroke,
        )?;
        Ok(())
    }

    fn draw_labels(&mut self) -> Result<()> {
        let style = self.label_style(TextAnchor::Center);
        let n = self.data.categories.len();
        let y = self.frame.height - self.options.label_offset_px;
        for (i, label) in self.data.categories.iter().enumerate() {
            let at = Point::new(self.frame.x(i, n), y);
            self.surface.draw_label(label, at, &style)?;
        }
        Ok(())
    }

    fn draw_series(&mut self) -> Result<()> {
        let Some(scale) = self.scale() else {
            return Ok(());
        };
        let n = self.data.categories.len();
        for series in &self.data.series {
            let points: Vec<Point> = series
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| self.frame.point(i, n, *v, scale))
                .collect();
            self.surface.stroke_line(&points, &series.style.stroke())?;
        }
        Ok(())
    }

    fn draw_titles(&mut self) -> Result<()> {
        if let Some(title) = self.options.x_title.clone() {
            let at = Point::new(
                self.frame.width / 2.0,
                self.frame.baseline() + self.frame.margin / 2.0,
            );
            let style = self.label_style(TextAnchor::Center);
            self.surface.draw_label(&title, at, &style)?;
        }
        if let Some(title) = self.options.y_title.clone() {
            let at = Point::new(self.frame.margin, self.frame.margin - 8.0);
            let style = self.label_style(TextAnchor::Left);
            self.surface.draw_label(&title, at, &style)?;
        }
        Ok(())
    }

    fn label_style(&self, anchor: TextAnchor) -> LabelStyle {
        LabelStyle {
            color: self.options.label_color,
            size_px: self.options.label_size_px,
            anchor,
        }
    }
}
