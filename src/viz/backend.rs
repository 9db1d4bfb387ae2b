//! Adapter from [`Surface`] to plotters drawing areas, and chart file export.
//!
//! SVG output writes text as `<text>` elements and needs no font. PNG output
//! rasterizes text through `ab_glyph`, which does not discover OS fonts, so a
//! TrueType file is registered once from `DEMANDIQ_FONT` or a few well-known
//! locations. Without one, PNG charts are written without labels.

use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontFamily, FontStyle};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::OnceLock;

use super::dash::dash_segments;
use super::surface::{DisplayList, Surface};
use super::types::{LabelStyle, Point, Rect, Rgb8, Stroke, TextAnchor};

const FONT_CANDIDATES: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Register a "sans-serif" font for bitmap text. Returns whether one is available.
fn ensure_fonts_registered() -> bool {
    *FONT_READY.get_or_init(|| {
        let env_path = std::env::var("DEMANDIQ_FONT").ok();
        let candidates = env_path.iter().map(String::as_str).chain(FONT_CANDIDATES);
        for path in candidates {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            // plotters keeps the font for the life of the process.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if plotters::style::register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                log::debug!("registered chart font {path}");
                return true;
            }
        }
        log::warn!("no usable TrueType font found; PNG charts will have no labels (set DEMANDIQ_FONT)");
        false
    })
}

fn rgb(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn px(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn rect_corners(r: Rect) -> [(i32, i32); 2] {
    [
        px(Point::new(r.x, r.y)),
        px(Point::new(r.x + r.width, r.y + r.height)),
    ]
}

/// A [`Surface`] backed by a plotters drawing area.
pub struct PlottersSurface<DB: DrawingBackend> {
    area: DrawingArea<DB, Shift>,
    labels: bool,
}

impl<DB: DrawingBackend> PlottersSurface<DB> {
    pub fn new(area: DrawingArea<DB, Shift>) -> Self {
        Self { area, labels: true }
    }

    /// Skip text entirely (used when no font can render it).
    pub fn without_labels(mut self) -> Self {
        self.labels = false;
        self
    }

    /// Flush the backend to its output.
    pub fn present(&self) -> Result<()> {
        self.area.present().map_err(|e| anyhow!("{:?}", e))
    }
}

impl<DB: DrawingBackend> Surface for PlottersSurface<DB> {
    fn size(&self) -> (u32, u32) {
        self.area.dim_in_pixel()
    }

    fn clear(&mut self, rect: Rect) -> Result<()> {
        // File outputs have no transparency to return to; white stands in for it.
        self.area
            .draw(&Rectangle::new(rect_corners(rect), WHITE.filled()))
            .map_err(|e| anyhow!("{:?}", e))
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb8) -> Result<()> {
        self.area
            .draw(&Rectangle::new(rect_corners(rect), rgb(color).filled()))
            .map_err(|e| anyhow!("{:?}", e))
    }

    fn stroke_line(&mut self, points: &[Point], stroke: &Stroke) -> Result<()> {
        let style = rgb(stroke.color).stroke_width(stroke.width.round().max(1.0) as u32);
        let pieces = match stroke.dash.as_deref() {
            Some(pattern) => dash_segments(points, pattern),
            None => vec![points.to_vec()],
        };
        for piece in pieces {
            let coords: Vec<(i32, i32)> = piece.into_iter().map(px).collect();
            self.area
                .draw(&PathElement::new(coords, style))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        Ok(())
    }

    fn draw_label(&mut self, text: &str, at: Point, style: &LabelStyle) -> Result<()> {
        if !self.labels {
            return Ok(());
        }
        let h = match style.anchor {
            TextAnchor::Left => HPos::Left,
            TextAnchor::Center => HPos::Center,
        };
        let color = rgb(style.color);
        let font = TextStyle::from((FontFamily::SansSerif, style.size_px))
            .color(&color)
            .pos(Pos::new(h, VPos::Bottom));
        self.area
            .draw(&Text::new(text.to_string(), px(at), font))
            .map_err(|e| anyhow!("{:?}", e))
    }
}

/// Write a recorded chart to `out_path`: SVG when the extension is `.svg`, PNG otherwise.
pub fn save_chart<P: AsRef<Path>>(chart: &DisplayList, out_path: P) -> Result<()> {
    let out_path = out_path.as_ref();
    let (w, h) = chart.size();
    let size = (
        if w == 0 { super::DEFAULT_WIDTH } else { w },
        if h == 0 { super::DEFAULT_HEIGHT } else { h },
    );

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, size).into_drawing_area();
        let mut surface = PlottersSurface::new(root);
        chart.replay(&mut surface)?;
        surface.present()?;
    } else {
        let root = BitMapBackend::new(out_path, size).into_drawing_area();
        let mut surface = PlottersSurface::new(root);
        if !ensure_fonts_registered() {
            surface = surface.without_labels();
        }
        chart.replay(&mut surface)?;
        surface.present()?;
    }
    log::info!("wrote chart {}", out_path.display());
    Ok(())
}

/// Render a recorded chart to an SVG string.
pub fn chart_to_svg(chart: &DisplayList) -> Result<String> {
    let (w, h) = chart.size();
    let size = (
        if w == 0 { super::DEFAULT_WIDTH } else { w },
        if h == 0 { super::DEFAULT_HEIGHT } else { h },
    );
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        let mut surface = PlottersSurface::new(root);
        chart.replay(&mut surface).context("replay chart onto svg")?;
        surface.present()?;
    }
    Ok(buf)
}
