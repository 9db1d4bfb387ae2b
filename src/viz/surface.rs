//! The drawing capabilities the chart engine needs, and an in-memory surface.
//!
//! [`Surface`] is deliberately small so the scaling and layout logic can be
//! exercised without a real rendering backend. [`DisplayList`] records every
//! call and can replay it onto any other surface (a plotters file backend or
//! the GUI painter).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::types::{LabelStyle, Point, Rect, Rgb8, Stroke};

pub trait Surface {
    /// Size in pixels; `(0, 0)` when the surface has no explicit size.
    fn size(&self) -> (u32, u32);

    /// Erase a region back to "nothing drawn".
    fn clear(&mut self, rect: Rect) -> Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Rgb8) -> Result<()>;

    /// Stroke one connected polyline through `points`.
    fn stroke_line(&mut self, points: &[Point], stroke: &Stroke) -> Result<()>;

    fn draw_label(&mut self, text: &str, at: Point, style: &LabelStyle) -> Result<()>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }
    fn clear(&mut self, rect: Rect) -> Result<()> {
        (**self).clear(rect)
    }
    fn fill_rect(&mut self, rect: Rect, color: Rgb8) -> Result<()> {
        (**self).fill_rect(rect, color)
    }
    fn stroke_line(&mut self, points: &[Point], stroke: &Stroke) -> Result<()> {
        (**self).stroke_line(points, stroke)
    }
    fn draw_label(&mut self, text: &str, at: Point, style: &LabelStyle) -> Result<()> {
        (**self).draw_label(text, at, style)
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Clear(Rect),
    FillRect(Rect, Rgb8),
    Polyline(Vec<Point>, Stroke),
    Label(String, Point, LabelStyle),
}

/// A surface that records what was drawn on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// A surface that reports no size, so charts fall back to their defaults.
    pub fn without_size() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_blank(&self) -> bool {
        self.ops.iter().all(|op| matches!(op, DrawOp::Clear(_)))
    }

    pub fn polylines(&self) -> impl Iterator<Item = (&[Point], &Stroke)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Polyline(pts, stroke) => Some((pts.as_slice(), stroke)),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, Point)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Label(text, at, _) => Some((text.as_str(), *at)),
            _ => None,
        })
    }

    /// Draw every recorded operation onto `target`, in order.
    pub fn replay<S: Surface + ?Sized>(&self, target: &mut S) -> Result<()> {
        for op in &self.ops {
            match op {
                DrawOp::Clear(r) => target.clear(*r)?,
                DrawOp::FillRect(r, c) => target.fill_rect(*r, *c)?,
                DrawOp::Polyline(pts, stroke) => target.stroke_line(pts, stroke)?,
                DrawOp::Label(text, at, style) => target.draw_label(text, *at, style)?,
            }
        }
        Ok(())
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, rect: Rect) -> Result<()> {
        // A full clear makes everything before it invisible.
        if rect.covers(self.width as f64, self.height as f64) {
            self.ops.clear();
        }
        self.ops.push(DrawOp::Clear(rect));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb8) -> Result<()> {
        self.ops.push(DrawOp::FillRect(rect, color));
        Ok(())
    }

    fn stroke_line(&mut self, points: &[Point], stroke: &Stroke) -> Result<()> {
        self.ops.push(DrawOp::Polyline(points.to_vec(), stroke.clone()));
        Ok(())
    }

    fn draw_label(&mut self, text: &str, at: Point, style: &LabelStyle) -> Result<()> {
        self.ops
            .push(DrawOp::Label(text.to_string(), at, style.clone()));
        Ok(())
    }
}
