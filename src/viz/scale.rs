//! Linear mapping from (category index, value) to surface pixels.

use super::types::{Point, Series};

/// Global value extremes across every series of one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    /// Extremes over all values of all series; `None` when there are no values.
    pub fn from_series(series: &[Series]) -> Option<Scale> {
        let mut values = series.iter().flat_map(|s| s.values.iter().copied());
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Scale { min, max })
    }

    /// Zero value range: every value maps to mid-height.
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

/// Pixel geometry of the plot: surface size and the inset on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotFrame {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PlotFrame {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    /// `x(i) = m + i / (n - 1) * (W - 2m)`; a single category sits on the left edge.
    pub fn x(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.margin;
        }
        self.margin + (index as f64 / (count - 1) as f64) * self.plot_width()
    }

    /// `y(v) = m + (1 - (v - min) / (max - min)) * (H - 2m)`; a flat range maps to mid-height.
    pub fn y(&self, value: f64, scale: Scale) -> f64 {
        if scale.is_degenerate() {
            return self.margin + self.plot_height() / 2.0;
        }
        let t = (value - scale.min) / (scale.max - scale.min);
        self.margin + (1.0 - t) * self.plot_height()
    }

    pub fn point(&self, index: usize, count: usize, value: f64, scale: Scale) -> Point {
        Point::new(self.x(index, count), self.y(value, scale))
    }

    /// Bottom of the plot, where the horizontal axis runs.
    pub fn baseline(&self) -> f64 {
        self.height - self.margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_span_all_series() {
        let s = vec![
            Series::new("a", vec![3.0, -1.0]),
            Series::new("b", vec![7.5, 2.0]),
        ];
        let scale = Scale::from_series(&s).unwrap();
        assert_eq!(scale, Scale { min: -1.0, max: 7.5 });
        assert!(Scale::from_series(&[]).is_none());
    }

    #[test]
    fn y_is_inverted() {
        let f = PlotFrame::new(800.0, 400.0, 40.0);
        let scale = Scale { min: 0.0, max: 10.0 };
        assert_eq!(f.y(10.0, scale), 40.0);
        assert_eq!(f.y(0.0, scale), 360.0);
        assert_eq!(f.y(5.0, scale), 200.0);
    }
}
