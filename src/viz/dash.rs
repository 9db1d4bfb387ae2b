//! Split a polyline into dash segments for backends without native dashes.

use super::types::Point;

/// Break `points` into the visible pieces of the repeating `pattern`
/// (dash, gap, dash, gap, ...). The pattern continues across vertices.
///
/// A pattern that is empty or has no positive length yields the whole
/// polyline as one piece.
pub fn dash_segments(points: &[Point], pattern: &[f64]) -> Vec<Vec<Point>> {
    let pattern: Vec<f64> = pattern.iter().copied().filter(|l| *l > 0.0).collect();
    if pattern.is_empty() || points.len() < 2 {
        return vec![points.to_vec()];
    }

    // An odd-length pattern repeats twice so dashes and gaps keep alternating.
    let cycle = if pattern.len() % 2 == 1 {
        pattern.len() * 2
    } else {
        pattern.len()
    };

    let mut out: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut slot = 0usize; // even = dash, odd = gap
    let mut left = pattern[0];

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            continue;
        }
        let at = |d: f64| Point::new(a.x + dx * d / len, a.y + dy * d / len);

        let mut pos = 0.0;
        while pos < len {
            let step = left.min(len - pos);
            let drawing = slot % 2 == 0;
            if drawing {
                if current.is_empty() {
                    current.push(at(pos));
                }
                current.push(at(pos + step));
            }
            pos += step;
            left -= step;
            if left <= 0.0 {
                if drawing && current.len() > 1 {
                    out.push(std::mem::take(&mut current));
                }
                current.clear();
                slot = (slot + 1) % cycle;
                left = pattern[slot % pattern.len()];
            }
        }
    }
    if current.len() > 1 {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_splits_evenly() {
        let pts = [Point::new(0.0, 0.0), Point::new(24.0, 0.0)];
        let dashes = dash_segments(&pts, &[6.0, 6.0]);
        assert_eq!(dashes.len(), 2);
        assert_eq!(dashes[0], vec![Point::new(0.0, 0.0), Point::new(6.0, 0.0)]);
        assert_eq!(dashes[1], vec![Point::new(12.0, 0.0), Point::new(18.0, 0.0)]);
    }

    #[test]
    fn dash_continues_around_corner() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 10.0),
        ];
        let dashes = dash_segments(&pts, &[6.0, 2.0]);
        assert_eq!(
            dashes[0],
            vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 2.0)]
        );
        assert_eq!(dashes[1][0], Point::new(4.0, 4.0));
    }

    #[test]
    fn empty_pattern_is_solid() {
        let pts = [Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        assert_eq!(dash_segments(&pts, &[]), vec![pts.to_vec()]);
    }
}
