//! Catmull-Rom curve sampling for series paths.

use std::fmt::Write as _;

use super::types::PlotPoint;

/// Parametric step between curve samples.
pub const CURVE_STEP: f64 = 0.1;
/// Samples emitted per segment (`t = 0.0, 0.1, ..., 1.0`).
pub const SAMPLES_PER_SEGMENT: usize = 11;
/// Minimum number of points that produce a curve.
pub const MIN_CURVE_POINTS: usize = 3;

/// One coordinate of a uniform Catmull-Rom segment between `p1` and `p2`.
#[must_use]
pub fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Samples the curve through `points`, repeating the first and last point as
/// virtual control points.
///
/// Returns `(x, y)` pairs: the first point followed by [`SAMPLES_PER_SEGMENT`]
/// samples for every consecutive pair. Fewer than [`MIN_CURVE_POINTS`]
/// points yield nothing.
#[must_use]
pub fn sample_catmull_rom(points: &[PlotPoint]) -> Vec<(f64, f64)> {
    if points.len() < MIN_CURVE_POINTS {
        return Vec::new();
    }

    let last = points.len() - 1;
    let mut samples = Vec::with_capacity(1 + last * SAMPLES_PER_SEGMENT);
    samples.push((points[0].x, points[0].y));

    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        for step in 0..SAMPLES_PER_SEGMENT {
            let t = step as f64 * CURVE_STEP;
            samples.push((
                catmull_rom(p0.x, p1.x, p2.x, p3.x, t),
                catmull_rom(p0.y, p1.y, p2.y, p3.y, t),
            ));
        }
    }
    samples
}

/// SVG path data (`M x,y L x,y ...`) for the curve through `points`.
///
/// Empty when fewer than [`MIN_CURVE_POINTS`] points survive filtering.
#[must_use]
pub fn curve_path_data(points: &[PlotPoint]) -> String {
    let samples = sample_catmull_rom(points);
    let Some(((first_x, first_y), rest)) = samples.split_first() else {
        return String::new();
    };

    let mut path = String::with_capacity(samples.len() * 24);
    let _ = write!(path, "M{first_x},{first_y}");
    for (x, y) in rest {
        let _ = write!(path, " L{x},{y}");
    }
    path
}
