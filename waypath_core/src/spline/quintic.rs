// waypath_core/src/spline/quintic.rs

use super::{segment_index, CubicSpline, Spline};

/// Spans shorter than this fall back to a quadratic segment.
const DEGENERATE_SPAN: f64 = 1e-9;

/// Piecewise quintic Hermite interpolant.
///
/// Each segment matches position, first and second derivative at both of its
/// knots. Knot slopes come from a natural cubic spline over the same data and
/// the knot second derivatives are pinned to 0. That is a simplification: the
/// result is C1 and passes through every point, but it is not a true
/// acceleration-continuous fit.
#[derive(Debug, Clone)]
pub struct QuinticSpline {
    knots: Vec<f64>,
    /// Per-segment coefficients c0..c5 in t = s - knots[i].
    coefficients: Vec<[f64; 6]>,
    /// Used when there are fewer than 2 knots.
    fallback: f64,
}

impl QuinticSpline {
    pub fn new(knots: &[f64], values: &[f64]) -> Self {
        let n_knots = knots.len().min(values.len());
        let knots = knots[..n_knots].to_vec();
        let fallback = values.first().copied().unwrap_or(0.0);

        if n_knots < 2 {
            return Self {
                knots,
                coefficients: Vec::new(),
                fallback,
            };
        }

        let slopes = CubicSpline::new(&knots, &values[..n_knots]).knot_derivatives();
        let coefficients = (0..n_knots - 1)
            .map(|i| {
                let h = knots[i + 1] - knots[i];
                let start = (values[i], slopes[i], 0.0);
                let end = (values[i + 1], slopes[i + 1], 0.0);
                segment_coefficients(h, start, end)
            })
            .collect();

        Self {
            knots,
            coefficients,
            fallback,
        }
    }

    fn locate(&self, s: f64) -> (&[f64; 6], f64) {
        let i = segment_index(&self.knots, s);
        (&self.coefficients[i], s - self.knots[i])
    }
}

/// Quintic Hermite coefficients for one segment of length `h`, given
/// (position, velocity, acceleration) at each end.
fn segment_coefficients(h: f64, start: (f64, f64, f64), end: (f64, f64, f64)) -> [f64; 6] {
    let (p0, v0, a0) = start;
    let (p1, v1, a1) = end;

    if h.abs() < DEGENERATE_SPAN {
        return [p0, v0, 0.5 * a0, 0.0, 0.0, 0.0];
    }

    let h2 = h * h;
    let h3 = h2 * h;
    let dp = p1 - p0;

    let c3 = (20.0 * dp - (8.0 * v1 + 12.0 * v0) * h - (3.0 * a0 - a1) * h2) / (2.0 * h3);
    let c4 = (-30.0 * dp + (14.0 * v1 + 16.0 * v0) * h + (3.0 * a0 - 2.0 * a1) * h2) / (2.0 * h3 * h);
    let c5 = (12.0 * dp - 6.0 * (v1 + v0) * h - (a0 - a1) * h2) / (2.0 * h3 * h2);

    [p0, v0, 0.5 * a0, c3, c4, c5]
}

impl Spline for QuinticSpline {
    fn interpolate(&self, s: f64) -> f64 {
        if self.coefficients.is_empty() {
            return self.fallback;
        }
        let (c, t) = self.locate(s);
        c[0] + t * (c[1] + t * (c[2] + t * (c[3] + t * (c[4] + t * c[5]))))
    }

    fn derivative(&self, s: f64) -> f64 {
        if self.coefficients.is_empty() {
            return 0.0;
        }
        let (c, t) = self.locate(s);
        c[1] + t * (2.0 * c[2] + t * (3.0 * c[3] + t * (4.0 * c[4] + t * 5.0 * c[5])))
    }

    fn second_derivative(&self, s: f64) -> f64 {
        if self.coefficients.is_empty() {
            return 0.0;
        }
        let (c, t) = self.locate(s);
        2.0 * c[2] + t * (6.0 * c[3] + t * (12.0 * c[4] + t * 20.0 * c[5]))
    }
}
