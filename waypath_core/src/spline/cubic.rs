// waypath_core/src/spline/cubic.rs

use nalgebra::DVector;

use super::{segment_index, Spline};

/// Natural cubic spline: p(t) = a + b·t + c·t² + d·t³ on each segment, with
/// t measured from the segment's left knot and p'' = 0 at both ends.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline {
    /// Fits the spline. `knots` must be strictly increasing and the same
    /// length as `values`; with fewer than 2 knots the spline degenerates to
    /// the single known value (or 0).
    pub fn new(knots: &[f64], values: &[f64]) -> Self {
        let n_knots = knots.len().min(values.len());
        let knots = knots[..n_knots].to_vec();
        let a = values[..n_knots].to_vec();

        if n_knots < 2 {
            return Self {
                knots,
                a,
                b: Vec::new(),
                c: Vec::new(),
                d: Vec::new(),
            };
        }

        let n = n_knots - 1; // number of segments
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();

        // --- Tridiagonal system for the second-derivative terms (Thomas algorithm) ---
        let mut alpha = DVector::<f64>::zeros(n_knots);
        for i in 1..n {
            alpha[i] = 3.0 / h[i] * (a[i + 1] - a[i]) - 3.0 / h[i - 1] * (a[i] - a[i - 1]);
        }

        let mut l = DVector::<f64>::zeros(n_knots);
        let mut mu = DVector::<f64>::zeros(n_knots);
        let mut z = DVector::<f64>::zeros(n_knots);
        l[0] = 1.0;
        for i in 1..n {
            l[i] = 2.0 * (knots[i + 1] - knots[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / l[i];
            z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
        }
        l[n] = 1.0;

        // --- Back substitution ---
        let mut c = vec![0.0; n_knots]; // natural boundary: c[n] = 0
        let mut b = vec![0.0; n];
        let mut d = vec![0.0; n];
        for j in (0..n).rev() {
            c[j] = z[j] - mu[j] * c[j + 1];
            b[j] = (a[j + 1] - a[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
            d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
        }
        c.truncate(n);

        Self { knots, a, b, c, d }
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    fn locate(&self, s: f64) -> (usize, f64) {
        let i = segment_index(&self.knots, s);
        (i, s - self.knots[i])
    }

    /// First derivative at every knot, including the right end of the last
    /// segment. Used to seed the quintic fit.
    pub fn knot_derivatives(&self) -> Vec<f64> {
        let n_knots = self.knots.len();
        if n_knots < 2 {
            return vec![0.0; n_knots];
        }
        let n = n_knots - 1;
        let h = self.knots[n] - self.knots[n - 1];
        let mut slopes = self.b.clone();
        slopes.push(self.b[n - 1] + 2.0 * self.c[n - 1] * h + 3.0 * self.d[n - 1] * h * h);
        slopes
    }
}

impl Spline for CubicSpline {
    fn interpolate(&self, s: f64) -> f64 {
        if self.knots.len() < 2 {
            return self.a.first().copied().unwrap_or(0.0);
        }
        let (i, t) = self.locate(s);
        self.a[i] + self.b[i] * t + self.c[i] * t * t + self.d[i] * t * t * t
    }

    fn derivative(&self, s: f64) -> f64 {
        if self.knots.len() < 2 {
            return 0.0;
        }
        let (i, t) = self.locate(s);
        self.b[i] + 2.0 * self.c[i] * t + 3.0 * self.d[i] * t * t
    }

    fn second_derivative(&self, s: f64) -> f64 {
        if self.knots.len() < 2 {
            return 0.0;
        }
        let (i, t) = self.locate(s);
        2.0 * self.c[i] + 6.0 * self.d[i] * t
    }
}
