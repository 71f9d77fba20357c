// waypath_core/src/spline/mod.rs

use dyn_clone::DynClone;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

// --- The Spline Trait ("Contract") ---
/// A one-dimensional interpolant p(s) over a strictly increasing knot vector.
///
/// Evaluation never extrapolates past the outer segments: `s` below the first
/// knot is evaluated on the first segment's polynomial and `s` at or above the
/// last knot on the last segment's polynomial.
pub trait Spline: DynClone + Debug + Send + Sync {
    fn interpolate(&self, s: f64) -> f64;
    fn derivative(&self, s: f64) -> f64;
    fn second_derivative(&self, s: f64) -> f64;
}

dyn_clone::clone_trait_object!(Spline);

/// Which interpolant the planner fits through the control polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplineType {
    #[default]
    Cubic,
    Quintic,
}

impl SplineType {
    pub fn fit(self, knots: &[f64], values: &[f64]) -> Box<dyn Spline> {
        match self {
            SplineType::Cubic => Box::new(CubicSpline::new(knots, values)),
            SplineType::Quintic => Box::new(QuinticSpline::new(knots, values)),
        }
    }
}

/// Index of the segment that owns `s`, clamped to `[0, knots.len() - 2]`.
/// Callers guarantee at least two knots.
pub(crate) fn segment_index(knots: &[f64], s: f64) -> usize {
    let last_segment = knots.len() - 2;
    // Number of knots <= s, minus one, is the owning segment.
    let upper = knots.partition_point(|&k| k <= s);
    upper.saturating_sub(1).min(last_segment)
}

// =========================================================================
// == Planar Path Spline ==
// =========================================================================

/// Independent x(s) and y(s) interpolants sharing one arc-length knot vector.
#[derive(Debug, Clone)]
pub struct PathSpline {
    knots: Vec<f64>,
    x: Box<dyn Spline>,
    y: Box<dyn Spline>,
}

impl PathSpline {
    /// Fits a spline through `points`, using cumulative chord length as the
    /// parameter. Consecutive points are expected to be distinct.
    pub fn fit(points: &[Point2<f64>], spline_type: SplineType) -> Self {
        let knots = chord_length_knots(points);
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

        Self {
            x: spline_type.fit(&knots, &xs),
            y: spline_type.fit(&knots, &ys),
            knots,
        }
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Chord length of the control polyline, which is also the last knot.
    pub fn total_length(&self) -> f64 {
        self.knots.last().copied().unwrap_or(0.0)
    }

    pub fn position(&self, s: f64) -> Point2<f64> {
        Point2::new(self.x.interpolate(s), self.y.interpolate(s))
    }

    pub fn derivative(&self, s: f64) -> Vector2<f64> {
        Vector2::new(self.x.derivative(s), self.y.derivative(s))
    }

    pub fn second_derivative(&self, s: f64) -> Vector2<f64> {
        Vector2::new(self.x.second_derivative(s), self.y.second_derivative(s))
    }
}

/// Cumulative Euclidean distance along the polyline, starting at 0.
pub fn chord_length_knots(points: &[Point2<f64>]) -> Vec<f64> {
    let mut knots = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += nalgebra::distance(&points[i - 1], p);
        }
        knots.push(total);
    }
    knots
}

// --- Declare the implementation sub-modules ---
mod cubic;
mod quintic;

// --- Re-export the public structs for a clean API ---
pub use cubic::CubicSpline;
pub use quintic::QuinticSpline;
