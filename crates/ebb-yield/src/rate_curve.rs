//! Piecewise-linear interest-rate curve.
//!
//! The curve is a list of `(utilization, rate)` knots sorted by utilization.
//! Between two knots the rate is interpolated linearly; above the last knot
//! it stays at the last rate. Below the first knot the result depends on
//! [`BelowRangePolicy`].

use std::cmp::Ordering;

use ebb_core::error::YieldError;
use ebb_core::types::RateCurvePoint;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Rate reported for utilizations below the first knot.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BelowRangePolicy {
    /// Report `0`. Matches the deployed interpolator, whose running result
    /// starts at zero and is only assigned inside a bracket or above the
    /// last knot.
    #[default]
    Zero,
    /// Report the first knot's rate (flat extrapolation).
    Clamp,
}

/// A validated rate curve.
#[derive(Clone, Debug, PartialEq)]
pub struct RateCurve {
    points: Vec<RateCurvePoint>,
    below_range: BelowRangePolicy,
}

impl RateCurve {
    /// Build a curve, rejecting empty or unsorted knot lists.
    pub fn new(points: Vec<RateCurvePoint>) -> Result<Self, YieldError> {
        check_points(&points)?;
        Ok(Self {
            points,
            below_range: BelowRangePolicy::default(),
        })
    }

    /// Same curve with a different below-range policy.
    pub fn with_below_range(mut self, policy: BelowRangePolicy) -> Self {
        self.below_range = policy;
        self
    }

    pub fn points(&self) -> &[RateCurvePoint] {
        &self.points
    }

    pub fn below_range(&self) -> BelowRangePolicy {
        self.below_range
    }

    /// Rate at utilization `u`.
    pub fn rate_at(&self, u: f64) -> f64 {
        interpolate(&self.points, u, self.below_range)
    }
}

/// Rate at utilization `u` on a sorted knot list, with the default
/// below-range policy.
pub fn interpolate_rate(points: &[RateCurvePoint], u: f64) -> Result<f64, YieldError> {
    check_points(points)?;
    Ok(interpolate(points, u, BelowRangePolicy::default()))
}

fn check_points(points: &[RateCurvePoint]) -> Result<(), YieldError> {
    if points.is_empty() {
        return Err(YieldError::EmptyRateCurve);
    }
    if let Some(index) = points
        .windows(2)
        .position(|w| {
            !matches!(
                w[0].utilization.partial_cmp(&w[1].utilization),
                Some(Ordering::Less | Ordering::Equal)
            )
        })
    {
        return Err(YieldError::UnsortedRateCurve { index: index + 1 });
    }
    Ok(())
}

/// `points` must be non-empty and sorted.
fn interpolate(points: &[RateCurvePoint], u: f64, below_range: BelowRangePolicy) -> f64 {
    for pair in points.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if lo.utilization <= u && u <= hi.utilization {
            // Knots are returned verbatim so the ends never pick up rounding.
            if u == lo.utilization {
                return lo.rate;
            }
            let width = hi.utilization - lo.utilization;
            if u == hi.utilization || width == 0.0 {
                return hi.rate;
            }
            return lo.rate + (u - lo.utilization) / width * (hi.rate - lo.rate);
        }
    }

    let first = points[0];
    let last = points[points.len() - 1];
    if u >= last.utilization {
        return last.rate;
    }

    trace!(u, first = first.utilization, ?below_range, "utilization below rate curve");
    match below_range {
        BelowRangePolicy::Zero => 0.0,
        BelowRangePolicy::Clamp => first.rate,
    }
}
