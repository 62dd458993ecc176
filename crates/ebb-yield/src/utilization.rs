//! Pool utilization and the rates it implies.

use ebb_core::types::UtilizationState;
use serde::Serialize;
use tracing::debug;

use crate::rate_curve::RateCurve;

/// Borrow rate, supply rate and utilization for one pool state.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct PoolRates {
    pub utilization: f64,
    pub borrow_rate: f64,
    pub supply_rate: f64,
}

/// Borrow rate for `state` read off `curve`.
pub fn borrow_rate(state: &UtilizationState, curve: &RateCurve) -> f64 {
    curve.rate_at(state.ratio)
}

/// Rate paid to suppliers: borrower interest spread over the whole pool,
/// less the protocol's `reserve_factor` (clamped to `[0, 1]`).
pub fn supply_rate(borrow_rate: f64, utilization: f64, reserve_factor: f64) -> f64 {
    let reserve = if reserve_factor.is_nan() {
        0.0
    } else {
        reserve_factor.clamp(0.0, 1.0)
    };
    borrow_rate * utilization * (1.0 - reserve)
}

/// Borrow and supply rates for `state`.
pub fn pool_rates(state: &UtilizationState, curve: &RateCurve, reserve_factor: f64) -> PoolRates {
    let borrow = borrow_rate(state, curve);
    PoolRates {
        utilization: state.ratio,
        borrow_rate: borrow,
        supply_rate: supply_rate(borrow, state.ratio, reserve_factor),
    }
}

/// Pool state after supplying `supply_delta` and borrowing `borrow_delta`.
///
/// Negative deltas withdraw or repay; either side floors at zero.
pub fn preview_utilization(
    state: &UtilizationState,
    supply_delta: f64,
    borrow_delta: f64,
) -> UtilizationState {
    let supplied = (state.raw_supplied + supply_delta).max(0.0);
    let borrowed = (state.raw_borrowed + borrow_delta).max(0.0);
    let next = UtilizationState::from_raw(supplied, borrowed);
    debug!(before = state.ratio, after = next.ratio, "utilization preview");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebb_core::types::RateCurvePoint;

    fn curve() -> RateCurve {
        RateCurve::new(vec![
            RateCurvePoint::new(0.0, 0.02),
            RateCurvePoint::new(0.8, 0.04),
            RateCurvePoint::new(1.0, 0.30),
        ])
        .unwrap()
    }

    #[test]
    fn empty_pool_has_zero_utilization() {
        let s = UtilizationState::from_raw(0.0, 0.0);
        assert_eq!(s.ratio, 0.0);
        assert_eq!(borrow_rate(&s, &curve()), 0.02);
    }

    #[test]
    fn borrow_rate_follows_curve() {
        let s = UtilizationState::from_raw(1_000.0, 400.0);
        assert!((borrow_rate(&s, &curve()) - 0.03).abs() < 1e-12);
    }

    #[test]
    fn supply_rate_scales_by_utilization_and_reserve() {
        assert!((supply_rate(0.1, 0.5, 0.0) - 0.05).abs() < 1e-15);
        assert!((supply_rate(0.1, 0.5, 0.2) - 0.04).abs() < 1e-15);
        assert_eq!(supply_rate(0.1, 0.5, 1.5), 0.0);
        assert!((supply_rate(0.1, 0.5, f64::NAN) - 0.05).abs() < 1e-15);
    }

    #[test]
    fn pool_rates_combine() {
        let s = UtilizationState::from_raw(1_000.0, 400.0);
        let rates = pool_rates(&s, &curve(), 0.1);
        assert_eq!(rates.utilization, 0.4);
        assert!((rates.supply_rate - 0.03 * 0.4 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn preview_moves_ratio() {
        let s = UtilizationState::from_raw(1_000.0, 400.0);
        assert_eq!(preview_utilization(&s, 0.0, 400.0).ratio, 0.8);
        assert_eq!(preview_utilization(&s, 1_000.0, 0.0).ratio, 0.2);
    }

    #[test]
    fn preview_floors_at_zero() {
        let s = UtilizationState::from_raw(1_000.0, 400.0);
        let next = preview_utilization(&s, -5_000.0, -5_000.0);
        assert_eq!(next.raw_supplied, 0.0);
        assert_eq!(next.raw_borrowed, 0.0);
        assert_eq!(next.ratio, 0.0);
    }
}
