//! Consensus cursor: reading decayed aggregates and projecting positions.

use ebb_core::error::DecayError;
use ebb_core::timeline::Timeline;
use ebb_core::types::{Choice, CursorState, DecayedAggregate, PositionIntent};

use crate::clock::DecayClock;

/// Time-weighted consensus state for `aggregate` under `decay_factor`.
///
/// `yes = current_yes / f`, `no = current_no / f`, `total = yes + no`,
/// `cursor = yes / total` (or `None` when `total == 0`).
///
/// Fails when the factor is zero, negative, or not finite.
pub fn compute_cursor_state(
    aggregate: &DecayedAggregate,
    decay_factor: f64,
) -> Result<CursorState, DecayError> {
    if decay_factor <= 0.0 || !decay_factor.is_finite() {
        return Err(DecayError::InvalidDecayFactor(decay_factor));
    }
    Ok(CursorState::from_weights(
        aggregate.current_yes / decay_factor,
        aggregate.current_no / decay_factor,
    ))
}

/// Project `state` as if `intent` had been locked.
///
/// Only `total` and `cursor` advance. `yes` and `no` deliberately keep their
/// pre-commit values: displays of raw totals (value locked) must stay
/// accurate until the position is actually submitted, while sliders and
/// consensus gauges need the live cursor. Both preview call sites rely on
/// this split.
pub fn simulate_impact(state: &CursorState, intent: &PositionIntent) -> CursorState {
    let amount = intent.amount as f64;
    let new_total = state.total + amount;
    let yes_after = match intent.choice {
        Choice::Yes => state.yes + amount,
        Choice::No => state.yes,
    };
    let cursor = if new_total == 0.0 {
        None
    } else {
        Some(yes_after / new_total)
    };
    CursorState {
        yes: state.yes,
        no: state.no,
        total: new_total,
        cursor,
    }
}

/// Cursor history for a series of aggregates, each read at its own timestamp.
///
/// Samples whose decay factor cannot be read (overflowed clock) are dropped;
/// if the current one cannot be read the whole series is `None`.
pub fn cursor_timeline(
    aggregates: &Timeline<DecayedAggregate>,
    clock: &DecayClock,
) -> Option<Timeline<CursorState>> {
    aggregates.map_timed(|sample| {
        compute_cursor_state(&sample.data, clock.factor_at_nanos(sample.timestamp)).ok()
    })
}
