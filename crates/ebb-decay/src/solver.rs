//! Bonding-curve solver: size the position that moves the cursor to a target.
//!
//! Inverts [`simulate_impact`](crate::cursor::simulate_impact). Locking `a`
//! on yes gives `(yes + a) / (total + a)`; on no it gives `yes / (total + a)`.
//! Setting either to the target `c` and solving for `a`:
//!
//! - yes: `a = (c·total − yes) / (1 − c)`
//! - no:  `a = yes / c − total`
//!
//! Both divide by something that vanishes at the edges of `[0, 1]`, so the
//! target must lie strictly inside the interval.

use ebb_core::error::CursorError;
use ebb_core::types::{Choice, CursorState, PositionIntent};
use tracing::trace;

/// The position that moves the cursor of `state` to `target`.
///
/// Picks yes when the state has no cursor yet or the target is above it,
/// no otherwise. The amount is floored to whole sub-units and never negative.
///
/// Flooring costs at most one sub-unit, so the projected cursor lands within
/// about `1 / total` of `target`. For totals of a few sub-units the floor
/// dominates: a move needing less than one sub-unit yields a zero amount and
/// leaves the cursor where it was.
pub fn solve_for_cursor(state: &CursorState, target: f64) -> Result<PositionIntent, CursorError> {
    if target.is_nan() || target <= 0.0 || target >= 1.0 {
        return Err(CursorError::CursorOutOfDomain(target));
    }

    let choice = match state.cursor {
        Some(cursor) if target <= cursor => Choice::No,
        _ => Choice::Yes,
    };

    let raw = match choice {
        Choice::Yes => (target * state.total - state.yes) / (1.0 - target),
        Choice::No => state.yes / target - state.total,
    };

    let amount = raw.floor();
    if amount.is_nan() || amount <= 0.0 {
        trace!(target_cursor = target, raw, %choice, "solved amount clamped to zero");
        return Ok(PositionIntent::none(choice));
    }
    // `as` saturates at u128::MAX for out-of-range floats.
    Ok(PositionIntent::new(choice, amount as u128))
}
