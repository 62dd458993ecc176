//! Trait interfaces for the Ebb preview engine.
//!
//! These traits define the contracts between crates and collaborators:
//! - [`ConsensusCurve`] — cursor maths and its bonding-curve inverse (ebb-decay implements)
//! - [`SnapshotProvider`] — supplies consensus snapshots and the current instant
//! - [`ParameterProvider`] — supplies rate curves, emission parameters, and compounding convention
//!
//! Providers are implemented by whatever sits between the engine and the
//! remote service. The engine never looks anything up on its own; every
//! input arrives through one of these traits or as an explicit argument.

use crate::constants::{clamp_target_cursor, DEFAULT_COMPOUNDING_PERIODS};
use crate::error::{CursorError, DecayError, EbbError};
use crate::types::{
    ConsensusSnapshot, CursorState, DecayedAggregate, EmissionParameters, PositionIntent,
    RateCurvePoint,
};

/// Pure consensus-cursor computation.
///
/// Turns a decay-weighted aggregate into a [`CursorState`], projects the
/// state under a hypothetical position, and solves for the position that
/// reaches a target cursor. Implemented by the consensus engine (ebb-decay).
pub trait ConsensusCurve: Send + Sync {
    /// Read the time-weighted yes/no weights by dividing the accumulators by `decay_factor`.
    fn cursor_state(
        &self,
        aggregate: &DecayedAggregate,
        decay_factor: f64,
    ) -> Result<CursorState, DecayError>;

    /// Project `state` as if `intent` had been locked.
    ///
    /// Only `total` and `cursor` move; `yes` and `no` keep their pre-commit values.
    fn simulate_impact(&self, state: &CursorState, intent: &PositionIntent) -> CursorState;

    /// The position that moves the cursor of `state` to `target`.
    fn solve_for_cursor(
        &self,
        state: &CursorState,
        target: f64,
    ) -> Result<PositionIntent, CursorError>;

    /// Clamp `target` into the interactive range, solve for it, and project the result.
    ///
    /// Default implementation chains [`solve_for_cursor`](Self::solve_for_cursor)
    /// and [`simulate_impact`](Self::simulate_impact).
    fn preview_target(
        &self,
        state: &CursorState,
        target: f64,
    ) -> Result<(PositionIntent, CursorState), CursorError> {
        let intent = self.solve_for_cursor(state, clamp_target_cursor(target))?;
        Ok((intent, self.simulate_impact(state, &intent)))
    }
}

/// Source of consensus snapshots, pulled at a cadence the caller decides.
pub trait SnapshotProvider: Send + Sync {
    /// The latest consensus snapshot.
    fn consensus_snapshot(&self) -> Result<ConsensusSnapshot, EbbError>;

    /// The current instant in nanoseconds.
    fn now_nanos(&self) -> u64;
}

/// Source of protocol parameters.
pub trait ParameterProvider: Send + Sync {
    /// Interest-rate curve knots, ascending by utilization.
    fn rate_curve(&self) -> Result<Vec<RateCurvePoint>, EbbError>;

    /// Reward-mining emission schedule.
    fn emission_parameters(&self) -> Result<EmissionParameters, EbbError>;

    /// Compounding periods per year used for APR → APY.
    ///
    /// Default implementation: per-second compounding.
    fn compounding_periods(&self) -> f64 {
        DEFAULT_COMPOUNDING_PERIODS
    }
}
