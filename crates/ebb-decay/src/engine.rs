//! Consensus engine implementing the [`ConsensusCurve`] trait.
//!
//! Binds the cursor calculator, impact simulator, and bonding-curve solver
//! behind one object so callers can hold a `&dyn ConsensusCurve`.

use ebb_core::error::{CursorError, DecayError};
use ebb_core::traits::ConsensusCurve;
use ebb_core::types::{CursorState, DecayedAggregate, PositionIntent};

use crate::clock::DecayClock;
use crate::cursor;
use crate::solver;

/// The production consensus calculator.
///
/// Stateless: every call works only on its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusEngine;

impl ConsensusEngine {
    /// Create a new ConsensusEngine.
    pub fn new() -> Self {
        Self
    }

    /// Cursor state of `aggregate` read through `clock` at `t` (seconds).
    pub fn cursor_state_at(
        &self,
        aggregate: &DecayedAggregate,
        clock: &DecayClock,
        t: f64,
    ) -> Result<CursorState, DecayError> {
        self.cursor_state(aggregate, clock.factor_at(t))
    }
}

impl ConsensusCurve for ConsensusEngine {
    fn cursor_state(
        &self,
        aggregate: &DecayedAggregate,
        decay_factor: f64,
    ) -> Result<CursorState, DecayError> {
        cursor::compute_cursor_state(aggregate, decay_factor)
    }

    fn simulate_impact(&self, state: &CursorState, intent: &PositionIntent) -> CursorState {
        cursor::simulate_impact(state, intent)
    }

    fn solve_for_cursor(
        &self,
        state: &CursorState,
        target: f64,
    ) -> Result<PositionIntent, CursorError> {
        solver::solve_for_cursor(state, target)
    }
}
