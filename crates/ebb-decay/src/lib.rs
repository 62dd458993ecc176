//! # ebb-decay — Decay-weighted consensus engine.
//!
//! Consensus weight fades with a configurable half-life. Instead of replaying
//! every historical contribution, upstream stores monotonically growing
//! accumulators (`raw * decay_factor(t_added)`) and this crate reads them by
//! dividing by `decay_factor(now)`:
//! - **Decay clock**: `exp(ln 2 / half_life * (t - genesis))`, strictly increasing in `t`.
//! - **Cursor**: the yes fraction of the time-weighted totals, undefined when nothing is locked.
//! - **Impact simulation**: projects the cursor under a hypothetical position.
//! - **Bonding-curve solve**: inverts the projection to size a position for a target cursor.
//! - **Snapshot guard**: optional staleness check before reading a snapshot.

pub mod clock;
pub mod cursor;
pub mod engine;
pub mod snapshot;
pub mod solver;

pub use clock::{decay_factor, DecayClock};
pub use cursor::{compute_cursor_state, cursor_timeline, simulate_impact};
pub use engine::ConsensusEngine;
pub use snapshot::cursor_state_at;
pub use solver::solve_for_cursor;
