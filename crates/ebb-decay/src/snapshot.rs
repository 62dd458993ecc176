//! Reading a consensus snapshot at the current instant.
//!
//! A snapshot's aggregate and clock parameters must come from the same
//! refresh cycle as the instant they are read at; mixing a stale aggregate
//! with a fresh clock yields a wrong but plausible cursor. Passing a
//! `max_age` turns that silent error into [`DecayError::StaleSnapshot`].

use std::time::Duration;

use ebb_core::error::DecayError;
use ebb_core::types::{ConsensusSnapshot, CursorState};
use tracing::{debug, warn};

use crate::clock::DecayClock;
use crate::cursor::compute_cursor_state;

/// Age of `snapshot` at `now_ns`, failing if it was taken in the future.
pub fn snapshot_age(snapshot: &ConsensusSnapshot, now_ns: u64) -> Result<Duration, DecayError> {
    let age = now_ns
        .checked_sub(snapshot.taken_at)
        .ok_or(DecayError::SnapshotFromFuture {
            taken_at: snapshot.taken_at,
            now: now_ns,
        })?;
    Ok(Duration::from_nanos(age))
}

/// Cursor state of `snapshot` read at `now_ns`.
///
/// With `max_age = None` no freshness check is made.
pub fn cursor_state_at(
    snapshot: &ConsensusSnapshot,
    now_ns: u64,
    max_age: Option<Duration>,
) -> Result<CursorState, DecayError> {
    if let Some(max_age) = max_age {
        let age = snapshot_age(snapshot, now_ns)?;
        if age > max_age {
            warn!(?age, ?max_age, "refusing stale consensus snapshot");
            return Err(DecayError::StaleSnapshot {
                age_ns: u64::try_from(age.as_nanos()).unwrap_or(u64::MAX),
                max_age_ns: u64::try_from(max_age.as_nanos()).unwrap_or(u64::MAX),
            });
        }
    }

    let clock = DecayClock::new(snapshot.genesis_time, snapshot.half_life)?;
    let factor = clock.factor_at_nanos(now_ns);
    debug!(factor, now_ns, "reading consensus snapshot");
    compute_cursor_state(&snapshot.aggregate, factor)
}
