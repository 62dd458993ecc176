//! Error types for the Ebb preview engine.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecayError {
    #[error("half-life must be positive, got {0}")] NonPositiveHalfLife(f64),
    #[error("decay factor must be positive, got {0}")] InvalidDecayFactor(f64),
    #[error("snapshot is stale: age {age_ns}ns exceeds {max_age_ns}ns")] StaleSnapshot { age_ns: u64, max_age_ns: u64 },
    #[error("snapshot taken at {taken_at} is ahead of now {now}")] SnapshotFromFuture { taken_at: u64, now: u64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CursorError {
    #[error("target cursor {0} outside the open interval (0, 1)")] CursorOutOfDomain(f64),
    #[error("position amount must be non-negative, got {0}")] NegativeAmount(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum YieldError {
    #[error("rate curve has no points")] EmptyRateCurve,
    #[error("rate curve not sorted by utilization at index {index}")] UnsortedRateCurve { index: usize },
    #[error("borrowers share must be within [0, 1], got {0}")] InvalidBorrowersShare(f64),
    #[error("compounding periods must be positive, got {0}")] NonPositiveCompoundingPeriods(f64),
    #[error("rate {0} loses more than the whole principal")] RateBelowTotalLoss(f64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("history sample {index} at {timestamp} is not older than its successor")] Unordered { index: usize, timestamp: u64 },
}

#[derive(Error, Debug)]
pub enum EbbError {
    #[error(transparent)] Decay(#[from] DecayError),
    #[error(transparent)] Cursor(#[from] CursorError),
    #[error(transparent)] Yield(#[from] YieldError),
    #[error(transparent)] Timeline(#[from] TimelineError),
    #[error("provider: {0}")] Provider(String),
}
