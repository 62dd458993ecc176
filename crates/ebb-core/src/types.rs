//! Core value types: aggregates, cursor states, positions, and protocol parameters.
//!
//! Raw token amounts are `u128` sub-units. Weights, rates, and ratios are `f64`.
//! Every value here is an immutable snapshot; the engine builds fresh ones on
//! each call and never holds on to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CursorError;

/// Which side of the consensus a position backs.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Choice {
    Yes,
    No,
}

impl Choice {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => f.write_str("YES"),
            Self::No => f.write_str("NO"),
        }
    }
}

/// A hypothetical or solved position: lock `amount` raw sub-units on `choice`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionIntent {
    pub choice: Choice,
    pub amount: u128,
}

impl PositionIntent {
    pub fn new(choice: Choice, amount: u128) -> Self {
        Self { choice, amount }
    }

    /// Build an intent from a signed amount, rejecting negatives.
    pub fn from_signed(choice: Choice, amount: i128) -> Result<Self, CursorError> {
        let amount = u128::try_from(amount)
            .map_err(|_| CursorError::NegativeAmount(amount.to_string()))?;
        Ok(Self { choice, amount })
    }

    /// Build an intent from a floating amount (e.g. a slider value).
    ///
    /// The fractional part is truncated. Negative or NaN input is rejected.
    pub fn from_float(choice: Choice, amount: f64) -> Result<Self, CursorError> {
        if amount.is_nan() || amount < 0.0 {
            return Err(CursorError::NegativeAmount(amount.to_string()));
        }
        Ok(Self {
            choice,
            amount: amount.trunc() as u128,
        })
    }

    /// The zero-sized position on `choice`.
    pub fn none(choice: Choice) -> Self {
        Self { choice, amount: 0 }
    }
}

/// Decay-weighted totals for one consensus question, as stored upstream.
///
/// `current_yes` / `current_no` are accumulators that only grow: each
/// contribution is added as `raw * decay_factor(t_added)`. Dividing an
/// accumulator by `decay_factor(now)` yields the time-weighted value.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct DecayedAggregate {
    /// Undecayed raw amount locked on yes, in sub-units.
    pub total_yes: u128,
    /// Undecayed raw amount locked on no, in sub-units.
    pub total_no: u128,
    pub current_yes: f64,
    pub current_no: f64,
}

impl DecayedAggregate {
    /// An aggregate with only the decayed accumulators set.
    pub fn from_accumulators(current_yes: f64, current_no: f64) -> Self {
        Self {
            current_yes,
            current_no,
            ..Self::default()
        }
    }

    /// Total raw amount locked on both sides (the value-locked figure).
    pub fn total_locked(&self) -> u128 {
        self.total_yes.saturating_add(self.total_no)
    }
}

/// Time-weighted consensus at one instant.
///
/// `cursor` is `yes / total` when `total > 0` and `None` otherwise.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct CursorState {
    pub yes: f64,
    pub no: f64,
    pub total: f64,
    pub cursor: Option<f64>,
}

impl CursorState {
    /// Build a state from decayed yes/no weights, deriving `total` and `cursor`.
    pub fn from_weights(yes: f64, no: f64) -> Self {
        let total = yes + no;
        let cursor = if total == 0.0 { None } else { Some(yes / total) };
        Self {
            yes,
            no,
            total,
            cursor,
        }
    }

    /// The cursor, or `default` when nothing has been locked yet.
    pub fn cursor_or(&self, default: f64) -> f64 {
        self.cursor.unwrap_or(default)
    }
}

/// One knot of a piecewise-linear interest-rate curve.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RateCurvePoint {
    /// Utilization in `[0, 1]`.
    pub utilization: f64,
    /// Annual rate at this utilization, `>= 0`.
    pub rate: f64,
}

impl RateCurvePoint {
    pub const fn new(utilization: f64, rate: f64) -> Self {
        Self { utilization, rate }
    }
}

/// Parameters of the exponentially decaying reward-mining schedule.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EmissionParameters {
    /// Total amount the schedule ever emits, in sub-units.
    pub total_amount: u128,
    /// Time after which the emission rate has halved, in seconds.
    pub half_life_seconds: f64,
    /// Fraction of emissions paid to borrowers, in `[0, 1]`.
    pub borrowers_share: f64,
}

/// Emission rate split between the borrow and supply buckets.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EmissionSplit {
    pub borrow: f64,
    pub supply: f64,
}

/// Supplied vs borrowed liquidity in a lending pool.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct UtilizationState {
    pub raw_supplied: f64,
    pub raw_borrowed: f64,
    /// `raw_borrowed / raw_supplied`, or `0` for an empty pool.
    pub ratio: f64,
}

impl UtilizationState {
    pub fn from_raw(raw_supplied: f64, raw_borrowed: f64) -> Self {
        let ratio = if raw_supplied > 0.0 {
            raw_borrowed / raw_supplied
        } else {
            0.0
        };
        Self {
            raw_supplied,
            raw_borrowed,
            ratio,
        }
    }
}

/// Consensus inputs drawn from a single refresh cycle.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ConsensusSnapshot {
    pub aggregate: DecayedAggregate,
    /// Instant the decay clock started, in seconds.
    pub genesis_time: f64,
    /// Consensus weight half-life, in seconds.
    pub half_life: f64,
    /// Instant the snapshot was taken, in nanoseconds.
    pub taken_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Choice::Yes).unwrap(), "\"YES\"");
        assert_eq!(serde_json::to_string(&Choice::No).unwrap(), "\"NO\"");
        let parsed: Choice = serde_json::from_str("\"NO\"").unwrap();
        assert_eq!(parsed, Choice::No);
    }

    #[test]
    fn choice_opposite() {
        assert_eq!(Choice::Yes.opposite(), Choice::No);
        assert_eq!(Choice::No.opposite().opposite(), Choice::No);
        assert_eq!(Choice::Yes.to_string(), "YES");
    }

    #[test]
    fn intent_from_signed_rejects_negative() {
        assert_eq!(
            PositionIntent::from_signed(Choice::Yes, -1),
            Err(CursorError::NegativeAmount("-1".to_string()))
        );
        let ok = PositionIntent::from_signed(Choice::No, 42).unwrap();
        assert_eq!(ok, PositionIntent::new(Choice::No, 42));
    }

    #[test]
    fn intent_from_float_truncates_and_rejects() {
        assert_eq!(
            PositionIntent::from_float(Choice::Yes, 12.9).unwrap().amount,
            12
        );
        assert!(PositionIntent::from_float(Choice::Yes, -0.5).is_err());
        assert!(PositionIntent::from_float(Choice::Yes, f64::NAN).is_err());
        assert_eq!(PositionIntent::from_float(Choice::No, 0.0).unwrap().amount, 0);
    }

    #[test]
    fn cursor_state_from_weights() {
        let s = CursorState::from_weights(300.0, 700.0);
        assert_eq!(s.total, 1000.0);
        assert_eq!(s.cursor, Some(0.3));

        let empty = CursorState::from_weights(0.0, 0.0);
        assert_eq!(empty.cursor, None);
        assert_eq!(empty.cursor_or(0.5), 0.5);
    }

    #[test]
    fn utilization_ratio() {
        let u = UtilizationState::from_raw(1_000.0, 250.0);
        assert_eq!(u.ratio, 0.25);
        let empty = UtilizationState::from_raw(0.0, 10.0);
        assert_eq!(empty.ratio, 0.0);
    }

    #[test]
    fn aggregate_total_locked_saturates() {
        let agg = DecayedAggregate {
            total_yes: u128::MAX,
            total_no: 1,
            ..DecayedAggregate::default()
        };
        assert_eq!(agg.total_locked(), u128::MAX);
    }

    #[test]
    fn snapshot_json_round_trip_keeps_fields() {
        let snap = ConsensusSnapshot {
            aggregate: DecayedAggregate {
                total_yes: 300,
                total_no: 700,
                current_yes: 300.0,
                current_no: 700.0,
            },
            genesis_time: 0.0,
            half_life: 604_800.0,
            taken_at: 1_000,
        };
        let json = serde_json::to_string(&snap).unwrap();
        let back: ConsensusSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
