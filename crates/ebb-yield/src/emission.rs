//! Reward-mining emission schedule.
//!
//! Cumulative emission follows `E(t) = total · (1 − e^(−λt))` with
//! `λ = ln 2 / half_life`, so the instantaneous rate is
//! `E'(t) = total · λ · e^(−λt)`: strictly decreasing, halving every
//! half-life, and summing to `total` over all time.
//!
//! The daily rate is split between the borrow and supply buckets; each
//! bucket is then shared pro rata across the raw amount in its pool.

use ebb_core::constants::SECONDS_PER_DAY;
use ebb_core::error::{EbbError, YieldError};
use ebb_core::types::{EmissionParameters, EmissionSplit};
use ebb_decay::clock::decay_lambda;

/// A validated emission schedule with its decay constant precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionSchedule {
    params: EmissionParameters,
    lambda: f64,
}

impl EmissionSchedule {
    pub fn new(params: EmissionParameters) -> Result<Self, EbbError> {
        let lambda = decay_lambda(params.half_life_seconds)?;
        if !(0.0..=1.0).contains(&params.borrowers_share) {
            return Err(YieldError::InvalidBorrowersShare(params.borrowers_share).into());
        }
        Ok(Self { params, lambda })
    }

    pub fn params(&self) -> &EmissionParameters {
        &self.params
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Emission rate in sub-units per second, `t` seconds after emission start.
    pub fn rate_per_second(&self, t: f64) -> f64 {
        self.params.total_amount as f64 * self.lambda * (-self.lambda * t).exp()
    }

    /// Emission rate in sub-units per day.
    pub fn rate_per_day(&self, t: f64) -> f64 {
        self.rate_per_second(t) * SECONDS_PER_DAY
    }

    /// Split `total_rate` between borrowers and suppliers.
    pub fn split(&self, total_rate: f64) -> EmissionSplit {
        let share = self.params.borrowers_share;
        EmissionSplit {
            borrow: total_rate * share,
            supply: total_rate * (1.0 - share),
        }
    }

    /// Daily emission split at `t`.
    pub fn daily_split(&self, t: f64) -> EmissionSplit {
        self.split(self.rate_per_day(t))
    }

    /// Total amount emitted between emission start and `t`.
    pub fn cumulative_emitted(&self, t: f64) -> f64 {
        self.params.total_amount as f64 * -(-self.lambda * t).exp_m1()
    }
}

/// Reward rate per raw pooled sub-unit; `0` for an empty pool.
pub fn per_token_rate(bucket_rate: f64, pool_raw_amount: u128) -> f64 {
    if pool_raw_amount == 0 {
        return 0.0;
    }
    bucket_rate / pool_raw_amount as f64
}

/// Per-token rate as it would be after adding `delta` to the pool.
///
/// `bucket_rate` is held at its current value: a single preview position
/// barely moves the aggregate split, so only the denominator is perturbed.
/// A withdrawal larger than the pool yields `0`.
pub fn preview_per_token_rate(bucket_rate: f64, pool_raw_amount: u128, delta: i128) -> f64 {
    let pool = if delta >= 0 {
        pool_raw_amount.saturating_add(delta.unsigned_abs())
    } else {
        pool_raw_amount.saturating_sub(delta.unsigned_abs())
    };
    per_token_rate(bucket_rate, pool)
}
