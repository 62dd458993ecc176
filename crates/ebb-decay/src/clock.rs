//! Exponential decay clock.
//!
//! The clock maps an instant to a growth factor `exp(λ·(t − genesis))` with
//! `λ = ln 2 / half_life`. Upstream adds each contribution to an accumulator
//! as `raw * factor(t_added)`; reading `accumulator / factor(now)` gives the
//! sum of `raw * 2^(-(now - t_added) / half_life)` without revisiting any
//! individual contribution.
//!
//! `genesis`, `half_life`, and `t` must share one time unit (seconds
//! throughout this workspace).

use std::f64::consts::LN_2;

use ebb_core::constants::nanos_to_secs;
use ebb_core::error::DecayError;

/// Decay constant `λ = ln 2 / half_life`.
///
/// Fails for zero, negative, or non-finite half-lives.
pub fn decay_lambda(half_life: f64) -> Result<f64, DecayError> {
    if half_life <= 0.0 || !half_life.is_finite() {
        return Err(DecayError::NonPositiveHalfLife(half_life));
    }
    Ok(LN_2 / half_life)
}

/// Decay factor at `t` for a clock started at `genesis_time`.
///
/// Equals 1 at `genesis_time` and doubles every `half_life`.
pub fn decay_factor(genesis_time: f64, half_life: f64, t: f64) -> Result<f64, DecayError> {
    Ok(DecayClock::new(genesis_time, half_life)?.factor_at(t))
}

/// A validated decay clock with its decay constant precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayClock {
    genesis_time: f64,
    half_life: f64,
    lambda: f64,
}

impl DecayClock {
    pub fn new(genesis_time: f64, half_life: f64) -> Result<Self, DecayError> {
        let lambda = decay_lambda(half_life)?;
        Ok(Self {
            genesis_time,
            half_life,
            lambda,
        })
    }

    pub fn genesis_time(&self) -> f64 {
        self.genesis_time
    }

    pub fn half_life(&self) -> f64 {
        self.half_life
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Growth factor at `t` (seconds).
    ///
    /// Overflows to `+inf` once `λ·(t − genesis)` passes ~709, i.e. after
    /// roughly 1,000 half-lives; see [`rebase`](Self::rebase).
    pub fn factor_at(&self, t: f64) -> f64 {
        (self.lambda * (t - self.genesis_time)).exp()
    }

    /// Growth factor at a nanosecond instant.
    pub fn factor_at_nanos(&self, nanos: u64) -> f64 {
        self.factor_at(nanos_to_secs(nanos))
    }

    /// Accumulator increment for `raw` weight added at `t_added`.
    pub fn accumulate(&self, raw: f64, t_added: f64) -> f64 {
        raw * self.factor_at(t_added)
    }

    /// Time-weighted value of `accumulator` read at `t`.
    pub fn read(&self, accumulator: f64, t: f64) -> f64 {
        accumulator / self.factor_at(t)
    }

    /// Move genesis to `new_genesis`.
    ///
    /// Returns the new clock and the divisor every stored accumulator must be
    /// divided by so that reads stay unchanged.
    pub fn rebase(&self, new_genesis: f64) -> (Self, f64) {
        let divisor = self.factor_at(new_genesis);
        let clock = Self {
            genesis_time: new_genesis,
            ..*self
        };
        (clock, divisor)
    }
}
