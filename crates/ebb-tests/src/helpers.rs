//! Shared test helpers for scenario and property tests.

use ebb_core::constants::{DEFAULT_EMISSION_TOTAL, SECONDS_PER_DAY, TOKEN_UNIT};
use ebb_core::error::EbbError;
use ebb_core::traits::{ParameterProvider, SnapshotProvider};
use ebb_core::types::{
    ConsensusSnapshot, DecayedAggregate, EmissionParameters, RateCurvePoint,
};

/// One week, the usual consensus half-life.
pub const WEEK: f64 = 7.0 * SECONDS_PER_DAY;

/// `n` whole tokens in sub-units, as a float weight.
pub fn tokens(n: f64) -> f64 {
    n * TOKEN_UNIT as f64
}

/// An aggregate whose accumulators were all added at genesis.
pub fn aggregate_at_genesis(yes_tokens: u128, no_tokens: u128) -> DecayedAggregate {
    DecayedAggregate {
        total_yes: yes_tokens * TOKEN_UNIT,
        total_no: no_tokens * TOKEN_UNIT,
        current_yes: (yes_tokens * TOKEN_UNIT) as f64,
        current_no: (no_tokens * TOKEN_UNIT) as f64,
    }
}

/// The rate curve used across scenarios: gentle slope to 80%, steep above.
pub fn kinked_curve() -> Vec<RateCurvePoint> {
    vec![
        RateCurvePoint::new(0.0, 0.02),
        RateCurvePoint::new(0.8, 0.04),
        RateCurvePoint::new(1.0, 0.30),
    ]
}

/// A provider that serves fixed inputs, the way a refreshed service cache would.
pub struct StaticProvider {
    pub snapshot: ConsensusSnapshot,
    pub now_ns: u64,
    pub curve: Vec<RateCurvePoint>,
    pub emission: EmissionParameters,
}

impl StaticProvider {
    pub fn new(aggregate: DecayedAggregate, now_ns: u64) -> Self {
        Self {
            snapshot: ConsensusSnapshot {
                aggregate,
                genesis_time: 0.0,
                half_life: WEEK,
                taken_at: now_ns,
            },
            now_ns,
            curve: kinked_curve(),
            emission: EmissionParameters {
                total_amount: DEFAULT_EMISSION_TOTAL,
                half_life_seconds: 30.0 * SECONDS_PER_DAY,
                borrowers_share: 0.5,
            },
        }
    }
}

impl SnapshotProvider for StaticProvider {
    fn consensus_snapshot(&self) -> Result<ConsensusSnapshot, EbbError> {
        Ok(self.snapshot)
    }

    fn now_nanos(&self) -> u64 {
        self.now_ns
    }
}

impl ParameterProvider for StaticProvider {
    fn rate_curve(&self) -> Result<Vec<RateCurvePoint>, EbbError> {
        Ok(self.curve.clone())
    }

    fn emission_parameters(&self) -> Result<EmissionParameters, EbbError> {
        Ok(self.emission)
    }
}
