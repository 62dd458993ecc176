//! # ebb-yield — Yield preview maths.
//!
//! - **Rate curve**: piecewise-linear borrow rate by pool utilization.
//! - **Emission schedule**: reward-mining rate `total · λ · e^(−λt)`, split
//!   between borrowers and suppliers and normalized per pooled token.
//! - **Compounding**: APR ↔ APY at a given number of periods per year.
//! - **Utilization**: pool utilization and the supply rate it implies.

pub mod compounding;
pub mod emission;
pub mod rate_curve;
pub mod utilization;

pub use compounding::{apr_to_apy, apy_to_apr};
pub use emission::{per_token_rate, preview_per_token_rate, EmissionSchedule};
pub use rate_curve::{interpolate_rate, BelowRangePolicy, RateCurve};
pub use utilization::{pool_rates, preview_utilization, supply_rate, PoolRates};
