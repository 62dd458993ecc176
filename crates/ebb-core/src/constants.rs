//! Protocol constants. Raw token amounts are in sub-units (1 token = 10^8 sub-units).

/// Sub-units per whole token.
pub const TOKEN_UNIT: u128 = 100_000_000;

/// Seconds in a day, used to express emission rates per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Default compounding periods per year for APR → APY conversion.
///
/// Interest accrues every second, so the default compounds once per second.
///
/// # Examples
///
/// ```
/// use ebb_core::constants::{DEFAULT_COMPOUNDING_PERIODS, SECONDS_PER_YEAR};
/// assert_eq!(DEFAULT_COMPOUNDING_PERIODS, SECONDS_PER_YEAR);
/// ```
pub const DEFAULT_COMPOUNDING_PERIODS: f64 = SECONDS_PER_YEAR;

/// Nanoseconds per second. Timeline timestamps are nanosecond instants.
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// The cursor value at which yes and no weigh the same.
pub const NEUTRAL_CURSOR: f64 = 0.5;

/// Lowest target cursor accepted by interactive previews.
///
/// The bonding-curve solve divides by the target and by `1 - target`, so
/// callers clamp user input into `[MIN_TARGET_CURSOR, MAX_TARGET_CURSOR]`.
pub const MIN_TARGET_CURSOR: f64 = 0.001;

/// Highest target cursor accepted by interactive previews.
pub const MAX_TARGET_CURSOR: f64 = 0.999;

/// Default decay half-life for consensus weight: 7 days, in seconds.
pub const DEFAULT_CONSENSUS_HALF_LIFE_SECS: f64 = 7.0 * SECONDS_PER_DAY;

/// Default half-life of the mining emission schedule: 30 days, in seconds.
pub const DEFAULT_EMISSION_HALF_LIFE_SECS: f64 = 30.0 * SECONDS_PER_DAY;

/// Default total amount emitted by the mining schedule (1,000,000 tokens).
pub const DEFAULT_EMISSION_TOTAL: u128 = 1_000_000 * TOKEN_UNIT;

/// Default share of emissions paid to borrowers (the remainder goes to suppliers).
pub const DEFAULT_BORROWERS_SHARE: f64 = 0.5;

/// Clamp a requested target cursor into the open solver domain.
///
/// Non-finite input falls back to [`NEUTRAL_CURSOR`].
///
/// # Examples
///
/// ```
/// use ebb_core::constants::{clamp_target_cursor, MAX_TARGET_CURSOR, MIN_TARGET_CURSOR};
/// assert_eq!(clamp_target_cursor(0.0), MIN_TARGET_CURSOR);
/// assert_eq!(clamp_target_cursor(1.0), MAX_TARGET_CURSOR);
/// assert_eq!(clamp_target_cursor(0.42), 0.42);
/// ```
pub fn clamp_target_cursor(target: f64) -> f64 {
    if !target.is_finite() {
        return NEUTRAL_CURSOR;
    }
    target.clamp(MIN_TARGET_CURSOR, MAX_TARGET_CURSOR)
}

/// Convert a nanosecond instant to fractional seconds.
pub fn nanos_to_secs(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_SECOND as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_bounds_are_inside_unit_interval() {
        assert!(MIN_TARGET_CURSOR > 0.0);
        assert!(MAX_TARGET_CURSOR < 1.0);
        assert!(MIN_TARGET_CURSOR < NEUTRAL_CURSOR && NEUTRAL_CURSOR < MAX_TARGET_CURSOR);
    }

    #[test]
    fn clamp_handles_non_finite() {
        assert_eq!(clamp_target_cursor(f64::NAN), NEUTRAL_CURSOR);
        assert_eq!(clamp_target_cursor(f64::INFINITY), NEUTRAL_CURSOR);
        assert_eq!(clamp_target_cursor(-3.0), MIN_TARGET_CURSOR);
    }

    #[test]
    fn nanos_conversion() {
        assert_eq!(nanos_to_secs(0), 0.0);
        assert_eq!(nanos_to_secs(NANOS_PER_SECOND), 1.0);
        assert_eq!(nanos_to_secs(1_500_000_000), 1.5);
    }

    #[test]
    fn default_emission_total_is_one_million_tokens() {
        assert_eq!(DEFAULT_EMISSION_TOTAL, 100_000_000_000_000);
    }

    #[test]
    fn consensus_half_life_is_one_week() {
        assert_eq!(DEFAULT_CONSENSUS_HALF_LIFE_SECS, 604_800.0);
    }
}
