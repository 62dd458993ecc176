//! APR ↔ APY conversion under discrete compounding.
//!
//! `apy = (1 + apr/n)^n − 1`, evaluated as `expm1(n · ln1p(apr/n))` so that
//! per-second compounding (`n ≈ 3.15e7`) keeps its precision for small rates.

use ebb_core::error::YieldError;

fn check_periods(periods_per_year: f64) -> Result<(), YieldError> {
    if periods_per_year <= 0.0 || !periods_per_year.is_finite() {
        return Err(YieldError::NonPositiveCompoundingPeriods(periods_per_year));
    }
    Ok(())
}

// Below the floor a single period would drain more than the principal and
// the logarithm has no real value.
fn check_rate(rate: f64, floor: f64) -> Result<(), YieldError> {
    if rate.is_nan() || rate < floor {
        return Err(YieldError::RateBelowTotalLoss(rate));
    }
    Ok(())
}

/// Effective annual yield for `apr` compounded `periods_per_year` times.
///
/// `apr` must be at least `-periods_per_year`, where each period takes the
/// whole principal and the yield bottoms out at `-1`.
///
/// ```
/// use ebb_yield::compounding::apr_to_apy;
///
/// assert_eq!(apr_to_apy(0.0, 365.0).unwrap(), 0.0);
/// let apy = apr_to_apy(0.12, 12.0).unwrap();
/// assert!((apy - 0.126_825_030_131_969_7).abs() < 1e-12);
/// ```
pub fn apr_to_apy(apr: f64, periods_per_year: f64) -> Result<f64, YieldError> {
    check_periods(periods_per_year)?;
    check_rate(apr, -periods_per_year)?;
    Ok((periods_per_year * (apr / periods_per_year).ln_1p()).exp_m1())
}

/// Nominal annual rate that compounds to `apy` over `periods_per_year` periods.
///
/// `apy` must be at least `-1`.
pub fn apy_to_apr(apy: f64, periods_per_year: f64) -> Result<f64, YieldError> {
    check_periods(periods_per_year)?;
    check_rate(apy, -1.0)?;
    Ok(periods_per_year * (apy.ln_1p() / periods_per_year).exp_m1())
}
