//! Simple-interest accrual on outstanding principal.
//!
//! `interest = floor(principal * apr_bps * days / (10_000 * 365))`

use crate::amount::FixedPointAmount;
use crate::constants::{BASIS_POINTS, DAYS_PER_YEAR, MAX_APR_BPS};
use crate::error::{Result, VerdantError};

/// Interest accrued on `principal` over `elapsed_days` at `apr_bps`
pub fn accrue_simple_interest(
    principal: &FixedPointAmount,
    apr_bps: u32,
    elapsed_days: u32,
) -> Result<FixedPointAmount> {
    if apr_bps > MAX_APR_BPS {
        return Err(VerdantError::InvalidPolicy(format!(
            "APR of {}bp exceeds the {}bp cap",
            apr_bps, MAX_APR_BPS
        )));
    }

    let numerator = u128::from(apr_bps) * u128::from(elapsed_days);
    principal.checked_mul_ratio(numerator, BASIS_POINTS * DAYS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_year_accrual() {
        let principal = FixedPointAmount::parse("5000.00", 2).unwrap();
        let interest = accrue_simple_interest(&principal, 1_200, 365).unwrap();
        assert_eq!(interest.to_display_string(), "600.00");
    }

    #[test]
    fn test_partial_period_floors() {
        // 5000 * 12% * 30/365 = 49.315...
        let principal = FixedPointAmount::parse("5000.00", 2).unwrap();
        let interest = accrue_simple_interest(&principal, 1_200, 30).unwrap();
        assert_eq!(interest.to_display_string(), "49.31");
    }

    #[test]
    fn test_zero_days_or_rate() {
        let principal = FixedPointAmount::parse("5000.000000", 6).unwrap();
        assert!(accrue_simple_interest(&principal, 1_200, 0).unwrap().is_zero());
        assert!(accrue_simple_interest(&principal, 0, 90).unwrap().is_zero());
    }

    #[test]
    fn test_apr_cap() {
        let principal = FixedPointAmount::parse("1", 2).unwrap();
        assert!(matches!(
            accrue_simple_interest(&principal, MAX_APR_BPS + 1, 1),
            Err(VerdantError::InvalidPolicy(_))
        ));
    }
}
