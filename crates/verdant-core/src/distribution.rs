//! # Pro-Rata Reward Distribution
//!
//! Shares a reward pool between liquidity providers in proportion to their
//! weights (deposits, pool tokens, credits held). Each holder receives
//! `floor(pool * weight / total_weight)`; the rounding dust goes to the
//! largest holder, the first one listed on ties.

use crate::amount::{mul_div_floor, FixedPointAmount};
use crate::error::{Result, VerdantError};
use crate::split::SplitResult;
use std::collections::HashSet;

/// Distribute `pool` across `(label, weight)` holders
pub fn distribute_pro_rata<S: AsRef<str>>(
    pool: &FixedPointAmount,
    holders: &[(S, u128)],
) -> Result<SplitResult> {
    if holders.is_empty() {
        return Err(VerdantError::InvalidPolicy("no holders to distribute to".to_string()));
    }

    let mut seen = HashSet::new();
    for (label, _) in holders {
        if !seen.insert(label.as_ref()) {
            return Err(VerdantError::InvalidPolicy(format!(
                "duplicate holder {:?}",
                label.as_ref()
            )));
        }
    }

    let total_weight = holders
        .iter()
        .try_fold(0u128, |acc, (_, w)| acc.checked_add(*w))
        .ok_or(VerdantError::Overflow)?;
    if total_weight == 0 {
        return Err(VerdantError::InvalidPolicy("holder weights sum to zero".to_string()));
    }

    let decimals = pool.decimals();
    let mut largest = 0;
    let mut shares = Vec::with_capacity(holders.len());
    let mut allocated = FixedPointAmount::zero(decimals);

    for (index, (label, weight)) in holders.iter().enumerate() {
        if *weight > holders[largest].1 {
            largest = index;
        }
        let raw = mul_div_floor(pool.raw(), *weight, total_weight)?;
        let share = FixedPointAmount::from_raw(raw, decimals);
        allocated = allocated.add(&share)?;
        shares.push((label.as_ref().to_string(), share));
    }

    let dust = pool.subtract(&allocated)?;
    shares[largest].1 = shares[largest].1.add(&dust)?;

    Ok(SplitResult::from_shares(shares))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_proportional_shares() {
        let pool = FixedPointAmount::parse("1000.000000", 6).unwrap();
        let result = distribute_pro_rata(&pool, &[("alice", 3u128), ("bob", 1)]).unwrap();

        assert_eq!(result.get("alice").unwrap().to_display_string(), "750.000000");
        assert_eq!(result.get("bob").unwrap().to_display_string(), "250.000000");
    }

    #[test]
    fn test_dust_goes_to_largest_holder() {
        let pool = FixedPointAmount::from_raw(10, 0);
        let result = distribute_pro_rata(&pool, &[("a", 1u128), ("b", 1), ("c", 2)]).unwrap();

        // 2 + 2 + 5 = 9, one unit of dust to "c"
        assert_eq!(result.get("a").unwrap().raw(), 2);
        assert_eq!(result.get("b").unwrap().raw(), 2);
        assert_eq!(result.get("c").unwrap().raw(), 6);
        assert_eq!(result.total().unwrap(), pool);
    }

    #[test]
    fn test_rejects_empty_or_weightless() {
        let pool = FixedPointAmount::from_raw(10, 0);
        let none: [(&str, u128); 0] = [];
        assert!(distribute_pro_rata(&pool, &none).is_err());
        assert!(distribute_pro_rata(&pool, &[("a", 0u128)]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_holders() {
        let pool = FixedPointAmount::from_raw(10, 0);
        let err = distribute_pro_rata(&pool, &[("a", 1u128), ("b", 1), ("a", 2)]).unwrap_err();
        assert!(matches!(err, VerdantError::InvalidPolicy(_)));
    }

    #[test]
    fn test_weights_above_u64() {
        let w = 1u128 << 100;
        let pool = FixedPointAmount::from_raw(w, 0);
        let result = distribute_pro_rata(&pool, &[("a", w), ("b", w + 1)]).unwrap();

        // floors are 2^99 - 1 and 2^99; one unit of dust to "b"
        assert_eq!(result.get("a").unwrap().raw(), (1u128 << 99) - 1);
        assert_eq!(result.get("b").unwrap().raw(), (1u128 << 99) + 1);
        assert_eq!(result.total().unwrap(), pool);
    }

    proptest! {
        #[test]
        fn prop_distribution_sums_exactly(
            raw in any::<u64>(),
            weights in prop::collection::vec(0u128..1_000_000, 1..10),
        ) {
            prop_assume!(weights.iter().any(|&w| w > 0));
            let pool = FixedPointAmount::from_raw(u128::from(raw), 6);
            let holders: Vec<(String, u128)> = weights
                .iter()
                .enumerate()
                .map(|(i, &w)| (format!("lp{}", i), w))
                .collect();
            let result = distribute_pro_rata(&pool, &holders).unwrap();
            prop_assert_eq!(result.total().unwrap(), pool);
        }

        #[test]
        fn prop_wide_weights_sum_exactly(
            raw in any::<u128>(),
            weights in prop::collection::vec(1u128..(u128::MAX >> 8), 1..8),
        ) {
            let pool = FixedPointAmount::from_raw(raw, 0);
            let holders: Vec<(String, u128)> = weights
                .iter()
                .enumerate()
                .map(|(i, &w)| (format!("lp{}", i), w))
                .collect();
            let result = distribute_pro_rata(&pool, &holders).unwrap();
            prop_assert_eq!(result.total().unwrap(), pool);
        }
    }
}
