//! # Verdant Benchmarks
//!
//! Shared fixtures for the criterion benchmarks.
//!
//! ## Usage
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench --package verdant-benchmarks
//!
//! # Run one group
//! cargo bench --package verdant-benchmarks -- split
//! ```

use verdant_core::constants::{CREDIT_DECIMALS, STABLECOIN_DECIMALS};
use verdant_core::{FixedPointAmount, SplitPolicy};

/// Three-way exchange policy: fee / reward pool / seller
pub fn exchange_policy() -> SplitPolicy {
    SplitPolicy::from_pairs([("fee", 250), ("reward", 500), ("net", 9_250)])
        .expect("static policy sums to 10,000bp")
}

/// Two-way repayment fee policy
pub fn fee_policy() -> SplitPolicy {
    SplitPolicy::from_pairs([("fee", 250), ("rest", 9_750)]).expect("static policy sums to 10,000bp")
}

/// Policy with `parts` near-equal shares
pub fn wide_policy(parts: u32) -> SplitPolicy {
    let share = 10_000 / parts;
    let mut pairs: Vec<(String, u32)> = (0..parts).map(|i| (format!("p{}", i), share)).collect();
    if let Some(last) = pairs.last_mut() {
        last.1 += 10_000 - share * parts;
    }
    SplitPolicy::from_pairs(pairs).expect("shares padded to 10,000bp")
}

/// Stablecoin amount from raw units
pub fn usdc(raw: u128) -> FixedPointAmount {
    FixedPointAmount::from_raw(raw, STABLECOIN_DECIMALS)
}

/// Credit amount from raw units
pub fn credits(raw: u128) -> FixedPointAmount {
    FixedPointAmount::from_raw(raw, CREDIT_DECIMALS)
}
