//! # Carbon Credit Exchange
//!
//! Converts a quantity of carbon-credit tokens into a stablecoin payout at a
//! protocol rate, then splits the payout between protocol fee, reward pool
//! and the seller.
//!
//! ```text
//! credits (3dp) ──× rate──► gross payout (6dp, floored) ──split──► fee / reward / net
//! ```
//!
//! Quoting is pure: a preview and the final conversion produce the same
//! quote for the same inputs.

use crate::amount::FixedPointAmount;
use crate::constants::STABLECOIN_DECIMALS;
use crate::error::{Result, VerdantError};
use crate::split::{compute_split, SplitPolicy, SplitResult};
use serde::{Deserialize, Serialize};

/// Priced conversion of credits into payout currency
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    /// Credits being exchanged
    pub credit_amount: FixedPointAmount,

    /// Payout currency per credit
    pub rate: FixedPointAmount,

    /// `credit_amount * rate`, floored to the payout scale
    pub gross_payout: FixedPointAmount,

    /// Gross payout divided per the exchange policy
    pub split: SplitResult,
}

impl ExchangeQuote {
    /// Payout share for a policy label (e.g. "net")
    pub fn share(&self, label: &str) -> Option<FixedPointAmount> {
        self.split.get(label)
    }

    /// Whether the rate disabled the exchange
    pub fn is_disabled(&self) -> bool {
        self.rate.is_zero()
    }
}

/// Stateless credit-to-stablecoin converter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangeConverter {
    /// Scale of the payout token
    payout_decimals: u8,
}

impl Default for ExchangeConverter {
    fn default() -> Self {
        Self::new(STABLECOIN_DECIMALS)
    }
}

impl ExchangeConverter {
    pub fn new(payout_decimals: u8) -> Self {
        Self { payout_decimals }
    }

    pub fn payout_decimals(&self) -> u8 {
        self.payout_decimals
    }

    /// Quote an exchange of `credit_amount` at `rate`.
    ///
    /// A zero credit amount is rejected. A zero rate is a valid "exchange
    /// disabled" configuration and yields an all-zero quote.
    pub fn quote(
        &self,
        credit_amount: FixedPointAmount,
        rate: FixedPointAmount,
        policy: &SplitPolicy,
    ) -> Result<ExchangeQuote> {
        if credit_amount.is_zero() {
            return Err(VerdantError::InvalidAmount(
                "credit amount must be positive".to_string(),
            ));
        }

        let gross_payout = credit_amount.scale_by_rate_to(&rate, self.payout_decimals)?;
        let split = compute_split(&gross_payout, policy)?;

        tracing::trace!(
            credits = %credit_amount,
            rate = %rate,
            gross = %gross_payout,
            "quoted credit exchange"
        );

        Ok(ExchangeQuote {
            credit_amount,
            rate,
            gross_payout,
            split,
        })
    }
}
