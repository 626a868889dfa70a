//! # Loan Repayment Allocation
//!
//! Decomposes a developer's repayment into protocol fee, interest and
//! principal using interest-first amortization:
//!
//! 1. `fee` is the fee part of `compute_split(total_paid, fee_policy)`
//! 2. the rest is applied to the loan, interest first
//! 3. then principal, up to what is outstanding
//!
//! Anything left after that is an overpayment. It is reported with the exact
//! excess so the caller can refund it or credit it forward.

use crate::amount::FixedPointAmount;
use crate::constants::FEE_LABEL;
use crate::error::{Result, VerdantError};
use crate::split::{compute_split, SplitPolicy};
use serde::{Deserialize, Serialize};

/// Where a repayment went
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentBreakdown {
    /// Amount absorbed by this repayment
    pub total_paid: FixedPointAmount,

    /// Applied to outstanding principal
    pub principal: FixedPointAmount,

    /// Applied to accrued interest
    pub interest: FixedPointAmount,

    /// Protocol fee
    pub fee: FixedPointAmount,
}

impl RepaymentBreakdown {
    /// Portion that reduced the loan (`principal + interest`)
    pub fn loan_applied(&self) -> Result<FixedPointAmount> {
        self.principal.add(&self.interest)
    }
}

/// Breakdown plus any excess beyond the obligation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// Breakdown of the absorbed amount
    pub breakdown: RepaymentBreakdown,

    /// Tendered amount not absorbed; zero when fully applied
    pub excess: FixedPointAmount,
}

/// Interest-first repayment allocator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepaymentAllocator {
    /// Label of the fee part in fee policies
    fee_label: String,
}

impl Default for RepaymentAllocator {
    fn default() -> Self {
        Self {
            fee_label: FEE_LABEL.to_string(),
        }
    }
}

impl RepaymentAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different label for the fee part
    pub fn with_fee_label(fee_label: impl Into<String>) -> Self {
        Self {
            fee_label: fee_label.into(),
        }
    }

    /// Allocate a repayment, failing with `Overpayment` when it exceeds
    /// `outstanding_principal + accrued_interest + fee`.
    pub fn allocate(
        &self,
        total_paid: FixedPointAmount,
        outstanding_principal: FixedPointAmount,
        accrued_interest: FixedPointAmount,
        fee_policy: &SplitPolicy,
    ) -> Result<RepaymentBreakdown> {
        let outcome =
            self.allocate_partial(total_paid, outstanding_principal, accrued_interest, fee_policy)?;

        if !outcome.excess.is_zero() {
            return Err(VerdantError::Overpayment {
                excess: outcome.excess,
            });
        }
        Ok(outcome.breakdown)
    }

    /// Allocate a repayment and hand back any excess alongside the breakdown.
    ///
    /// `breakdown.total_paid + excess` equals the tendered `total_paid`.
    pub fn allocate_partial(
        &self,
        total_paid: FixedPointAmount,
        outstanding_principal: FixedPointAmount,
        accrued_interest: FixedPointAmount,
        fee_policy: &SplitPolicy,
    ) -> Result<AllocationOutcome> {
        if total_paid.is_zero() {
            return Err(VerdantError::InvalidAmount(
                "repayment must be positive".to_string(),
            ));
        }
        // surface scale errors before any arithmetic
        total_paid.checked_cmp(&outstanding_principal)?;
        total_paid.checked_cmp(&accrued_interest)?;

        let split = compute_split(&total_paid, fee_policy)?;
        let fee = split.get(&self.fee_label).ok_or_else(|| {
            VerdantError::InvalidPolicy(format!("fee policy has no {:?} part", self.fee_label))
        })?;

        let remainder = total_paid.subtract(&fee)?;
        let interest = accrued_interest.checked_min(&remainder)?;
        let principal = outstanding_principal.checked_min(&remainder.subtract(&interest)?)?;

        let applied = fee.add(&interest)?.add(&principal)?;
        let excess = total_paid.subtract(&applied)?;

        tracing::trace!(
            paid = %total_paid,
            fee = %fee,
            interest = %interest,
            principal = %principal,
            excess = %excess,
            "allocated repayment"
        );

        Ok(AllocationOutcome {
            breakdown: RepaymentBreakdown {
                total_paid: applied,
                principal,
                interest,
                fee,
            },
            excess,
        })
    }
}
