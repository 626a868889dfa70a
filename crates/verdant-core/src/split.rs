//! # Basis-Point Splits
//!
//! Divides an amount between labelled parties (protocol fee, reward pool,
//! net payout, ...) so that the shares always add back to the input exactly.
//!
//! Every part except the remainder bearer receives
//! `floor(amount * basis_points / 10_000)`. The bearer receives whatever is
//! left, which absorbs all integer-division dust in one known place.
//!
//! ```text
//! 1000.00 split {fee: 250bp, reward: 0bp, net: 9750bp}
//!   fee    = floor(100000 * 250 / 10000)  =  25.00
//!   reward = floor(100000 *   0 / 10000)  =   0.00
//!   net    = 1000.00 - 25.00 - 0.00       = 975.00   (bearer)
//! ```

use crate::amount::{mul_div_floor, FixedPointAmount};
use crate::constants::BASIS_POINTS;
use crate::error::{Result, VerdantError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One labelled share of a split
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPart {
    /// Party name (e.g. "fee", "reward", "net")
    pub label: String,

    /// Share in basis points (1bp = 0.01%)
    pub basis_points: u32,
}

impl SplitPart {
    pub fn new(label: impl Into<String>, basis_points: u32) -> Self {
        Self {
            label: label.into(),
            basis_points,
        }
    }
}

/// Validated, ordered set of split parts summing to 10,000bp
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitPolicy {
    parts: Vec<SplitPart>,

    /// Index of the part that absorbs rounding dust
    remainder_bearer: usize,
}

impl SplitPolicy {
    /// Build a policy whose last part bears the remainder
    pub fn new(parts: Vec<SplitPart>) -> Result<Self> {
        if parts.is_empty() {
            return Err(VerdantError::InvalidPolicy("policy has no parts".to_string()));
        }

        let mut seen = HashSet::new();
        for part in &parts {
            if !seen.insert(part.label.as_str()) {
                return Err(VerdantError::InvalidPolicy(format!(
                    "duplicate label {:?}",
                    part.label
                )));
            }
        }

        let total: u64 = parts.iter().map(|p| u64::from(p.basis_points)).sum();
        if total != BASIS_POINTS as u64 {
            return Err(VerdantError::InvalidPolicy(format!(
                "basis points sum to {}, expected {}",
                total, BASIS_POINTS
            )));
        }

        let remainder_bearer = parts.len() - 1;
        Ok(Self {
            parts,
            remainder_bearer,
        })
    }

    /// Build from `(label, basis_points)` pairs
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u32)>) -> Result<Self> {
        Self::new(
            pairs
                .into_iter()
                .map(|(label, bp)| SplitPart::new(label, bp))
                .collect(),
        )
    }

    /// Build from signed input (form fields, config), rejecting negatives
    pub fn from_signed<S: Into<String>>(pairs: impl IntoIterator<Item = (S, i64)>) -> Result<Self> {
        let mut parts = Vec::new();
        for (label, bp) in pairs {
            let label = label.into();
            let bp = u32::try_from(bp).map_err(|_| {
                VerdantError::InvalidPolicy(format!("part {:?} has invalid basis points {}", label, bp))
            })?;
            parts.push(SplitPart::new(label, bp));
        }
        Self::new(parts)
    }

    /// Flag a different part as the remainder bearer
    pub fn with_remainder_bearer(mut self, label: &str) -> Result<Self> {
        self.remainder_bearer = self
            .index_of(label)
            .ok_or_else(|| VerdantError::InvalidPolicy(format!("no part labelled {:?}", label)))?;
        Ok(self)
    }

    pub fn parts(&self) -> &[SplitPart] {
        &self.parts
    }

    /// Label of the part absorbing rounding dust
    pub fn remainder_bearer(&self) -> &str {
        &self.parts[self.remainder_bearer].label
    }

    pub fn basis_points_of(&self, label: &str) -> Option<u32> {
        self.index_of(label).map(|i| self.parts[i].basis_points)
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.parts.iter().position(|p| p.label == label)
    }
}

/// Split outcome, in policy order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    shares: Vec<(String, FixedPointAmount)>,
}

impl SplitResult {
    pub(crate) fn from_shares(shares: Vec<(String, FixedPointAmount)>) -> Self {
        Self { shares }
    }

    /// Share for a label
    pub fn get(&self, label: &str) -> Option<FixedPointAmount> {
        self.shares
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FixedPointAmount)> {
        self.shares.iter().map(|(l, a)| (l.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all shares; equals the split input
    pub fn total(&self) -> Result<FixedPointAmount> {
        let decimals = self.shares.first().map(|(_, a)| a.decimals()).unwrap_or(0);
        FixedPointAmount::sum(self.shares.iter().map(|(_, a)| a), decimals)
    }
}

/// Split `amount` according to `policy`.
pub fn compute_split(amount: &FixedPointAmount, policy: &SplitPolicy) -> Result<SplitResult> {
    let decimals = amount.decimals();
    let mut shares: Vec<(String, FixedPointAmount)> = Vec::with_capacity(policy.parts.len());
    let mut allocated = FixedPointAmount::zero(decimals);

    for (index, part) in policy.parts.iter().enumerate() {
        if index == policy.remainder_bearer {
            // filled in below
            shares.push((part.label.clone(), FixedPointAmount::zero(decimals)));
            continue;
        }
        let raw = mul_div_floor(amount.raw(), u128::from(part.basis_points), BASIS_POINTS)?;
        let share = FixedPointAmount::from_raw(raw, decimals);
        allocated = allocated.add(&share)?;
        shares.push((part.label.clone(), share));
    }

    shares[policy.remainder_bearer].1 = amount.subtract(&allocated)?;

    tracing::trace!(
        amount = %amount,
        bearer = policy.remainder_bearer(),
        "computed split"
    );

    Ok(SplitResult::from_shares(shares))
}
