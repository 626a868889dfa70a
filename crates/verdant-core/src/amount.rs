//! # Fixed-Point Amounts
//!
//! Integer-scaled decimal values. An amount is `raw / 10^decimals`, where
//! `raw` is an unsigned integer, so amounts are never negative and never
//! touch floating point.
//!
//! | Token | Decimals | `1.0` as raw |
//! |-------|----------|--------------|
//! | Stablecoin | 6 | 1_000_000 |
//! | Carbon credit | 3 | 1_000 |
//! | Display cents | 2 | 100 |
//!
//! Amounts only combine when their `decimals` match. Multiplication by a
//! rate always floors toward zero so a payout never exceeds what is owed.

use crate::error::{Result, VerdantError};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A non-negative decimal value stored as `raw / 10^decimals`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPointAmount {
    /// Scaled integer value
    raw: u128,

    /// Number of fractional digits
    decimals: u8,
}

/// `10^exp`, or `Overflow` once it leaves `u128`
pub(crate) fn pow10(exp: u32) -> Result<u128> {
    10u128.checked_pow(exp).ok_or(VerdantError::Overflow)
}

/// Back to `u128`, or `Overflow` when the value does not fit
fn narrow(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(VerdantError::Overflow);
    }
    Ok(value.as_u128())
}

/// `floor(value * numerator / denominator)`.
///
/// The product is formed in 256 bits, so only a quotient that does not fit
/// `u128` overflows.
pub(crate) fn mul_div_floor(value: u128, numerator: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(VerdantError::InvalidAmount("zero denominator".to_string()));
    }
    let product = U256::from(value) * U256::from(numerator);
    narrow(product / U256::from(denominator))
}

impl FixedPointAmount {
    /// Create from an already-scaled integer (e.g. an on-chain balance)
    pub const fn from_raw(raw: u128, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Zero at the given scale
    pub const fn zero(decimals: u8) -> Self {
        Self { raw: 0, decimals }
    }

    /// Scaled integer value
    pub const fn raw(&self) -> u128 {
        self.raw
    }

    /// Number of fractional digits
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    pub const fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Parse a user-entered decimal numeral.
    ///
    /// Accepts `"12"`, `"12.5"`, `"12."` and `".5"`. Signs, whitespace,
    /// exponents and grouping separators are rejected. A fraction longer
    /// than `decimals` is rejected instead of rounded. Any `u8` scale is
    /// accepted; a value that does not fit at that scale is `Overflow`.
    pub fn parse(text: &str, decimals: u8) -> Result<Self> {
        let invalid = |reason: &str| VerdantError::InvalidFormat(format!("{:?}: {}", text, reason));

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("not a non-negative decimal numeral"));
        }
        if fraction.len() > decimals as usize {
            return Err(invalid(&format!("more than {} fractional digits", decimals)));
        }

        let padding = decimals as usize - fraction.len();
        let digits = whole
            .bytes()
            .chain(fraction.bytes())
            .chain(std::iter::repeat(b'0').take(padding));

        let mut raw: u128 = 0;
        for digit in digits {
            raw = raw
                .checked_mul(10)
                .and_then(|r| r.checked_add(u128::from(digit - b'0')))
                .ok_or(VerdantError::Overflow)?;
        }

        Ok(Self { raw, decimals })
    }

    /// Render with the fraction zero-padded to `decimals` digits
    pub fn to_display_string(&self) -> String {
        let digits = self.raw.to_string();
        if self.decimals == 0 {
            return digits;
        }

        let width = self.decimals as usize;
        let padded = if digits.len() <= width {
            format!("{:0>width$}", digits, width = width + 1)
        } else {
            digits
        };
        let (whole, fraction) = padded.split_at(padded.len() - width);
        format!("{}.{}", whole, fraction)
    }

    fn ensure_same_scale(&self, other: &Self) -> Result<()> {
        if self.decimals != other.decimals {
            return Err(VerdantError::DecimalMismatch {
                left: self.decimals,
                right: other.decimals,
            });
        }
        Ok(())
    }

    /// `self + other`
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.ensure_same_scale(other)?;
        let raw = self.raw.checked_add(other.raw).ok_or(VerdantError::Overflow)?;
        Ok(Self { raw, decimals: self.decimals })
    }

    /// `self - other`; money never goes negative
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.ensure_same_scale(other)?;
        match self.raw.checked_sub(other.raw) {
            Some(raw) => Ok(Self { raw, decimals: self.decimals }),
            None => Err(VerdantError::NegativeResult {
                minuend: *self,
                subtrahend: *other,
            }),
        }
    }

    /// Compare two amounts at the same scale
    pub fn checked_cmp(&self, other: &Self) -> Result<Ordering> {
        self.ensure_same_scale(other)?;
        Ok(self.raw.cmp(&other.raw))
    }

    /// The smaller of two amounts at the same scale
    pub fn checked_min(&self, other: &Self) -> Result<Self> {
        Ok(match self.checked_cmp(other)? {
            Ordering::Greater => *other,
            _ => *self,
        })
    }

    /// Sum a sequence of amounts that all share `decimals`
    pub fn sum<'a, I>(amounts: I, decimals: u8) -> Result<Self>
    where
        I: IntoIterator<Item = &'a FixedPointAmount>,
    {
        amounts
            .into_iter()
            .try_fold(Self::zero(decimals), |acc, amount| acc.add(amount))
    }

    /// Move to a finer scale. Lossless; coarsening is not offered.
    pub fn rescale_up(&self, decimals: u8) -> Result<Self> {
        if decimals < self.decimals {
            return Err(VerdantError::DecimalMismatch {
                left: self.decimals,
                right: decimals,
            });
        }
        let factor = pow10(u32::from(decimals - self.decimals))?;
        let raw = self.raw.checked_mul(factor).ok_or(VerdantError::Overflow)?;
        Ok(Self { raw, decimals })
    }

    /// `floor(self * numerator / denominator)` at the same scale
    pub fn checked_mul_ratio(&self, numerator: u128, denominator: u128) -> Result<Self> {
        let raw = mul_div_floor(self.raw, numerator, denominator)?;
        Ok(Self { raw, decimals: self.decimals })
    }

    /// Multiply by `rate`, keeping this amount's scale. Floors.
    pub fn scale_by_rate(&self, rate: &Self) -> Result<Self> {
        self.scale_by_rate_to(rate, self.decimals)
    }

    /// Multiply by `rate` and express the product at `target_decimals`.
    ///
    /// The exact product lives at `self.decimals + rate.decimals`; moving it
    /// to a coarser target floors, moving it to a finer one is exact.
    pub fn scale_by_rate_to(&self, rate: &Self, target_decimals: u8) -> Result<Self> {
        let product = U256::from(self.raw) * U256::from(rate.raw);
        let product_decimals = u32::from(self.decimals) + u32::from(rate.decimals);
        let target = u32::from(target_decimals);

        let raw = match product_decimals.cmp(&target) {
            Ordering::Equal => narrow(product)?,
            Ordering::Greater => {
                let shift = product_decimals - target;
                match U256::from(10u8).checked_pow(U256::from(shift)) {
                    Some(divisor) => narrow(product / divisor)?,
                    // divisor exceeds any 256-bit product
                    None => 0,
                }
            }
            Ordering::Less => narrow(product)?
                .checked_mul(pow10(target - product_decimals)?)
                .ok_or(VerdantError::Overflow)?,
        };

        Ok(Self { raw, decimals: target_decimals })
    }
}

impl fmt::Display for FixedPointAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl fmt::Debug for FixedPointAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedPointAmount({} @{})", self.to_display_string(), self.decimals)
    }
}
