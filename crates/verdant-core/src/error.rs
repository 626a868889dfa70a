//! Error types for Verdant financial arithmetic

use crate::amount::FixedPointAmount;
use thiserror::Error;

/// Result type alias for Verdant operations
pub type Result<T> = std::result::Result<T, VerdantError>;

/// Errors that can occur while parsing, converting or allocating amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerdantError {
    // === Amount Operations ===
    /// Malformed numeric input
    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    /// Arithmetic across different decimal scales
    #[error("Decimal mismatch: {left} vs {right} decimals")]
    DecimalMismatch { left: u8, right: u8 },

    /// Subtraction would go below zero
    #[error("Negative result: {minuend} - {subtrahend}")]
    NegativeResult {
        minuend: FixedPointAmount,
        subtrahend: FixedPointAmount,
    },

    /// Value does not fit the integer representation
    #[error("Arithmetic overflow")]
    Overflow,

    // === Policy / Input Validation ===
    /// Split policy is empty, malformed, or does not sum to 100%
    #[error("Invalid split policy: {0}")]
    InvalidPolicy(String),

    /// Zero amount where a positive one is required
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // === Repayment ===
    /// Repayment exceeds the outstanding obligation
    #[error("Overpayment of {excess}")]
    Overpayment { excess: FixedPointAmount },

    // === Credit Ledger ===
    /// Tokenization request exceeds untokenized credits
    #[error("Insufficient available credits: requested {requested}, available {available}")]
    InsufficientAvailableCredits {
        requested: FixedPointAmount,
        available: FixedPointAmount,
    },

    /// Backing store rejected a load or write
    #[error("Storage error: {0}")]
    Storage(String),
}

impl VerdantError {
    /// Stable numeric code for API responses
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidFormat(_) => 2001,
            Self::DecimalMismatch { .. } => 2002,
            Self::NegativeResult { .. } => 2003,
            Self::InvalidPolicy(_) => 2004,
            Self::InvalidAmount(_) => 2005,
            Self::Overpayment { .. } => 2006,
            Self::InsufficientAvailableCredits { .. } => 2007,
            Self::Storage(_) => 3001,
            Self::Overflow => 9999,
        }
    }

    /// Whether the caller can act on the condition rather than fix its input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Overpayment { .. }
                | Self::InsufficientAvailableCredits { .. }
                | Self::Storage(_)
        )
    }

    /// Excess carried by an overpayment, if this is one
    pub fn overpayment_excess(&self) -> Option<FixedPointAmount> {
        match self {
            Self::Overpayment { excess } => Some(*excess),
            _ => None,
        }
    }
}
