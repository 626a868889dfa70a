//! # Verdant Core
//!
//! Fixed-point financial arithmetic for the Verdant renewable-energy
//! investment platform: carbon-credit exchange, reward distribution and
//! developer loan repayment.
//!
//! All values are integer-scaled [`FixedPointAmount`]s. Nothing here uses
//! floating point, performs I/O, or holds state.
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`amount`] | Parse, add, subtract, rate-scale and display amounts |
//! | [`split`] | Basis-point splits that sum exactly to the input |
//! | [`exchange`] | Credit → stablecoin quotes with fee / reward / net split |
//! | [`repayment`] | Interest-first fee / interest / principal breakdown |
//! | [`interest`] | Simple APR accrual |
//! | [`distribution`] | Pro-rata reward pool payouts |
//!
//! ## Flow
//!
//! ```text
//!  user input ──parse──► FixedPointAmount ──┬──► compute_split ──► SplitResult
//!                                           ├──► ExchangeConverter::quote ──► ExchangeQuote
//!                                           └──► RepaymentAllocator::allocate ──► RepaymentBreakdown
//! ```

pub mod amount;
pub mod distribution;
pub mod error;
pub mod exchange;
pub mod interest;
pub mod repayment;
pub mod split;

pub use amount::FixedPointAmount;
pub use distribution::distribute_pro_rata;
pub use error::{Result, VerdantError};
pub use exchange::{ExchangeConverter, ExchangeQuote};
pub use interest::accrue_simple_interest;
pub use repayment::{AllocationOutcome, RepaymentAllocator, RepaymentBreakdown};
pub use split::{compute_split, SplitPart, SplitPolicy, SplitResult};

/// Token and protocol constants
pub mod constants {
    /// Basis-point denominator (10,000bp = 100%)
    pub const BASIS_POINTS: u128 = 10_000;

    /// Stablecoin decimals, matching the on-chain token
    pub const STABLECOIN_DECIMALS: u8 = 6;

    /// Carbon-credit token decimals (1 credit = 1 tCO2e)
    pub const CREDIT_DECIMALS: u8 = 3;

    /// Largest scale whose unit still fits in `u128`
    pub const MAX_DECIMALS: u8 = 38;

    /// Day count for APR accrual
    pub const DAYS_PER_YEAR: u128 = 365;

    /// APR ceiling: 1000%
    pub const MAX_APR_BPS: u32 = 100_000;

    /// Conventional label of the protocol fee part
    pub const FEE_LABEL: &str = "fee";
}

pub use constants::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::amount::FixedPointAmount;
    pub use crate::constants::*;
    pub use crate::distribution::distribute_pro_rata;
    pub use crate::error::{Result, VerdantError};
    pub use crate::exchange::{ExchangeConverter, ExchangeQuote};
    pub use crate::interest::accrue_simple_interest;
    pub use crate::repayment::{RepaymentAllocator, RepaymentBreakdown};
    pub use crate::split::{compute_split, SplitPolicy, SplitResult};
}
