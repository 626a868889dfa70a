//! # Verdant Credits
//!
//! Per-project carbon credit accounting:
//!
//! - [`TokenizationLedger`] - generated vs. tokenized credits, append-only
//! - [`CreditStore`] - injectable backing storage, in-memory by default
//! - [`CreditIssuer`] - metered energy output → credits on the ledger
//!
//! ```text
//!  meter reading ──► CreditIssuer ──record_generation──► TokenizationLedger ◄──record_tokenization── mint request
//!                                                              │
//!                                                              └──► LedgerEvent journal
//! ```
//!
//! Mutators on the same project are serialised by that project's lock, so
//! the ledger can be shared across threads behind an `Arc`.

pub mod issuance;
pub mod ledger;
pub mod store;
pub mod types;

pub use issuance::{credits_for_output, CreditIssuer, EnergySource, IssuanceReceipt, DEFAULT_GRID_INTENSITY};
pub use ledger::TokenizationLedger;
pub use store::{CreditStore, MemoryCreditStore, ProjectRecord, ProjectSlot};
pub use types::{LedgerEvent, LedgerEventKind, LedgerState, ProjectCreditLedgerEntry, ProjectId};
