//! Ledger data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use verdant_core::error::Result;
use verdant_core::FixedPointAmount;

/// Identifier of a renewable-energy project
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectId({})", self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tokenization lifecycle of a project
///
/// ```text
/// NoCreditsYet ──generate──► HasAvailableCredits ◄──generate── FullyTokenized
///                                   │                               ▲
///                                   └──────tokenize remaining───────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerState {
    /// Nothing generated yet
    NoCreditsYet,
    /// Some generated credits are not tokenized
    HasAvailableCredits,
    /// Every generated credit is tokenized
    FullyTokenized,
}

/// Generated and tokenized credit totals for one project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCreditLedgerEntry {
    project_id: ProjectId,
    total_generated: FixedPointAmount,
    total_tokenized: FixedPointAmount,
}

impl ProjectCreditLedgerEntry {
    /// Entry with nothing generated yet
    pub fn new(project_id: ProjectId, decimals: u8) -> Self {
        Self {
            project_id,
            total_generated: FixedPointAmount::zero(decimals),
            total_tokenized: FixedPointAmount::zero(decimals),
        }
    }

    /// Rebuild an entry from persisted totals.
    ///
    /// Fails with `DecimalMismatch` when the scales differ and with
    /// `NegativeResult` when more was tokenized than generated.
    pub fn restore(
        project_id: ProjectId,
        total_generated: FixedPointAmount,
        total_tokenized: FixedPointAmount,
    ) -> Result<Self> {
        let entry = Self {
            project_id,
            total_generated,
            total_tokenized,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Check the totals share a scale and tokenized never exceeds generated
    pub fn validate(&self) -> Result<()> {
        self.available_to_tokenize().map(|_| ())
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn total_generated(&self) -> FixedPointAmount {
        self.total_generated
    }

    pub fn total_tokenized(&self) -> FixedPointAmount {
        self.total_tokenized
    }

    /// `total_generated - total_tokenized`; never negative
    pub fn available_to_tokenize(&self) -> Result<FixedPointAmount> {
        self.total_generated.subtract(&self.total_tokenized)
    }

    pub fn state(&self) -> LedgerState {
        if self.total_generated.is_zero() {
            LedgerState::NoCreditsYet
        } else if self.total_generated == self.total_tokenized {
            LedgerState::FullyTokenized
        } else {
            LedgerState::HasAvailableCredits
        }
    }

    pub(crate) fn set_totals(&mut self, generated: FixedPointAmount, tokenized: FixedPointAmount) {
        self.total_generated = generated;
        self.total_tokenized = tokenized;
    }
}

/// Kind of journaled ledger mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEventKind {
    Generation,
    Tokenization,
}

/// Append-only journal record of a committed mutation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Event ID
    pub id: Uuid,

    /// Project mutated
    pub project_id: ProjectId,

    /// Mutation kind
    pub kind: LedgerEventKind,

    /// Delta applied
    pub amount: FixedPointAmount,

    /// Totals after the mutation
    pub total_generated: FixedPointAmount,
    pub total_tokenized: FixedPointAmount,

    /// Commit time
    pub recorded_at: DateTime<Utc>,
}
