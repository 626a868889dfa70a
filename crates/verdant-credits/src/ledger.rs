//! # Tokenization Ledger
//!
//! Tracks, per project, how many carbon credits were generated and how many
//! of those have been tokenized. Both totals only ever grow:
//!
//! - `record_generation` adds newly verified credits
//! - `record_tokenization` claims credits from the untokenized balance
//!
//! A rejected call leaves the project untouched. Each committed call is
//! journaled as a [`LedgerEvent`].

use crate::store::{CreditStore, MemoryCreditStore, ProjectRecord};
use crate::types::{LedgerEvent, LedgerEventKind, LedgerState, ProjectCreditLedgerEntry, ProjectId};
use chrono::Utc;
use uuid::Uuid;
use verdant_core::constants::CREDIT_DECIMALS;
use verdant_core::error::{Result, VerdantError};
use verdant_core::FixedPointAmount;

/// Append-only per-project credit ledger
pub struct TokenizationLedger<S: CreditStore = MemoryCreditStore> {
    /// Backing store
    store: S,

    /// Scale of every credit amount in this ledger
    credit_decimals: u8,
}

impl Default for TokenizationLedger<MemoryCreditStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizationLedger<MemoryCreditStore> {
    /// In-memory ledger at the credit token's scale
    pub fn new() -> Self {
        Self::with_store(MemoryCreditStore::new(), CREDIT_DECIMALS)
    }
}

impl<S: CreditStore> TokenizationLedger<S> {
    /// Ledger over an injected store
    pub fn with_store(store: S, credit_decimals: u8) -> Self {
        Self {
            store,
            credit_decimals,
        }
    }

    pub fn credit_decimals(&self) -> u8 {
        self.credit_decimals
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn validate_delta(&self, delta: &FixedPointAmount) -> Result<()> {
        if delta.decimals() != self.credit_decimals {
            return Err(VerdantError::DecimalMismatch {
                left: self.credit_decimals,
                right: delta.decimals(),
            });
        }
        if delta.is_zero() {
            return Err(VerdantError::InvalidAmount(
                "credit delta must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Add newly generated credits to a project, creating its entry on
    /// first report.
    pub fn record_generation(
        &self,
        project_id: &ProjectId,
        delta: FixedPointAmount,
    ) -> Result<ProjectCreditLedgerEntry> {
        self.validate_delta(&delta)?;

        let slot = self.store.slot_or_insert(project_id, self.credit_decimals);
        let mut record = slot.lock();

        let mut entry = record.entry().clone();
        let generated = entry.total_generated().add(&delta)?;
        entry.set_totals(generated, entry.total_tokenized());

        let event = journal_event(&entry, LedgerEventKind::Generation, delta);
        self.commit(&mut record, entry.clone(), event)?;

        tracing::debug!(
            project = %project_id,
            delta = %delta,
            total_generated = %entry.total_generated(),
            "recorded credit generation"
        );

        Ok(entry)
    }

    /// Tokenize credits from a project's untokenized balance.
    ///
    /// Fails with `InsufficientAvailableCredits` when `delta` exceeds the
    /// available balance, including for projects with no generation yet.
    pub fn record_tokenization(
        &self,
        project_id: &ProjectId,
        delta: FixedPointAmount,
    ) -> Result<ProjectCreditLedgerEntry> {
        self.validate_delta(&delta)?;

        let Some(slot) = self.store.slot(project_id) else {
            return Err(VerdantError::InsufficientAvailableCredits {
                requested: delta,
                available: FixedPointAmount::zero(self.credit_decimals),
            });
        };
        let mut record = slot.lock();

        let mut entry = record.entry().clone();
        let available = entry.available_to_tokenize()?;
        if delta.raw() > available.raw() {
            return Err(VerdantError::InsufficientAvailableCredits {
                requested: delta,
                available,
            });
        }

        let tokenized = entry.total_tokenized().add(&delta)?;
        entry.set_totals(entry.total_generated(), tokenized);

        let event = journal_event(&entry, LedgerEventKind::Tokenization, delta);
        self.commit(&mut record, entry.clone(), event)?;

        tracing::debug!(
            project = %project_id,
            delta = %delta,
            total_tokenized = %entry.total_tokenized(),
            "recorded credit tokenization"
        );

        Ok(entry)
    }

    /// Apply a commit and hand it to the store; all-or-nothing
    fn commit(
        &self,
        record: &mut ProjectRecord,
        entry: ProjectCreditLedgerEntry,
        event: LedgerEvent,
    ) -> Result<()> {
        let previous = record.entry().clone();
        record.commit(entry, event);
        if let Err(err) = self.store.persist(record) {
            record.rollback(previous);
            return Err(err);
        }
        Ok(())
    }

    /// Untokenized credits for a project; zero when unknown.
    ///
    /// Advisory under concurrent writers: a mutator call is what confirms.
    pub fn available_to_tokenize(&self, project_id: &ProjectId) -> Result<FixedPointAmount> {
        match self.entry(project_id) {
            Some(entry) => entry.available_to_tokenize(),
            None => Ok(FixedPointAmount::zero(self.credit_decimals)),
        }
    }

    /// Current entry for a project
    pub fn entry(&self, project_id: &ProjectId) -> Option<ProjectCreditLedgerEntry> {
        self.store
            .slot(project_id)
            .map(|slot| slot.lock().entry().clone())
    }

    /// Lifecycle state; `NoCreditsYet` for unknown projects
    pub fn state(&self, project_id: &ProjectId) -> LedgerState {
        self.entry(project_id)
            .map(|entry| entry.state())
            .unwrap_or(LedgerState::NoCreditsYet)
    }

    /// Journal of committed mutations, oldest first
    pub fn events(&self, project_id: &ProjectId) -> Vec<LedgerEvent> {
        self.store
            .slot(project_id)
            .map(|slot| slot.lock().events().to_vec())
            .unwrap_or_default()
    }

    /// All entries, ordered by project ID, for external persistence
    pub fn snapshot(&self) -> Vec<ProjectCreditLedgerEntry> {
        self.store
            .project_ids()
            .iter()
            .filter_map(|id| self.entry(id))
            .collect()
    }
}

fn journal_event(
    entry: &ProjectCreditLedgerEntry,
    kind: LedgerEventKind,
    amount: FixedPointAmount,
) -> LedgerEvent {
    LedgerEvent {
        id: Uuid::new_v4(),
        project_id: entry.project_id().clone(),
        kind,
        amount,
        total_generated: entry.total_generated(),
        total_tokenized: entry.total_tokenized(),
        recorded_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn credits(text: &str) -> FixedPointAmount {
        FixedPointAmount::parse(text, CREDIT_DECIMALS).unwrap()
    }

    #[test]
    fn test_generation_then_tokenization() {
        let ledger = TokenizationLedger::new();
        let project = ProjectId::from("solar-alpha");

        assert_eq!(ledger.state(&project), LedgerState::NoCreditsYet);

        ledger.record_generation(&project, credits("120.500")).unwrap();
        assert_eq!(ledger.state(&project), LedgerState::HasAvailableCredits);
        assert_eq!(ledger.available_to_tokenize(&project).unwrap(), credits("120.500"));

        let entry = ledger.record_tokenization(&project, credits("20.500")).unwrap();
        assert_eq!(entry.total_tokenized(), credits("20.500"));
        assert_eq!(ledger.available_to_tokenize(&project).unwrap(), credits("100"));
    }

    #[test]
    fn test_fully_tokenized_reopens_on_generation() {
        let ledger = TokenizationLedger::new();
        let project = ProjectId::from("wind-beta");

        ledger.record_generation(&project, credits("10")).unwrap();
        ledger.record_tokenization(&project, credits("10")).unwrap();
        assert_eq!(ledger.state(&project), LedgerState::FullyTokenized);
        assert!(ledger.available_to_tokenize(&project).unwrap().is_zero());

        ledger.record_generation(&project, credits("2.5")).unwrap();
        assert_eq!(ledger.state(&project), LedgerState::HasAvailableCredits);
        assert_eq!(ledger.available_to_tokenize(&project).unwrap(), credits("2.5"));
    }

    #[test]
    fn test_over_tokenization_rejected_without_change() {
        let ledger = TokenizationLedger::new();
        let project = ProjectId::from("hydro-gamma");
        ledger.record_generation(&project, credits("5")).unwrap();
        let before = ledger.entry(&project).unwrap();

        let err = ledger.record_tokenization(&project, credits("5.001")).unwrap_err();
        assert_eq!(
            err,
            VerdantError::InsufficientAvailableCredits {
                requested: credits("5.001"),
                available: credits("5"),
            }
        );
        assert_eq!(ledger.entry(&project).unwrap(), before);
        assert_eq!(ledger.events(&project).len(), 1);
    }

    #[test]
    fn test_unknown_project_cannot_tokenize() {
        let ledger = TokenizationLedger::new();
        let project = ProjectId::from("nowhere");

        assert!(matches!(
            ledger.record_tokenization(&project, credits("1")),
            Err(VerdantError::InsufficientAvailableCredits { .. })
        ));
        assert!(ledger.entry(&project).is_none());
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn test_invalid_deltas() {
        let ledger = TokenizationLedger::new();
        let project = ProjectId::from("solar-alpha");

        assert!(matches!(
            ledger.record_generation(&project, credits("0")),
            Err(VerdantError::InvalidAmount(_))
        ));
        assert!(matches!(
            ledger.record_generation(&project, FixedPointAmount::parse("1", 6).unwrap()),
            Err(VerdantError::DecimalMismatch { .. })
        ));
        assert!(ledger.store().is_empty());

        ledger.record_generation(&project, credits("1")).unwrap();
        assert!(matches!(
            ledger.record_tokenization(&project, credits("0")),
            Err(VerdantError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_journal_and_snapshot() {
        let ledger = TokenizationLedger::new();
        let a = ProjectId::from("a-project");
        let b = ProjectId::from("b-project");

        ledger.record_generation(&b, credits("3")).unwrap();
        ledger.record_generation(&a, credits("7")).unwrap();
        ledger.record_tokenization(&a, credits("4")).unwrap();

        let events = ledger.events(&a);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, LedgerEventKind::Generation);
        assert_eq!(events[1].kind, LedgerEventKind::Tokenization);
        assert_eq!(events[1].total_tokenized, credits("4"));
        assert_ne!(events[0].id, events[1].id);

        let snapshot = ledger.snapshot();
        let ids: Vec<&str> = snapshot.iter().map(|e| e.project_id().as_str()).collect();
        assert_eq!(ids, vec!["a-project", "b-project"]);
    }

    #[test]
    fn test_corrupted_entry_surfaces_error() {
        let project = ProjectId::from("corrupt");
        let mut entry = ProjectCreditLedgerEntry::new(project.clone(), CREDIT_DECIMALS);
        entry.set_totals(credits("1"), credits("2"));
        let event = journal_event(&entry, LedgerEventKind::Tokenization, credits("2"));
        let mut record = ProjectRecord::new(project.clone(), CREDIT_DECIMALS);
        record.commit(entry, event);

        let store = MemoryCreditStore::new();
        store.insert_record(record);
        let ledger = TokenizationLedger::with_store(store, CREDIT_DECIMALS);

        assert!(matches!(
            ledger.available_to_tokenize(&project),
            Err(VerdantError::NegativeResult { .. })
        ));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Generate(u32),
        Tokenize(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..10_000).prop_map(Op::Generate),
            (0u32..10_000).prop_map(Op::Tokenize),
        ]
    }

    proptest! {
        #[test]
        fn prop_available_never_negative(ops in prop::collection::vec(op(), 1..60)) {
            let ledger = TokenizationLedger::new();
            let project = ProjectId::from("prop");
            let mut generated = 0u128;
            let mut tokenized = 0u128;

            for op in ops {
                match op {
                    Op::Generate(n) => {
                        let delta = FixedPointAmount::from_raw(u128::from(n), CREDIT_DECIMALS);
                        if ledger.record_generation(&project, delta).is_ok() {
                            generated += u128::from(n);
                        }
                    }
                    Op::Tokenize(n) => {
                        let delta = FixedPointAmount::from_raw(u128::from(n), CREDIT_DECIMALS);
                        if ledger.record_tokenization(&project, delta).is_ok() {
                            tokenized += u128::from(n);
                        }
                    }
                }
                prop_assert!(tokenized <= generated);
                prop_assert_eq!(ledger.available_to_tokenize(&project).unwrap().raw(), generated - tokenized);
            }
        }
    }
}
