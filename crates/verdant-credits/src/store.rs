//! Ledger storage
//!
//! The ledger reaches its per-project state only through [`CreditStore`],
//! so an in-memory map, a database repository or a contract-storage cache
//! can sit behind it. Each project lives in its own mutex-guarded
//! [`ProjectRecord`]; the ledger holds that lock across check, commit and
//! [`CreditStore::persist`].
//!
//! Stores backed by durable storage hydrate records with
//! [`ProjectRecord::restore`] and write them out in `persist`.

use crate::types::{LedgerEvent, ProjectCreditLedgerEntry, ProjectId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use verdant_core::error::{Result, VerdantError};

/// Entry plus its journal
#[derive(Clone, Debug)]
pub struct ProjectRecord {
    entry: ProjectCreditLedgerEntry,
    events: Vec<LedgerEvent>,
}

impl ProjectRecord {
    /// Empty record at the ledger's credit scale
    pub fn new(project_id: ProjectId, decimals: u8) -> Self {
        Self {
            entry: ProjectCreditLedgerEntry::new(project_id, decimals),
            events: Vec::new(),
        }
    }

    /// Rebuild a record from a persisted entry and journal
    pub fn restore(entry: ProjectCreditLedgerEntry, events: Vec<LedgerEvent>) -> Result<Self> {
        entry.validate()?;
        if let Some(stray) = events.iter().find(|e| e.project_id != *entry.project_id()) {
            return Err(VerdantError::Storage(format!(
                "event {} belongs to {}, not {}",
                stray.id,
                stray.project_id,
                entry.project_id()
            )));
        }
        Ok(Self { entry, events })
    }

    pub fn entry(&self) -> &ProjectCreditLedgerEntry {
        &self.entry
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub(crate) fn commit(&mut self, entry: ProjectCreditLedgerEntry, event: LedgerEvent) {
        self.entry = entry;
        self.events.push(event);
    }

    /// Undo the last `commit`
    pub(crate) fn rollback(&mut self, previous: ProjectCreditLedgerEntry) {
        self.entry = previous;
        self.events.pop();
    }
}

/// Shared handle to a project's record
pub type ProjectSlot = Arc<Mutex<ProjectRecord>>;

/// Backing storage for a [`TokenizationLedger`](crate::TokenizationLedger)
pub trait CreditStore: Send + Sync {
    /// Slot for an existing project
    fn slot(&self, project_id: &ProjectId) -> Option<ProjectSlot>;

    /// Slot for a project, creating an empty record on first use
    fn slot_or_insert(&self, project_id: &ProjectId, decimals: u8) -> ProjectSlot;

    /// All known projects
    fn project_ids(&self) -> Vec<ProjectId>;

    /// Write a just-committed record through to durable storage.
    ///
    /// Called with the project lock held. An error rolls the commit back and
    /// is returned to the ledger caller.
    fn persist(&self, _record: &ProjectRecord) -> Result<()> {
        Ok(())
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryCreditStore {
    projects: RwLock<HashMap<ProjectId, ProjectSlot>>,
}

impl MemoryCreditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.read().is_empty()
    }

    /// Load a record, replacing any held for the same project
    pub fn insert_record(&self, record: ProjectRecord) -> ProjectSlot {
        let slot = Arc::new(Mutex::new(record));
        let project_id = slot.lock().entry().project_id().clone();
        self.projects.write().insert(project_id, Arc::clone(&slot));
        slot
    }
}

impl CreditStore for MemoryCreditStore {
    fn slot(&self, project_id: &ProjectId) -> Option<ProjectSlot> {
        self.projects.read().get(project_id).cloned()
    }

    fn slot_or_insert(&self, project_id: &ProjectId, decimals: u8) -> ProjectSlot {
        if let Some(slot) = self.slot(project_id) {
            return slot;
        }
        self.projects
            .write()
            .entry(project_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(ProjectRecord::new(project_id.clone(), decimals))))
            .clone()
    }

    fn project_ids(&self) -> Vec<ProjectId> {
        let mut ids: Vec<ProjectId> = self.projects.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
