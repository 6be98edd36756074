//! In-memory store.

use std::sync::RwLock;

use uuid::Uuid;

use uknow_core::error::StoreError;
use uknow_core::model::{Card, CardSet, CardSetSummary, PerformanceRecord};
use uknow_core::traits::{CardStore, RecordStore};

/// A process-local store for tests and one-shot runs.
///
/// Nothing survives the process. Writers are serialized by the locks.
#[derive(Default)]
pub struct MemoryStore {
    sets: RwLock<Vec<CardSet>>,
    records: RwLock<Vec<PerformanceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sets.
    pub fn set_count(&self) -> usize {
        self.sets.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Number of appended records across all learners.
    pub fn record_count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }
}

impl CardStore for MemoryStore {
    fn save_set(&self, set: &CardSet) -> Result<(), StoreError> {
        let mut sets = self.sets.write().map_err(|_| StoreError::Poisoned)?;
        match sets.iter_mut().find(|s| s.id == set.id) {
            Some(existing) => *existing = set.clone(),
            None => sets.push(set.clone()),
        }
        Ok(())
    }

    fn card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        let sets = self.sets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sets
            .iter()
            .flat_map(|s| s.cards.iter())
            .find(|c| c.id == id)
            .cloned())
    }

    fn cards(&self, ids: &[Uuid]) -> Result<Vec<Card>, StoreError> {
        let sets = self.sets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sets
            .iter()
            .flat_map(|s| s.cards.iter())
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    fn cards_in_set(&self, set_id: Uuid) -> Result<Vec<Card>, StoreError> {
        let sets = self.sets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sets
            .iter()
            .find(|s| s.id == set_id)
            .map(|s| s.cards.clone())
            .unwrap_or_default())
    }

    fn set(&self, id: Uuid) -> Result<Option<CardSet>, StoreError> {
        let sets = self.sets.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sets.iter().find(|s| s.id == id).cloned())
    }

    fn list_sets(&self) -> Result<Vec<CardSetSummary>, StoreError> {
        let sets = self.sets.read().map_err(|_| StoreError::Poisoned)?;
        let mut summaries: Vec<CardSetSummary> = sets.iter().map(CardSet::summary).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}

impl RecordStore for MemoryStore {
    fn append(&self, record: &PerformanceRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(record.clone());
        Ok(())
    }

    fn records_for_learner(&self, learner_id: &str) -> Result<Vec<PerformanceRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect())
    }
}
