//! In-crate test doubles for the store traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Card, CardSet, CardSetSummary, PerformanceRecord};
use crate::traits::{CardStore, RecordStore};

pub fn card(term: &str, set_id: Uuid) -> Card {
    Card {
        id: Uuid::new_v4(),
        term: term.into(),
        question: format!("What is {term}?"),
        answer: format!("{term} is a study term"),
        context: format!("{term} is a study term"),
        set_id,
    }
}

#[derive(Default)]
pub struct FakeStore {
    sets: Mutex<Vec<CardSet>>,
    records: Mutex<Vec<PerformanceRecord>>,
    card_lookups: AtomicUsize,
}

impl FakeStore {
    pub fn add_set(&self, title: &str, terms: &[&str]) -> CardSet {
        let id = Uuid::new_v4();
        let set = CardSet {
            id,
            title: title.into(),
            created_at: Utc::now(),
            cards: terms.iter().map(|t| card(t, id)).collect(),
        };
        self.sets.lock().unwrap().push(set.clone());
        set
    }

    pub fn push(&self, record: PerformanceRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Calls made to the single-card lookup.
    pub fn card_lookups(&self) -> usize {
        self.card_lookups.load(Ordering::SeqCst)
    }
}

impl CardStore for FakeStore {
    fn save_set(&self, set: &CardSet) -> Result<(), StoreError> {
        self.sets.lock().unwrap().push(set.clone());
        Ok(())
    }

    fn card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        self.card_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sets
            .lock()
            .unwrap()
            .iter()
            .flat_map(|s| s.cards.iter())
            .find(|c| c.id == id)
            .cloned())
    }

    fn cards_in_set(&self, set_id: Uuid) -> Result<Vec<Card>, StoreError> {
        Ok(self
            .sets
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == set_id)
            .map(|s| s.cards.clone())
            .unwrap_or_default())
    }

    fn set(&self, id: Uuid) -> Result<Option<CardSet>, StoreError> {
        Ok(self.sets.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    fn list_sets(&self) -> Result<Vec<CardSetSummary>, StoreError> {
        let mut summaries: Vec<_> = self.sets.lock().unwrap().iter().map(CardSet::summary).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}

impl RecordStore for FakeStore {
    fn append(&self, record: &PerformanceRecord) -> Result<(), StoreError> {
        self.push(record.clone());
        Ok(())
    }

    fn records_for_learner(&self, learner_id: &str) -> Result<Vec<PerformanceRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect())
    }
}
