//! Persistence capabilities consumed by the pipeline.
//!
//! Implemented by the `uknow-store` crate. Stores are shared across
//! components, so implementations must be `Send + Sync`.

use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Card, CardSet, CardSetSummary, PerformanceRecord};

// ---------------------------------------------------------------------------
// Card persistence
// ---------------------------------------------------------------------------

/// Storage for card sets and their cards.
pub trait CardStore: Send + Sync {
    /// Persist a set together with its cards.
    fn save_set(&self, set: &CardSet) -> Result<(), StoreError>;

    /// Look up a single card by id.
    fn card(&self, id: Uuid) -> Result<Option<Card>, StoreError>;

    /// Look up several cards. Ids that resolve to nothing are left out.
    ///
    /// Stores that can answer in one pass should override this.
    fn cards(&self, ids: &[Uuid]) -> Result<Vec<Card>, StoreError> {
        let mut found = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(card) = self.card(id)? {
                found.push(card);
            }
        }
        Ok(found)
    }

    /// All cards of a set, in set order. Unknown sets yield an empty list.
    fn cards_in_set(&self, set_id: Uuid) -> Result<Vec<Card>, StoreError>;

    /// Look up a set with its cards.
    fn set(&self, id: Uuid) -> Result<Option<CardSet>, StoreError>;

    /// Summaries of every stored set, newest first.
    fn list_sets(&self) -> Result<Vec<CardSetSummary>, StoreError>;
}

// ---------------------------------------------------------------------------
// Performance record persistence
// ---------------------------------------------------------------------------

/// Append-only storage for performance records.
pub trait RecordStore: Send + Sync {
    /// Append one record. Records are never updated or removed.
    fn append(&self, record: &PerformanceRecord) -> Result<(), StoreError>;

    /// All records of a learner, in append order.
    fn records_for_learner(&self, learner_id: &str) -> Result<Vec<PerformanceRecord>, StoreError>;
}
