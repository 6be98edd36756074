//! Recording of recall outcomes.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Result, StudyError};
use crate::model::{normalize_learner, Outcome, PerformanceRecord};
use crate::traits::{CardStore, RecordStore};

/// Appends performance records for existing cards.
pub struct PerformanceTracker {
    cards: Arc<dyn CardStore>,
    records: Arc<dyn RecordStore>,
}

impl PerformanceTracker {
    pub fn new(cards: Arc<dyn CardStore>, records: Arc<dyn RecordStore>) -> Self {
        Self { cards, records }
    }

    /// Record one recall attempt.
    ///
    /// `outcome` must be exactly `correct` or `incorrect`; a blank learner id
    /// is recorded as [`ANONYMOUS_LEARNER`](crate::model::ANONYMOUS_LEARNER).
    pub fn record(&self, card_id: Uuid, learner_id: &str, outcome: &str) -> Result<PerformanceRecord> {
        let outcome: Outcome = outcome.parse()?;

        if self.cards.card(card_id)?.is_none() {
            return Err(StudyError::UnknownCard(card_id));
        }

        let learner_id = normalize_learner(learner_id);

        let record = PerformanceRecord::new(card_id, learner_id, outcome);
        self.records.append(&record)?;
        tracing::info!(
            card = %card_id,
            learner = learner_id,
            "recorded {outcome} attempt"
        );
        Ok(record)
    }
}
