//! Central study service.
//!
//! Wires extraction, synthesis, tracking and analytics to the injected stores
//! and exposes the operations callers use. Construct one per process and
//! share it; there is no global instance.

use std::sync::Arc;

use uuid::Uuid;

use crate::analytics::{AnalyticsConfig, AnalyticsEngine, Report};
use crate::annotate::Annotator;
use crate::builder::{BuilderConfig, CardSetBuilder};
use crate::error::{Result, StudyError};
use crate::extract::{select_extractor, TermExtractor};
use crate::model::{CardSet, CardSetSummary, PerformanceRecord};
use crate::synth::CardSynthesizer;
use crate::tracker::PerformanceTracker;
use crate::traits::{CardStore, RecordStore};

/// Configuration for the study service.
#[derive(Debug, Clone, Default)]
pub struct StudyServiceConfig {
    pub builder: BuilderConfig,
    pub analytics: AnalyticsConfig,
    /// Fixed seed for question templates; entropy when `None`.
    pub seed: Option<u64>,
}

/// The study service.
pub struct StudyService {
    builder: CardSetBuilder,
    tracker: PerformanceTracker,
    analytics: AnalyticsEngine,
    cards: Arc<dyn CardStore>,
}

impl StudyService {
    /// Create a service, picking the extraction strategy from `annotator`.
    pub fn new(
        cards: Arc<dyn CardStore>,
        records: Arc<dyn RecordStore>,
        annotator: Option<Arc<dyn Annotator>>,
        config: StudyServiceConfig,
    ) -> Self {
        Self::with_extractor(cards, records, select_extractor(annotator), config)
    }

    /// Create a service with an explicit extraction strategy.
    pub fn with_extractor(
        cards: Arc<dyn CardStore>,
        records: Arc<dyn RecordStore>,
        extractor: Arc<dyn TermExtractor>,
        config: StudyServiceConfig,
    ) -> Self {
        let synthesizer = match config.seed {
            Some(seed) => CardSynthesizer::with_seed(seed),
            None => CardSynthesizer::new(),
        };

        Self {
            builder: CardSetBuilder::new(extractor, synthesizer, config.builder),
            tracker: PerformanceTracker::new(Arc::clone(&cards), Arc::clone(&records)),
            analytics: AnalyticsEngine::new(Arc::clone(&cards), records, config.analytics),
            cards,
        }
    }

    /// Extract terms from `text`, build a card set and persist it.
    pub fn extract_and_build(&self, text: &str, title: &str) -> Result<CardSet> {
        let set = self.builder.build(text, title)?;
        self.cards.save_set(&set)?;
        tracing::info!(
            set = %set.id,
            "created card set '{}' with {} cards",
            set.title,
            set.cards.len()
        );
        Ok(set)
    }

    /// Record one recall outcome (`correct` or `incorrect`) for a card.
    pub fn record_outcome(
        &self,
        card_id: Uuid,
        learner_id: &str,
        outcome: &str,
    ) -> Result<PerformanceRecord> {
        self.tracker.record(card_id, learner_id, outcome)
    }

    /// Performance report for a learner, optionally restricted to one set.
    ///
    /// Blank learner ids resolve the same way as in [`Self::record_outcome`];
    /// an unknown set fails with [`StudyError::UnknownSet`].
    pub fn get_analysis(&self, learner_id: &str, set_id: Option<Uuid>) -> Result<Report> {
        self.analytics.analyze(learner_id, set_id)
    }

    /// All stored sets, newest first.
    pub fn list_sets(&self) -> Result<Vec<CardSetSummary>> {
        Ok(self.cards.list_sets()?)
    }

    /// A stored set with its cards.
    pub fn get_set(&self, set_id: Uuid) -> Result<CardSet> {
        self.cards
            .set(set_id)?
            .ok_or(StudyError::UnknownSet(set_id))
    }
}
