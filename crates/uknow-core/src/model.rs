//! Core data model types for uknow.
//!
//! Cards and card sets are produced by the pipeline and never mutated;
//! performance records are append-only.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StudyError;

/// Learner identifier used when the caller does not supply one.
pub const ANONYMOUS_LEARNER: &str = "anonymous";

/// The learner id records are kept under. Blank ids become [`ANONYMOUS_LEARNER`].
pub fn normalize_learner(learner_id: &str) -> &str {
    if learner_id.trim().is_empty() {
        ANONYMOUS_LEARNER
    } else {
        learner_id
    }
}

/// A generated question/answer pair bound to one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier for this card.
    pub id: Uuid,
    /// The study term the card is about.
    pub term: String,
    /// Question shown to the learner.
    pub question: String,
    /// Expected answer, taken from the context.
    pub answer: String,
    /// Sentence the term was extracted from.
    pub context: String,
    /// The set this card belongs to.
    pub set_id: Uuid,
}

/// An ordered, capped collection of cards from one text submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    /// Unique identifier for this set.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// When the set was generated.
    pub created_at: DateTime<Utc>,
    /// The cards, in extraction order.
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl CardSet {
    /// Summary of this set without the cards.
    pub fn summary(&self) -> CardSetSummary {
        CardSetSummary {
            id: self.id,
            title: self.title.clone(),
            created_at: self.created_at,
            card_count: self.cards.len(),
        }
    }
}

/// Summary of a card set (without the full card list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSetSummary {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub card_count: usize,
}

/// The result of one recall attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "correct"),
            Outcome::Incorrect => write!(f, "incorrect"),
        }
    }
}

impl FromStr for Outcome {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correct" => Ok(Outcome::Correct),
            "incorrect" => Ok(Outcome::Incorrect),
            _ => Err(StudyError::InvalidOutcome(s.to_string())),
        }
    }
}

/// An immutable log entry of one recall attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// The card that was studied.
    pub card_id: Uuid,
    /// Who studied it.
    pub learner_id: String,
    /// Whether the recall was correct.
    pub outcome: Outcome,
    /// When the attempt was recorded.
    pub timestamp: DateTime<Utc>,
}

impl PerformanceRecord {
    /// Create a record stamped with the current time.
    pub fn new(card_id: Uuid, learner_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            learner_id: learner_id.into(),
            outcome,
            timestamp: Utc::now(),
        }
    }
}
