//! Card set construction: extraction followed by per-term synthesis.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StudyError};
use crate::extract::TermExtractor;
use crate::model::{Card, CardSet};
use crate::synth::CardSynthesizer;

/// Title given to sets created without one.
pub const DEFAULT_SET_TITLE: &str = "Untitled Card Set";

/// Limits applied when building a card set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Minimum trimmed text length, in characters.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
    /// Cards kept per set; later terms are dropped.
    #[serde(default = "default_max_cards")]
    pub max_cards: usize,
}

fn default_min_text_chars() -> usize {
    50
}

fn default_max_cards() -> usize {
    20
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
            max_cards: default_max_cards(),
        }
    }
}

/// Orchestrates a [`TermExtractor`] and a [`CardSynthesizer`] over a text.
pub struct CardSetBuilder {
    extractor: Arc<dyn TermExtractor>,
    synthesizer: CardSynthesizer,
    config: BuilderConfig,
}

impl CardSetBuilder {
    pub fn new(
        extractor: Arc<dyn TermExtractor>,
        synthesizer: CardSynthesizer,
        config: BuilderConfig,
    ) -> Self {
        Self {
            extractor,
            synthesizer,
            config,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build a card set from raw text. Nothing is persisted here.
    pub fn build(&self, text: &str, title: &str) -> Result<CardSet> {
        let length = text.trim().chars().count();
        if length < self.config.min_text_chars {
            return Err(StudyError::InsufficientContent {
                length,
                required: self.config.min_text_chars,
            });
        }

        let terms = self.extractor.extract(text);
        if terms.is_empty() {
            return Err(StudyError::NoTermsFound);
        }

        let extracted = terms.len();
        let set_id = Uuid::new_v4();
        let cards: Vec<Card> = terms
            .into_iter()
            .take(self.config.max_cards)
            .map(|(term, context)| Card {
                id: Uuid::new_v4(),
                question: self.synthesizer.question(&term, &context),
                answer: self.synthesizer.answer(&term, &context),
                term,
                context,
                set_id,
            })
            .collect();

        if extracted > cards.len() {
            tracing::debug!(
                "dropped {} extracted terms beyond the {}-card cap",
                extracted - cards.len(),
                self.config.max_cards
            );
        }

        let title = match title.trim() {
            "" => DEFAULT_SET_TITLE.to_string(),
            t => t.to_string(),
        };

        tracing::debug!(
            "built set '{}' with {} cards using {} extraction",
            title,
            cards.len(),
            self.extractor.name()
        );

        Ok(CardSet {
            id: set_id,
            title,
            created_at: Utc::now(),
            cards,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PatternExtractor;
    use crate::terms::TermMap;

    struct FixedExtractor(TermMap);

    impl TermExtractor for FixedExtractor {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract(&self, _text: &str) -> TermMap {
            self.0.clone()
        }
    }

    fn builder(extractor: Arc<dyn TermExtractor>) -> CardSetBuilder {
        CardSetBuilder::new(extractor, CardSynthesizer::with_seed(3), BuilderConfig::default())
    }

    fn long_text() -> String {
        "a".repeat(80)
    }

    #[test]
    fn rejects_short_text() {
        let b = builder(Arc::new(PatternExtractor));
        let err = b.build("   Short text with Names.   ", "t").unwrap_err();
        assert!(matches!(
            err,
            StudyError::InsufficientContent { required: 50, .. }
        ));
    }

    #[test]
    fn filler_text_has_no_terms() {
        let b = builder(Arc::new(PatternExtractor));
        let err = b.build(&"z".repeat(60), "filler").unwrap_err();
        assert!(matches!(err, StudyError::NoTermsFound));
    }

    #[test]
    fn cards_mirror_extraction_in_order() {
        let terms: TermMap = vec![
            ("Mitosis", "Mitosis splits one cell into two cells"),
            ("Meiosis", "Meiosis produces gametes for reproduction"),
        ]
        .into_iter()
        .collect();
        let b = builder(Arc::new(FixedExtractor(terms.clone())));
        let set = b.build(&long_text(), "Cells").unwrap();

        assert_eq!(set.title, "Cells");
        assert_eq!(set.cards.len(), 2);
        for (card, (term, context)) in set.cards.iter().zip(terms.iter()) {
            assert_eq!(card.term, term);
            assert_eq!(card.context, context);
            assert_eq!(card.set_id, set.id);
            assert!(!card.answer.is_empty());
        }
        assert_eq!(set.cards[0].question, "Who or what is Mitosis?");
    }

    #[test]
    fn caps_at_twenty_cards_in_extraction_order() {
        let terms: TermMap = (0..30)
            .map(|i| (format!("Term{i:02}"), format!("Sentence about Term{i:02} here")))
            .collect();
        let b = builder(Arc::new(FixedExtractor(terms)));
        let set = b.build(&long_text(), "Many").unwrap();

        assert_eq!(set.cards.len(), 20);
        assert_eq!(set.cards[0].term, "Term00");
        assert_eq!(set.cards[19].term, "Term19");
    }

    #[test]
    fn blank_title_uses_default() {
        let terms: TermMap = vec![("Osmosis", "Osmosis moves water across membranes")]
            .into_iter()
            .collect();
        let b = builder(Arc::new(FixedExtractor(terms)));
        let set = b.build(&long_text(), "   ").unwrap();
        assert_eq!(set.title, DEFAULT_SET_TITLE);
    }

    #[test]
    fn configurable_limits() {
        let terms: TermMap = (0..5)
            .map(|i| (format!("Item{i}"), format!("Context sentence for Item{i}")))
            .collect();
        let b = CardSetBuilder::new(
            Arc::new(FixedExtractor(terms)),
            CardSynthesizer::with_seed(3),
            BuilderConfig {
                min_text_chars: 10,
                max_cards: 2,
            },
        );
        let set = b.build("0123456789ab", "Small").unwrap();
        assert_eq!(set.cards.len(), 2);
    }
}
