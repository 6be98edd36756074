//! Term extraction strategies.
//!
//! Two implementations of [`TermExtractor`]:
//!
//! - [`PatternExtractor`]: capitalized-run matching over naive `.`-split
//!   sentences. Always available.
//! - [`AnnotatedExtractor`]: entity and noun-phrase spans from an
//!   [`Annotator`], falling back to pattern matching if annotation fails.
//!
//! [`select_extractor`] picks one once, based on whether an annotator is
//! available. Both write into a [`TermMap`], so a term seen again later in
//! the text takes the later sentence as its context.

use std::sync::Arc;

use crate::annotate::Annotator;
use crate::terms::TermMap;

/// Trait for strategies that find study terms and their sentence context.
pub trait TermExtractor: Send + Sync {
    /// Strategy name, for logging.
    fn name(&self) -> &str;

    /// Extract a term → context mapping from raw text.
    fn extract(&self, text: &str) -> TermMap;
}

/// Pick the extraction strategy for the lifetime of a service.
pub fn select_extractor(annotator: Option<Arc<dyn Annotator>>) -> Arc<dyn TermExtractor> {
    match annotator {
        Some(annotator) => {
            tracing::info!("using annotated term extraction ({})", annotator.name());
            Arc::new(AnnotatedExtractor::new(annotator))
        }
        None => {
            tracing::info!("no annotator available, using pattern term extraction");
            Arc::new(PatternExtractor)
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

// ---------------------------------------------------------------------------
// Pattern extractor
// ---------------------------------------------------------------------------

/// Sentences shorter than this are skipped.
const MIN_SENTENCE_CHARS: usize = 10;
/// Tokens appended after the starting token of a capitalized run.
const MAX_RUN_EXTENSION: usize = 3;
const PATTERN_STOP_WORDS: &[&str] = &["the", "and", "or", "but", "in", "on", "at", "to", "for"];

/// Capitalized-run extractor that needs no linguistic resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

impl PatternExtractor {
    fn extract_sentence(sentence: &str, out: &mut TermMap) {
        let words: Vec<&str> = sentence.split_whitespace().collect();

        for (i, word) in words.iter().enumerate() {
            if !starts_uppercase(word) || char_len(word) <= 2 {
                continue;
            }

            let run_end = words[i + 1..]
                .iter()
                .take(MAX_RUN_EXTENSION)
                .take_while(|w| starts_uppercase(w))
                .count();
            let term = words[i..=i + run_end].join(" ");

            let lowered = term.to_lowercase();
            if char_len(&term) > 2 && !PATTERN_STOP_WORDS.contains(&lowered.as_str()) {
                out.insert(term, sentence);
            }
        }
    }
}

impl TermExtractor for PatternExtractor {
    fn name(&self) -> &str {
        "pattern"
    }

    fn extract(&self, text: &str) -> TermMap {
        let mut terms = TermMap::new();
        for raw in text.split('.') {
            let sentence = raw.trim();
            if char_len(sentence) < MIN_SENTENCE_CHARS {
                continue;
            }
            Self::extract_sentence(sentence, &mut terms);
        }
        tracing::debug!(terms = terms.len(), "pattern extraction complete");
        terms
    }
}

// ---------------------------------------------------------------------------
// Annotated extractor
// ---------------------------------------------------------------------------

const MIN_ENTITY_CHARS: usize = 3;
const MIN_CONTEXT_CHARS: usize = 11;
const MIN_PHRASE_WORDS: usize = 2;
const MAX_PHRASE_CHARS: usize = 50;
const PHRASE_STOP_WORDS: &[&str] = &["this", "that", "these", "those", "some", "many", "few"];

/// Extractor backed by a linguistic annotator.
pub struct AnnotatedExtractor {
    annotator: Arc<dyn Annotator>,
    fallback: PatternExtractor,
}

impl AnnotatedExtractor {
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        Self {
            annotator,
            fallback: PatternExtractor,
        }
    }
}

/// Generic determiners anywhere in the phrase (substring match) disqualify it.
fn is_generic_phrase(phrase: &str) -> bool {
    let lowered = phrase.to_lowercase();
    PHRASE_STOP_WORDS.iter().any(|w| lowered.contains(w))
}

impl TermExtractor for AnnotatedExtractor {
    fn name(&self) -> &str {
        "annotated"
    }

    fn extract(&self, text: &str) -> TermMap {
        let annotation = match self.annotator.annotate(text) {
            Ok(annotation) => annotation,
            Err(e) => {
                tracing::warn!(
                    "annotator '{}' failed, falling back to pattern extraction: {e}",
                    self.annotator.name()
                );
                return self.fallback.extract(text);
            }
        };

        let mut terms = TermMap::new();

        for entity in &annotation.entities {
            if !entity.label.is_study_category() {
                continue;
            }
            let sentence = entity.sentence.trim();
            if char_len(&entity.text) >= MIN_ENTITY_CHARS && char_len(sentence) >= MIN_CONTEXT_CHARS {
                terms.insert(entity.text.clone(), sentence);
            }
        }

        for phrase in &annotation.noun_phrases {
            let words = phrase.text.split_whitespace().count();
            if words < MIN_PHRASE_WORDS || char_len(&phrase.text) > MAX_PHRASE_CHARS {
                continue;
            }
            if is_generic_phrase(&phrase.text) {
                continue;
            }
            let sentence = phrase.sentence.trim();
            if char_len(sentence) >= MIN_CONTEXT_CHARS {
                terms.insert(phrase.text.clone(), sentence);
            }
        }

        tracing::debug!(
            terms = terms.len(),
            entities = annotation.entities.len(),
            phrases = annotation.noun_phrases.len(),
            "annotated extraction complete"
        );
        terms
    }
}
