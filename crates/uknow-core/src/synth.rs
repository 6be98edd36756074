//! Question and answer synthesis for a (term, context) pair.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EXPLAIN_KEYWORDS: &[&str] = &["theory", "principle", "law", "rule"];
const DESCRIBE_KEYWORDS: &[&str] = &["process", "method", "technique"];

/// Generic phrasings used when no keyword rule applies. `{term}` is replaced.
pub const QUESTION_TEMPLATES: &[&str] = &[
    "What is {term}?",
    "Define {term}.",
    "Explain the concept of {term}.",
    "What do you know about {term}?",
    "Describe {term}.",
    "What is the significance of {term}?",
    "How would you explain {term}?",
];

const MIN_ANSWER_CHARS: usize = 11;

/// Produces the question and answer text of a card.
///
/// Question choice is keyword-driven on the term; only the final generic
/// branch is random, drawing from the injected generator.
pub struct CardSynthesizer {
    rng: Mutex<StdRng>,
}

impl CardSynthesizer {
    /// Create a synthesizer seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a synthesizer with a fixed seed (reproducible questions).
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Build the question for `term`. The context does not influence it.
    pub fn question(&self, term: &str, _context: &str) -> String {
        let lowered = term.to_lowercase();

        if EXPLAIN_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return format!("Explain the {term}.");
        }
        if DESCRIBE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return format!("Describe the {term}.");
        }

        let single_word = term.split_whitespace().count() == 1;
        if single_word && term.chars().next().is_some_and(char::is_uppercase) {
            return format!("Who or what is {term}?");
        }

        let index = {
            // A poisoned generator is still a usable generator.
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..QUESTION_TEMPLATES.len())
        };
        QUESTION_TEMPLATES[index].replace("{term}", term)
    }

    /// Pick the answer: the first `.`-delimited sentence of the context that
    /// mentions the term (case-insensitive) and is long enough, otherwise the
    /// whole context.
    pub fn answer(&self, term: &str, context: &str) -> String {
        let needle = term.to_lowercase();
        context
            .split('.')
            .map(str::trim)
            .find(|s| s.chars().count() >= MIN_ANSWER_CHARS && s.to_lowercase().contains(&needle))
            .unwrap_or_else(|| context.trim())
            .to_string()
    }
}

impl Default for CardSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
