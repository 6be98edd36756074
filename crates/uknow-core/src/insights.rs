//! Rule-based text insights: technical terms, complexity, extractive summary.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};

const MAX_TECHNICAL_TERMS: usize = 20;
const COMMON_WORDS: &[&str] = &["THE", "AND", "OR", "BUT", "IN", "ON", "AT", "TO", "FOR"];
const TECHNICAL_PATTERNS: &[&str] = &[
    r"\b[A-Z]{2,}\b",
    r"\b\w*[A-Z]\w*[A-Z]\w*\b",
    r"\b\w+\([^)]*\)\b",
    r"\b\d+\.\d+\b",
    r"\b[a-zA-Z]+\d+[a-zA-Z]*\b",
];

const SUMMARY_MIN_SENTENCE_CHARS: usize = 21;
const SUMMARY_MIN_TEXT_CHARS: usize = 50;
const SUMMARY_KEYWORDS: &[&str] = &[
    "data",
    "analysis",
    "system",
    "method",
    "result",
    "study",
    "research",
    "model",
    "algorithm",
    "neural",
    "learning",
    "network",
    "deep",
    "machine",
    "artificial",
    "intelligence",
];

fn technical_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        TECHNICAL_PATTERNS
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::error!("invalid technical term pattern {p}: {e}");
                    None
                }
            })
            .collect()
    })
}

/// Acronyms, mixed-case identifiers, version numbers and similar tokens.
///
/// Sorted, deduplicated and capped at 20 entries.
pub fn technical_terms(text: &str) -> Vec<String> {
    let mut found = BTreeSet::new();
    for pattern in technical_patterns() {
        for m in pattern.find_iter(text) {
            found.insert(m.as_str());
        }
    }
    found
        .into_iter()
        .filter(|t| !COMMON_WORDS.contains(&t.to_uppercase().as_str()))
        .take(MAX_TECHNICAL_TERMS)
        .map(str::to_string)
        .collect()
}

/// Reading difficulty buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Complexity metrics for a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    pub technical_density: f64,
    pub difficulty: Difficulty,
    pub technical_terms_found: usize,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Classify how hard a text is to read.
pub fn complexity(text: &str) -> ComplexityReport {
    let word_count = text.split_whitespace().count();
    let sentence_count = text.split('.').filter(|s| !s.trim().is_empty()).count();
    let avg = word_count as f64 / sentence_count.max(1) as f64;

    let terms = technical_terms(text);
    let density = terms.len() as f64 / word_count.max(1) as f64;

    let difficulty = if avg > 20.0 || density > 0.1 {
        Difficulty::Hard
    } else if avg > 15.0 || density > 0.05 {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    };

    ComplexityReport {
        word_count,
        sentence_count,
        avg_words_per_sentence: round_to(avg, 2),
        technical_density: round_to(density, 3),
        difficulty,
        technical_terms_found: terms.len(),
    }
}

fn sentence_splitter() -> Option<&'static Regex> {
    static SPLITTER: OnceLock<Option<Regex>> = OnceLock::new();
    SPLITTER
        .get_or_init(|| Regex::new(r"[.!?]+").ok())
        .as_ref()
}

/// Extractive summary of `sentence_count` sentences.
///
/// Sentences are scored on position, length and study keywords; the best
/// ones are returned in their original order.
pub fn summarize(text: &str, sentence_count: usize) -> Result<String> {
    let length = text.trim().chars().count();
    if length < SUMMARY_MIN_TEXT_CHARS {
        return Err(StudyError::InsufficientContent {
            length,
            required: SUMMARY_MIN_TEXT_CHARS,
        });
    }

    let sentences: Vec<&str> = match sentence_splitter() {
        Some(re) => re.split(text).collect(),
        None => text.split(['.', '!', '?']).collect(),
    };
    let sentences: Vec<&str> = sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| s.chars().count() >= SUMMARY_MIN_SENTENCE_CHARS)
        .collect();

    if sentences.len() <= sentence_count {
        return Ok(text.to_string());
    }

    let n = sentences.len() as f64;
    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let position = 1.0 - (i as f64 / n) * 0.5;
            let length = (s.chars().count() as f64 / 100.0).min(1.0);
            let lowered = s.to_lowercase();
            let keywords = SUMMARY_KEYWORDS.iter().filter(|k| lowered.contains(*k)).count();
            (i, position + length + keywords as f64 * 0.1)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let top: Vec<&str> = scored
        .iter()
        .take(sentence_count)
        .map(|&(i, _)| sentences[i])
        .collect();

    let picked: Vec<&str> = sentences
        .iter()
        .copied()
        .filter(|s| top.contains(s))
        .collect();

    Ok(format!("{}.", picked.join(". ")))
}
