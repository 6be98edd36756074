//! Linguistic annotation capability and a gazetteer-backed implementation.
//!
//! An [`Annotator`] reports named-entity spans and noun-phrase spans along
//! with the sentence each span sits in. [`GazetteerAnnotator`] does this from
//! a TOML lexicon, which keeps the annotated extraction path deterministic.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use serde::Deserialize;

use crate::error::AnnotationError;

/// Trait for annotators that find entities and noun phrases in text.
pub trait Annotator: Send + Sync {
    /// Human-readable annotator name (e.g. "gazetteer").
    fn name(&self) -> &str;

    /// Annotate `text`, returning spans in text order.
    fn annotate(&self, text: &str) -> Result<Annotation, AnnotationError>;
}

/// Output of one annotation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub entities: Vec<EntitySpan>,
    pub noun_phrases: Vec<PhraseSpan>,
}

/// A named entity and the sentence that encloses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub sentence: String,
}

/// A noun phrase and the sentence that encloses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseSpan {
    pub text: String,
    pub sentence: String,
}

/// Named-entity categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    Event,
    WorkOfArt,
    Law,
    Language,
    /// Any category outside the study allow-list (dates, quantities, ...).
    Other(String),
}

impl EntityLabel {
    /// Whether entities of this category make useful study terms.
    pub fn is_study_category(&self) -> bool {
        !matches!(self, EntityLabel::Other(_))
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityLabel::Person => write!(f, "person"),
            EntityLabel::Organization => write!(f, "organization"),
            EntityLabel::Location => write!(f, "location"),
            EntityLabel::Event => write!(f, "event"),
            EntityLabel::WorkOfArt => write!(f, "work_of_art"),
            EntityLabel::Law => write!(f, "law"),
            EntityLabel::Language => write!(f, "language"),
            EntityLabel::Other(other) => write!(f, "{other}"),
        }
    }
}

impl From<&str> for EntityLabel {
    fn from(s: &str) -> Self {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "person" | "per" => EntityLabel::Person,
            "org" | "organization" | "organisation" => EntityLabel::Organization,
            "gpe" | "loc" | "location" | "place" => EntityLabel::Location,
            "event" => EntityLabel::Event,
            "work_of_art" | "workofart" | "work" => EntityLabel::WorkOfArt,
            "law" => EntityLabel::Law,
            "language" | "lang" => EntityLabel::Language,
            _ => EntityLabel::Other(normalized),
        }
    }
}

impl FromStr for EntityLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EntityLabel::from(s))
    }
}

// ---------------------------------------------------------------------------
// Gazetteer annotator
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlGazetteer {
    #[serde(default)]
    entities: Vec<TomlEntity>,
    #[serde(default)]
    phrases: Vec<TomlPhrase>,
}

#[derive(Debug, Deserialize)]
struct TomlEntity {
    text: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct TomlPhrase {
    text: String,
}

struct EntityPattern {
    label: EntityLabel,
    pattern: Regex,
}

/// Lexicon annotator: reports every listed entity and phrase found in text.
///
/// Entities match case-sensitively, phrases case-insensitively, both on word
/// boundaries. Sentences are the trimmed pieces of a split on `.`.
pub struct GazetteerAnnotator {
    entities: Vec<EntityPattern>,
    phrases: Vec<Regex>,
}

impl GazetteerAnnotator {
    /// Load a gazetteer from a TOML file.
    pub fn load(path: &Path) -> Result<Self, AnnotationError> {
        let content = std::fs::read_to_string(path).map_err(|e| AnnotationError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AnnotationError::Load { message, .. } => AnnotationError::Load {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse a gazetteer from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, AnnotationError> {
        let load_err = |message: String| AnnotationError::Load {
            path: "<inline>".into(),
            message,
        };

        let parsed: TomlGazetteer = toml::from_str(content).map_err(|e| load_err(e.to_string()))?;

        let entities = parsed
            .entities
            .into_iter()
            .map(|e| {
                let text = e.text.trim();
                if text.is_empty() {
                    return Err(load_err("entity with empty text".into()));
                }
                let pattern = word_pattern(text, false).map_err(|e| load_err(e.to_string()))?;
                Ok(EntityPattern {
                    label: EntityLabel::from(e.label.as_str()),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let phrases = parsed
            .phrases
            .into_iter()
            .map(|p| {
                let text = p.text.trim();
                if text.is_empty() {
                    return Err(load_err("phrase with empty text".into()));
                }
                word_pattern(text, true).map_err(|e| load_err(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            entities = entities.len(),
            phrases = phrases.len(),
            "loaded gazetteer"
        );

        Ok(Self { entities, phrases })
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }
}

fn word_pattern(text: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    let flags = if case_insensitive { "(?i)" } else { "" };
    Regex::new(&format!(r"{flags}\b{}\b", regex::escape(text)))
}

impl Annotator for GazetteerAnnotator {
    fn name(&self) -> &str {
        "gazetteer"
    }

    fn annotate(&self, text: &str) -> Result<Annotation, AnnotationError> {
        let mut annotation = Annotation::default();

        for raw in text.split('.') {
            let sentence = raw.trim();
            if sentence.is_empty() {
                continue;
            }

            let mut entities: Vec<(usize, EntitySpan)> = Vec::new();
            for entity in &self.entities {
                for m in entity.pattern.find_iter(sentence) {
                    entities.push((
                        m.start(),
                        EntitySpan {
                            text: m.as_str().to_string(),
                            label: entity.label.clone(),
                            sentence: sentence.to_string(),
                        },
                    ));
                }
            }
            entities.sort_by_key(|(start, _)| *start);
            annotation
                .entities
                .extend(entities.into_iter().map(|(_, span)| span));

            let mut phrases: Vec<(usize, PhraseSpan)> = Vec::new();
            for phrase in &self.phrases {
                for m in phrase.find_iter(sentence) {
                    phrases.push((
                        m.start(),
                        PhraseSpan {
                            text: m.as_str().to_string(),
                            sentence: sentence.to_string(),
                        },
                    ));
                }
            }
            phrases.sort_by_key(|(start, _)| *start);
            annotation
                .noun_phrases
                .extend(phrases.into_iter().map(|(_, span)| span));
        }

        Ok(annotation)
    }
}
