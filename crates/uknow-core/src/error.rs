//! Error types for the study pipeline.
//!
//! `StudyError` is what every public operation returns. `StoreError` is the
//! failure type of the persistence capabilities, and `AnnotationError` is
//! raised by annotators but never escapes the extraction pipeline.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the card pipeline, the tracker, and analytics.
#[derive(Debug, Error)]
pub enum StudyError {
    /// The input text is too short to extract anything meaningful.
    #[error("insufficient text content for card generation: {length} characters, need at least {required}")]
    InsufficientContent { length: usize, required: usize },

    /// Extraction ran but produced no usable terms.
    #[error("no suitable terms found for card generation")]
    NoTermsFound,

    /// The referenced card does not exist.
    #[error("card not found: {0}")]
    UnknownCard(Uuid),

    /// The referenced card set does not exist.
    #[error("card set not found: {0}")]
    UnknownSet(Uuid),

    /// The outcome was neither `correct` nor `incorrect`.
    #[error("invalid outcome '{0}': expected 'correct' or 'incorrect'")]
    InvalidOutcome(String),

    /// The persistence layer failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl StudyError {
    /// Returns `true` if the caller may succeed by supplying different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StudyError::InsufficientContent { .. } | StudyError::NoTermsFound
        )
    }
}

/// Errors raised by card and record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock guarding in-process state was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,

    #[error("storage error: {0}")]
    Other(String),
}

/// Errors raised by a linguistic annotator.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("failed to load annotator resources from {path}: {message}")]
    Load { path: String, message: String },

    #[error("annotation failed: {0}")]
    Failed(String),
}

pub type Result<T, E = StudyError> = std::result::Result<T, E>;
