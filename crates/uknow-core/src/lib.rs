//! uknow-core — Term extraction, card synthesis, and performance analytics.
//!
//! This crate turns raw study text into question/answer cards and turns
//! recorded recall outcomes into strength/weakness reports. Persistence is
//! consumed through the traits in [`traits`].

pub mod analytics;
pub mod annotate;
pub mod builder;
pub mod error;
pub mod extract;
pub mod insights;
pub mod model;
pub mod service;
pub mod synth;
pub mod terms;
pub mod tracker;
pub mod traits;

#[cfg(test)]
mod testing;

pub use error::{AnnotationError, StoreError, StudyError};
pub use service::{StudyService, StudyServiceConfig};
