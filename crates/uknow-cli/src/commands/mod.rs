//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use uknow_core::StudyService;
use uknow_store::{load_config_from, open_store, probe_annotator};

pub mod analyze;
pub mod generate;
pub mod init;
pub mod insights;
pub mod record;
pub mod sets;
pub mod show;

/// Title used for inline text when none is given.
const INLINE_TITLE: &str = "Text-based Card Set";

/// Build the study service from the resolved configuration.
fn open_service(config_path: Option<&Path>) -> Result<StudyService> {
    let config = load_config_from(config_path)?;
    let store = open_store(&config.store)?;
    let annotator = probe_annotator(&config.annotator);
    Ok(StudyService::new(
        store.cards,
        store.records,
        annotator,
        config.service_config(),
    ))
}

/// Input text plus the title it implies.
fn read_input(file: Option<PathBuf>, text: Option<String>) -> Result<(String, String)> {
    match (file, text) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| INLINE_TITLE.to_string());
            Ok((content, stem))
        }
        (None, Some(text)) => Ok((text, INLINE_TITLE.to_string())),
        (None, None) => anyhow::bail!("either --file or --text is required"),
    }
}

/// Shorten `s` to at most `max` characters for table cells.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
