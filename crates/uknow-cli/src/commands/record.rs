//! The `uknow record` command.

use std::path::Path;

use anyhow::Result;
use uuid::Uuid;

use super::open_service;

pub fn execute(config_path: Option<&Path>, card: Uuid, outcome: String, learner: String) -> Result<()> {
    let service = open_service(config_path)?;
    let record = service.record_outcome(card, &learner, &outcome)?;
    println!(
        "Recorded {} for card {} (learner {})",
        record.outcome, record.card_id, record.learner_id
    );
    Ok(())
}
