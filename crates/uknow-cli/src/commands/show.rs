//! The `uknow show` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use super::{open_service, truncate};

pub fn execute(config_path: Option<&Path>, set_id: Uuid, format: String) -> Result<()> {
    let service = open_service(config_path)?;
    let set = service.get_set(set_id)?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
        _ => {
            println!(
                "{} ({} cards, created {})",
                set.title,
                set.cards.len(),
                set.created_at.format("%Y-%m-%d %H:%M")
            );

            let mut table = Table::new();
            table.set_header(vec!["Card ID", "Term", "Question", "Answer"]);
            for card in &set.cards {
                table.add_row(vec![
                    Cell::new(card.id),
                    Cell::new(&card.term),
                    Cell::new(truncate(&card.question, 50)),
                    Cell::new(truncate(&card.answer, 60)),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
