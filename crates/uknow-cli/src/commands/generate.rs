//! The `uknow generate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use super::{open_service, read_input, truncate};

pub fn execute(
    config_path: Option<&Path>,
    file: Option<PathBuf>,
    text: Option<String>,
    title: Option<String>,
    format: String,
) -> Result<()> {
    let (content, default_title) = read_input(file, text)?;
    let title = title.unwrap_or(default_title);

    let service = open_service(config_path)?;
    let set = service
        .extract_and_build(&content, &title)
        .context("failed to generate cards")?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
        _ => {
            println!(
                "Created card set '{}' ({}) with {} cards",
                set.title,
                set.id,
                set.cards.len()
            );

            let mut table = Table::new();
            table.set_header(vec!["Card ID", "Term", "Question"]);
            for card in &set.cards {
                table.add_row(vec![
                    Cell::new(card.id),
                    Cell::new(&card.term),
                    Cell::new(truncate(&card.question, 60)),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
