//! The `uknow sets` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::open_service;

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let service = open_service(config_path)?;
    let sets = service.list_sets()?;

    if sets.is_empty() {
        println!("No card sets yet. Run `uknow generate --file <path>` to create one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Set ID", "Title", "Cards", "Created"]);
    for set in &sets {
        table.add_row(vec![
            Cell::new(set.id),
            Cell::new(&set.title),
            Cell::new(set.card_count),
            Cell::new(set.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");

    Ok(())
}
