//! The `uknow analyze` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use uknow_core::analytics::{Report, TermClassification};

use super::open_service;

pub fn execute(
    config_path: Option<&Path>,
    learner: String,
    set: Option<Uuid>,
    format: String,
) -> Result<()> {
    let service = open_service(config_path)?;
    let report = service.get_analysis(&learner, set)?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        _ => print_text(&learner, &report),
    }

    Ok(())
}

fn print_text(learner: &str, report: &Report) {
    if report.is_empty() {
        println!("No performance records for learner '{learner}'.");
        return;
    }

    println!(
        "Learner '{learner}': {} attempts, {} correct, {} incorrect, {:.2}% accuracy",
        report.total_attempts, report.correct_count, report.incorrect_count, report.accuracy
    );

    print_list("Strengths", &report.strengths);
    print_list("Weaknesses", &report.weaknesses);

    let mut table = Table::new();
    table.set_header(vec!["Term", "Correct", "Incorrect", "Accuracy"]);
    for (term, stat) in &report.term_analysis {
        table.add_row(vec![
            Cell::new(term),
            Cell::new(stat.correct),
            Cell::new(stat.incorrect),
            Cell::new(format!("{:.1}%", stat.accuracy)),
        ]);
    }
    println!("\n{table}");
}

fn print_list(heading: &str, items: &[TermClassification]) {
    if items.is_empty() {
        return;
    }
    println!("\n{heading}:");
    for item in items {
        println!(
            "  {} {:.1}% over {} attempts",
            item.term, item.accuracy, item.attempts
        );
    }
}
