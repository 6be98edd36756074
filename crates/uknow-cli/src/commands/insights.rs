//! The `uknow insights` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use uknow_core::insights::{complexity, summarize, technical_terms, ComplexityReport};

use super::read_input;

#[derive(Serialize)]
struct Insights {
    technical_terms: Vec<String>,
    complexity: ComplexityReport,
    summary: Option<String>,
}

pub fn execute(
    file: Option<PathBuf>,
    text: Option<String>,
    sentences: usize,
    format: String,
) -> Result<()> {
    let (content, _) = read_input(file, text)?;

    let summary = match summarize(&content, sentences) {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::debug!("no summary: {e}");
            None
        }
    };
    let insights = Insights {
        technical_terms: technical_terms(&content),
        complexity: complexity(&content),
        summary,
    };

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&insights)?);
        }
        _ => {
            let c = &insights.complexity;
            println!(
                "Difficulty: {} ({} words, {} sentences, {:.2} words/sentence)",
                c.difficulty, c.word_count, c.sentence_count, c.avg_words_per_sentence
            );
            if insights.technical_terms.is_empty() {
                println!("Technical terms: none");
            } else {
                println!("Technical terms: {}", insights.technical_terms.join(", "));
            }
            match &insights.summary {
                Some(summary) => println!("\nSummary:\n{summary}"),
                None => println!("\nSummary: text too short to summarize"),
            }
        }
    }

    Ok(())
}
