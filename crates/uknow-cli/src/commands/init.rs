//! The `uknow init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing("uknow.toml", SAMPLE_CONFIG)?;
    write_if_missing("gazetteer.toml", SAMPLE_GAZETTEER)?;

    println!("\nNext steps:");
    println!("  1. Add names and phrases from your notes to gazetteer.toml");
    println!("  2. Run: uknow generate --file notes.txt");
    println!("  3. Run: uknow record --card <card-id> --outcome correct");
    println!("  4. Run: uknow analyze");

    Ok(())
}

fn write_if_missing(path: &str, content: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content)?;
        println!("Created {path}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# uknow configuration

[pipeline]
min_text_chars = 50
max_cards = 20

[analytics]
strength_threshold = 80.0
weakness_threshold = 60.0
min_attempts = 2
max_listed = 5

[annotator]
gazetteer = "gazetteer.toml"
# seed = 42

[store]
type = "json"
path = "./uknow-data"
"#;

const SAMPLE_GAZETTEER: &str = r#"# Names and phrases to turn into cards.
# Entity labels: person, organization, location, event, work_of_art, law, language.

[[entities]]
text = "Gregor Mendel"
label = "person"

[[entities]]
text = "Royal Society"
label = "organization"

[[phrases]]
text = "natural selection"

[[phrases]]
text = "dominant allele"
"#;
