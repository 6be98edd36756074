//! uknow CLI — study cards from raw text, with recall analytics.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "uknow", version, about = "Turn study text into cards and track recall")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a card set from text
    Generate {
        /// Read the text from a file
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,

        /// Use inline text
        #[arg(long)]
        text: Option<String>,

        /// Set title (default: file stem, or "Text-based Card Set")
        #[arg(long)]
        title: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Record a recall outcome for a card
    Record {
        /// Card ID
        #[arg(long)]
        card: Uuid,

        /// correct or incorrect
        #[arg(long)]
        outcome: String,

        /// Learner ID
        #[arg(long, default_value = "anonymous")]
        learner: String,
    },

    /// Analyze a learner's performance
    Analyze {
        /// Learner ID
        #[arg(long, default_value = "anonymous")]
        learner: String,

        /// Restrict to one card set
        #[arg(long)]
        set: Option<Uuid>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List card sets, newest first
    Sets,

    /// Show the cards of a set
    Show {
        /// Card set ID
        #[arg(long)]
        set: Uuid,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Technical terms, complexity and a short summary of a text
    Insights {
        /// Read the text from a file
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,

        /// Use inline text
        #[arg(long)]
        text: Option<String>,

        /// Sentences in the summary
        #[arg(long, default_value = "3")]
        sentences: usize,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter config and gazetteer
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uknow=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Generate {
            file,
            text,
            title,
            format,
        } => commands::generate::execute(config, file, text, title, format),
        Commands::Record {
            card,
            outcome,
            learner,
        } => commands::record::execute(config, card, outcome, learner),
        Commands::Analyze {
            learner,
            set,
            format,
        } => commands::analyze::execute(config, learner, set, format),
        Commands::Sets => commands::sets::execute(config),
        Commands::Show { set, format } => commands::show::execute(config, set, format),
        Commands::Insights {
            file,
            text,
            sentences,
            format,
        } => commands::insights::execute(file, text, sentences, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
