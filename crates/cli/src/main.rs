use anyhow::{bail, Result};
use application::ReviewService;
use clap::{Parser, Subcommand};
use common::{init_structured_logging, LoggingConfig};
use domain::{SegmentCategory, SegmentStatus};
use infrastructure::{ConfigLoader, ConfigValidator};
use std::path::PathBuf;
use tracing::debug;

mod commands;
mod progress;
mod render;

use commands::config::ConfigCommand;
use commands::review::Operation;

#[derive(Parser)]
#[command(name = "proofreader")]
#[command(about = "Review English source text against its translation with Google Gemini")]
#[command(version)]
struct Cli {
    /// Configuration file, searched before the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every segment of the project
    #[command(alias = "ls")]
    List,

    /// Show one segment with its AI feedback and word breakdown
    Show {
        /// Segment id or a unique prefix of it
        id: String,
    },

    /// Add a segment
    Add {
        /// English source text
        source: String,

        /// Translation, left empty when omitted
        #[arg(short, long, default_value = "")]
        target: String,
    },

    /// Change the source or target text of a segment
    Edit {
        id: String,

        #[arg(short, long)]
        source: Option<String>,

        #[arg(short, long)]
        target: Option<String>,
    },

    /// Set the review status (pending, reviewed, approved, needs-work)
    Status { id: String, status: SegmentStatus },

    /// Set the error category (accuracy, omission, formatting, terminology, style, none)
    Category {
        id: String,
        category: SegmentCategory,
    },

    /// Delete a segment
    #[command(alias = "rm")]
    Delete { id: String },

    /// Delete every segment
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Translate the source text into the target language
    Translate {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Ask the AI to audit translations for errors
    Audit {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Ask the AI for a word-by-word breakdown of translations
    Breakdown {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Audit every pending segment
    ReviewAll {
        /// Include segments that are not pending
        #[arg(short, long)]
        all: bool,
    },

    /// Show or change the target language
    #[command(alias = "lang")]
    Language {
        /// New target language, e.g. "German"
        name: Option<String>,
    },

    /// List supported target languages
    Languages,

    /// Store the Google Gemini API key (prompted when omitted, empty removes it)
    SetKey { key: Option<String> },

    /// Configuration management
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            ConfigLoader::new().with_path(path.clone())
        }
        None => ConfigLoader::new(),
    };
    let (config, source) = loader.load_with_source().await?;

    init_structured_logging(&LoggingConfig {
        level: if cli.verbose {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        },
        json_output: config.logging.json,
        color_output: console::colors_enabled_stderr(),
    })?;
    debug!("Configuration from {}", source);

    if let Commands::Config(command) = &cli.command {
        return command.execute(&loader, &config, &source).await;
    }

    ConfigValidator::new().validate(&config)?;
    let service = application::build_service(&config)?;
    dispatch(cli.command, &service).await
}

async fn dispatch(command: Commands, service: &ReviewService) -> Result<()> {
    use commands::{review, segments, settings};

    match command {
        Commands::List => segments::list(service),
        Commands::Show { id } => segments::show(service, &id),
        Commands::Add { source, target } => segments::add(service, &source, &target),
        Commands::Edit { id, source, target } => segments::edit(service, &id, source, target),
        Commands::Status { id, status } => segments::set_status(service, &id, status),
        Commands::Category { id, category } => segments::set_category(service, &id, category),
        Commands::Delete { id } => segments::delete(service, &id),
        Commands::Clear { yes } => segments::clear(service, yes),
        Commands::Translate { ids } => review::run(service, Operation::Translate, &ids).await,
        Commands::Audit { ids } => review::run(service, Operation::Audit, &ids).await,
        Commands::Breakdown { ids } => review::run(service, Operation::Breakdown, &ids).await,
        Commands::ReviewAll { all } => review::review_all(service, !all).await,
        Commands::Language { name } => settings::language(service, name.as_deref()),
        Commands::Languages => settings::languages(service),
        Commands::SetKey { key } => settings::set_key(service, key),
        Commands::Config(_) => Ok(()),
    }
}
