//! BGG Scraper CLI application.

use anyhow::{Context, Result};
use bgg_scraper::CatalogScraper;
use clap::{Parser, Subcommand};
use shared::{Config, ConfigSource, SubjectKind};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Give up after this many consecutive rate-limit retries
    #[arg(long)]
    max_retries: Option<u32>,

    /// Also count every publisher/designer credited on each game
    #[arg(long)]
    all_links: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report on a designer's games, e.g. "Reiner Knizia"
    Designer { name: String },
    /// Report on a publisher's games, by directory slug, e.g. "4am-brain-llc"
    Publisher { slug: String },
}

impl Command {
    fn subject(&self) -> (SubjectKind, &str) {
        match self {
            Command::Designer { name } => (SubjectKind::Designer, name.as_str()),
            Command::Publisher { slug } => (SubjectKind::Publisher, slug.as_str()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, source) = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(max_retries) = args.max_retries {
        config.bgg.retry.max_retries = Some(max_retries);
    }

    let mut log_config = shared::LogConfig::from_settings("bgg-scraper", &config.logging)?;
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!("BGG Scraper starting");
    match source {
        ConfigSource::File => info!(config_file = %args.config.display(), "Loaded configuration"),
        ConfigSource::Defaults => warn!(
            config_file = %args.config.display(),
            "Config file not found, using defaults"
        ),
    }

    let (kind, name) = args.command.subject();
    let scraper = CatalogScraper::new(config.bgg)?.with_all_links(args.all_links);
    let report = scraper.run(kind, name).await.context("Scraper failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!("{}", report);
    }

    info!("BGG Scraper finished successfully");

    Ok(())
}
