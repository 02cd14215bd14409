// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use threatlens::utils::logging::{format_error, format_success};
use threatlens::{AppState, Config, CorpusStore, EntityExtractor, EvidenceCollector};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "threatlens")]
#[command(version = "0.1.0")]
#[command(about = "Threat intelligence extraction and query engine", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch configured feeds once and print what was found
    Sync {
        #[arg(long, value_name = "NAME")]
        source: Vec<String>,

        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,
    },

    /// Extract entities from a local pdf or text file
    Extract {
        /// File to process
        file: PathBuf,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse a natural language query and print its structured form
    Query {
        /// Query text
        text: String,

        #[arg(short, long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    threatlens::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(config, host, port).await?;
        }
        Commands::Sync { source, limit } => {
            cmd_sync(&config, source, limit).await?;
        }
        Commands::Extract { file, pretty } => {
            cmd_extract(&config, &file, pretty)?;
        }
        Commands::Query { text, pretty } => {
            cmd_query(&text, pretty)?;
        }
    }

    Ok(())
}

async fn cmd_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!(
        "Starting API server on {}:{}",
        config.server.host, config.server.port
    );
    threatlens::server::run(AppState::new(config))
        .await
        .context("Server failed")?;
    Ok(())
}

async fn cmd_sync(config: &Config, sources: Vec<String>, limit: Option<usize>) -> Result<()> {
    let mut cfg = config.ingest.clone();
    if let Some(limit) = limit {
        cfg.limit_per_source = limit;
    }
    let sources = if sources.is_empty() {
        None
    } else {
        Some(sources)
    };

    let store = CorpusStore::new();
    let outcome = threatlens::sync_sources(&store, &cfg, sources)
        .await
        .context("Feed sync failed")?;

    println!(
        "{}",
        format_success(&format!(
            "Synced {} articles from {} sources",
            outcome.articles_processed,
            outcome.sources.len()
        ))
    );
    for err in &outcome.errors {
        println!("{}", format_error(&format!("{}: {}", err.source, err.error)));
    }

    let snapshot = store.snapshot();
    let stats = threatlens::store::aggregate::stats(snapshot.items());
    println!(
        "Extracted {} CVEs, {} IoCs, {} threats",
        stats.total_cves, stats.total_iocs, stats.total_threats
    );

    Ok(())
}

fn cmd_extract(config: &Config, file: &PathBuf, pretty: bool) -> Result<()> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let extractor = EntityExtractor::new();
    let collector = EvidenceCollector::new(
        config.extraction.snippet_max_chars,
        config.extraction.max_evidence_snippets,
    );
    let item = threatlens::process_upload(&extractor, &collector, &filename, &bytes)
        .context("Extraction failed")?;

    let output = if pretty {
        serde_json::to_string_pretty(&item)?
    } else {
        serde_json::to_string(&item)?
    };
    println!("{output}");

    Ok(())
}

fn cmd_query(text: &str, pretty: bool) -> Result<()> {
    let parsed = threatlens::query::parser::parse(text);

    let output = if pretty {
        serde_json::to_string_pretty(&parsed)?
    } else {
        serde_json::to_string(&parsed)?
    };
    println!("{output}");

    Ok(())
}
