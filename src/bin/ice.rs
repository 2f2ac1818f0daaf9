//! ICE CLI: ingestion ledger, path attribution and citation rendering.
//!
//! Usage:
//!   ice manifest <status|check|add> [--storage-dir dir]
//!   ice portfolio <delta|update> TICKER...
//!   ice attribute input.json [--json]
//!   ice cite sources.json --answer TEXT [--style inline|footnote|structured]

use clap::{Parser, Subcommand};
use ice::citation::CitationStyle;
use ice::context::AttributionInput;
use ice::manifest::{CandidateDocument, DocumentMetadata};
use ice::{get_document_id, CitationOutput, EnrichedSource, IceApi, IceConfig};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "ice",
    version,
    about = "Evidence attribution for graph-RAG answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the ingestion manifest
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and update the ingestion manifest
    Manifest {
        #[command(subcommand)]
        action: ManifestAction,
    },
    /// Track portfolio holdings
    Portfolio {
        #[command(subcommand)]
        action: PortfolioAction,
    },
    /// Attribute causal paths to the chunks of a parsed context
    Attribute {
        /// JSON file with `paths` and `context`
        input: PathBuf,
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Render citations for an answer
    Cite {
        /// JSON file with a list of enriched sources
        sources: PathBuf,
        /// Answer text the citations belong to
        #[arg(long)]
        answer: String,
        /// inline, footnote or structured
        #[arg(long)]
        style: Option<String>,
        /// Sources listed inline before truncation
        #[arg(long)]
        max_inline: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ManifestAction {
    /// Print manifest statistics
    Status,
    /// Report whether a document is new, updated, a duplicate or already ingested
    Check {
        /// Document content
        file: PathBuf,
        #[arg(long)]
        source_type: String,
        #[arg(long)]
        id: String,
    },
    /// Record a document as ingested
    Add {
        /// Document content
        file: PathBuf,
        #[arg(long)]
        source_type: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        ticker: Option<String>,
    },
}

#[derive(Subcommand)]
enum PortfolioAction {
    /// Compare holdings with the latest snapshot
    Delta {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Record a new snapshot of holdings
    Update {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
}

fn load_config(path: Option<&Path>, storage_dir: Option<PathBuf>) -> Result<IceConfig, String> {
    let mut config = IceConfig::load(path).map_err(|e| format!("Failed to load config: {}", e))?;
    if let Some(dir) = storage_dir {
        config.storage_dir = dir;
    }
    Ok(config)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize output: {}", e))
}

fn cmd_manifest(api: &IceApi, action: ManifestAction) -> Result<(), String> {
    let mut manifest = api.open_manifest();
    match action {
        ManifestAction::Status => {
            println!("Manifest: {}", manifest.path().display());
            println!("{}", to_json(manifest.statistics())?);
        }
        ManifestAction::Check { file, source_type, id } => {
            let content = read_text(&file)?;
            let candidate = CandidateDocument::new(source_type, id, content);
            let doc_id = candidate.doc_id();
            let candidates = [candidate];

            let status = if !manifest.get_updated_documents(&candidates).is_empty() {
                "updated"
            } else if manifest.is_document_ingested(&doc_id) {
                "already ingested"
            } else if manifest.get_new_documents(&candidates).is_empty() {
                "duplicate"
            } else {
                "new"
            };
            println!("{}: {}", doc_id, status);
        }
        ManifestAction::Add { file, source_type, id, ticker } => {
            let content = read_text(&file)?;
            let doc_id = get_document_id(&source_type, &id);
            let mut metadata = DocumentMetadata::default().with_source_type(source_type);
            if let Some(ticker) = ticker {
                metadata = metadata.with_ticker(ticker);
            }
            let document = manifest.add_document(&doc_id, &content, metadata);
            manifest.save().map_err(|e| e.to_string())?;
            println!("Recorded {} ({})", document.doc_id, document.content_hash);
        }
    }
    Ok(())
}

fn cmd_portfolio(api: &IceApi, action: PortfolioAction) -> Result<(), String> {
    let mut manifest = api.open_manifest();
    match action {
        PortfolioAction::Delta { tickers } => {
            println!("{}", to_json(&manifest.get_portfolio_delta(&tickers))?);
        }
        PortfolioAction::Update { tickers } => {
            let delta = manifest.get_portfolio_delta(&tickers);
            manifest.update_portfolio(&tickers);
            manifest.save().map_err(|e| e.to_string())?;
            println!("{}", to_json(&delta)?);
        }
    }
    Ok(())
}

fn cmd_attribute(api: &IceApi, input: &Path, json: bool) -> Result<(), String> {
    let input = AttributionInput::from_file(input).map_err(|e| e.to_string())?;
    let paths = api.attribute(&input.paths, &input.context);
    if json {
        println!("{}", to_json(&paths)?);
    } else if paths.is_empty() {
        println!("No causal paths");
    } else {
        print!("{}", api.render_paths(&paths));
    }
    Ok(())
}

fn cmd_cite(
    api: &IceApi,
    sources: &Path,
    answer: &str,
    style: Option<&str>,
    max_inline: Option<usize>,
) -> Result<(), String> {
    let text = read_text(sources)?;
    let sources: Vec<EnrichedSource> =
        serde_json::from_str(&text).map_err(|e| format!("Malformed sources JSON: {}", e))?;

    let style = style
        .map(CitationStyle::parse_or_inline)
        .unwrap_or(api.config().citation.default_style);
    let max_inline = max_inline.unwrap_or(api.config().citation.max_inline);

    let outcome = api.cite_with(answer, &sources, style, max_inline);
    if let Some(reason) = outcome.reason() {
        eprintln!("Warning: citations unavailable: {}", reason);
    }
    match outcome.into_inner() {
        CitationOutput::Text(text) => println!("{}", text),
        CitationOutput::Structured(record) => println!("{}", to_json(&record)?),
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(cli.config.as_deref(), cli.storage_dir)?;
    let api = IceApi::new(config);

    match cli.command {
        Commands::Manifest { action } => cmd_manifest(&api, action),
        Commands::Portfolio { action } => cmd_portfolio(&api, action),
        Commands::Attribute { input, json } => cmd_attribute(&api, &input, json),
        Commands::Cite { sources, answer, style, max_inline } => {
            cmd_cite(&api, &sources, &answer, style.as_deref(), max_inline)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
