use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use vellum_core::catalog::Catalog;
use vellum_core::config::Config;
use vellum_core::pipeline::RagPipeline;
use vellum_index::element::Element;
use vellum_index::indexer::DocumentIndexer;
use vellum_index::retriever::{Retriever, SearchMode};
use vellum_index::store::SearchStore;
use vellum_llm::azure::AzureProvider;

#[derive(Parser)]
#[command(name = "vellum", version, about = "Hybrid lexical + vector QA over technical documents")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "vellum.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment a document's element stream and index the chunks.
    Ingest {
        /// JSON file holding the element stream: `[{"kind": "...", "text": "..."}]`.
        file: PathBuf,
        /// Document name; defaults to the file stem.
        #[arg(long)]
        name: Option<String>,
        /// Extra metadata as inline JSON, stored with every chunk.
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Ask a question against the indexed documents.
    Ask {
        question: String,
        /// Search mode: lexical, vector, or hybrid.
        #[arg(long)]
        mode: Option<String>,
        /// Number of chunks to retrieve.
        #[arg(long)]
        size: Option<usize>,
        /// Context budget in characters.
        #[arg(long)]
        max_context: Option<usize>,
    },
    /// Drop and recreate the chunk index.
    ResetIndex,
    /// Print a built-in requirement catalog.
    Catalog {
        /// Which catalog: technical or quality.
        #[arg(long, default_value = "technical")]
        kind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Command::Ingest {
            file,
            name,
            metadata,
        } => ingest(&config, &file, name, metadata).await,
        Command::Ask {
            question,
            mode,
            size,
            max_context,
        } => ask(&config, &question, mode, size, max_context).await,
        Command::ResetIndex => reset_index(&config).await,
        Command::Catalog { kind } => print_catalog(&kind),
    }
}

async fn ingest(
    config: &Config,
    file: &Path,
    name: Option<String>,
    metadata: Option<String>,
) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read element stream {}", file.display()))?;
    let elements: Vec<Element> =
        serde_json::from_str(&content).context("failed to parse element stream")?;

    let document_name = match name {
        Some(n) => n,
        None => file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .context("cannot derive a document name from the file path")?,
    };
    let metadata = match metadata {
        Some(raw) => serde_json::from_str(&raw).context("failed to parse --metadata JSON")?,
        None => serde_json::json!({}),
    };

    let indexer = DocumentIndexer::new(
        SearchStore::new(config.store_config()),
        Arc::new(AzureProvider::new(config.azure_config())?),
        config.indexer_config(),
    );
    let report = indexer.ingest(&document_name, &elements, &metadata).await;

    println!(
        "{document_name}: {} chunks, {} saved, {} failed, embeddings: {}, {} ms",
        report.chunks,
        report.saved(),
        report.failures.len(),
        if report.embedded { "yes" } else { "no" },
        report.duration_ms
    );
    for failure in &report.failures {
        eprintln!("  chunk {} failed: {}", failure.sequence, failure.reason);
    }
    Ok(())
}

async fn ask(
    config: &Config,
    question: &str,
    mode: Option<String>,
    size: Option<usize>,
    max_context: Option<usize>,
) -> anyhow::Result<()> {
    let mut query = config.query_config();
    if let Some(mode) = mode {
        query.mode = parse_mode(&mode)?;
    }
    if let Some(size) = size {
        query.size = size;
    }
    if let Some(max_context) = max_context {
        query.max_context_length = max_context;
    }

    let provider = Arc::new(AzureProvider::new(config.azure_config())?);
    let retriever = Retriever::new(
        SearchStore::new(config.store_config()),
        Arc::clone(&provider),
        query,
    );
    let pipeline = RagPipeline::new(retriever, provider);

    let answer = pipeline.ask(question).await;
    println!("{}", answer.text);
    if answer.has_evidence() {
        let sources: Vec<String> = answer
            .results
            .iter()
            .map(|r| format!("{}#{}", r.document_name, r.chunk_id))
            .collect();
        println!("\nsources: {}", sources.join(", "));
    }
    Ok(())
}

async fn reset_index(config: &Config) -> anyhow::Result<()> {
    let store = SearchStore::new(config.store_config());
    store.reset_index().await?;
    println!("index {} recreated", store.index_name());
    Ok(())
}

fn print_catalog(kind: &str) -> anyhow::Result<()> {
    let catalog = match kind {
        "technical" => Catalog::technical(),
        "quality" => Catalog::quality(),
        other => bail!("unknown catalog: {other} (expected technical or quality)"),
    };
    for section in catalog.sections {
        println!("{}", section.name);
        for item in section.items {
            println!("  - {item}");
        }
    }
    Ok(())
}

fn parse_mode(mode: &str) -> anyhow::Result<SearchMode> {
    match mode {
        "lexical" | "text" => Ok(SearchMode::Lexical),
        "vector" => Ok(SearchMode::Vector),
        "hybrid" => Ok(SearchMode::Hybrid),
        other => bail!("unknown search mode: {other} (expected lexical, vector, or hybrid)"),
    }
}
