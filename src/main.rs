//! # GlamBot — Bilingual Salon Chat Server
//!
//! Retrieval-augmented chatbot for a beauty salon, answering in English or
//! Roman Urdu over a streaming chat API.
//!
//! Usage:
//!   glambot                      # Start on the configured port (default 3001)
//!   glambot --port 8080          # Custom port
//!   glambot --retrieval vector   # Answer from the Qdrant knowledge base
//!   glambot ingest               # Embed the salon facts into Qdrant

use anyhow::Result;
use clap::{Parser, Subcommand};
use glambot_core::config::{GlamBotConfig, RetrievalMode};
use glambot_knowledge::{EmbeddingClient, QdrantStore, SalonFacts};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glambot", version, about = "💅 GlamBot — bilingual salon chat server")]
struct Cli {
    /// Config file (default: ~/.glambot/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the retrieval mode (static or vector)
    #[arg(long, value_enum)]
    retrieval: Option<RetrievalModeArg>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RetrievalModeArg {
    Static,
    Vector,
}

#[derive(Subcommand)]
enum Command {
    /// Embed the salon facts and upsert them into the vector store
    Ingest,
}

fn load_config(cli: &Cli) -> Result<GlamBotConfig> {
    let mut config = match &cli.config {
        Some(path) => GlamBotConfig::load_from(std::path::Path::new(path))?,
        None => GlamBotConfig::load()?,
    };
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if let Some(mode) = cli.retrieval {
        config.retrieval.mode = match mode {
            RetrievalModeArg::Static => RetrievalMode::Static,
            RetrievalModeArg::Vector => RetrievalMode::Vector,
        };
    }
    Ok(config)
}

async fn ingest(config: &GlamBotConfig) -> Result<()> {
    let facts = SalonFacts::new(config.salon.clone());
    let docs = facts.documents();
    tracing::info!("📥 ingesting {} documents", docs.len());

    let embedder = EmbeddingClient::new(&config.embedding, &config.llm);
    let store = QdrantStore::new(&config.vector);
    store.ensure_collection().await?;

    let texts: Vec<String> = docs.iter().map(|d| d.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;
    store.upsert(&docs, &embeddings).await?;

    tracing::info!("✅ ingest complete, collection holds {} points", store.count().await?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "glambot=debug,glambot_gateway=debug,glambot_query=debug,glambot_knowledge=debug,\
         glambot_session=debug,glambot_llm=debug,tower_http=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Some(Command::Ingest) => ingest(&config).await,
        None => glambot_gateway::start(config).await,
    }
}
