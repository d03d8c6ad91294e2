//! # Raglet — RAG FAQ Backend
//!
//! Document ingestion, vector retrieval, and LLM-backed question
//! answering behind a single HTTP gateway.
//!
//! Usage:
//!   raglet                       # Start gateway (default port 8000)
//!   raglet --port 8080           # Custom port
//!   raglet --config raglet.toml  # Load a config file (env vars still win)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use raglet_cache::RedisCache;
use raglet_core::RagletConfig;
use raglet_core::traits::Embedder;
use raglet_db::PgStore;
use raglet_gateway::AppState;
use raglet_index::QdrantIndex;
use raglet_providers::{FallbackEmbedder, OpenAiClient};

#[derive(Parser)]
#[command(name = "raglet", version, about = "RAG FAQ backend gateway")]
struct Cli {
    /// Path to a TOML config file (overrides RAGLET_CONFIG)
    #[arg(short, long)]
    config: Option<String>,

    /// Gateway port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "raglet=debug,tower_http=debug"
    } else {
        "raglet=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    if let Some(path) = &cli.config {
        // SAFETY: single-threaded at this point, before the runtime spawns workers
        unsafe { std::env::set_var("RAGLET_CONFIG", path) };
    }
    let mut config = RagletConfig::load().context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    // Connect backing services
    let db = PgStore::connect(&config.postgres)
        .await
        .context("failed to connect to Postgres")?;
    tracing::info!(host = %config.postgres.host, "connected to Postgres");

    let cache = RedisCache::connect(&config.redis)
        .await
        .context("failed to connect to Redis")?;
    tracing::info!(host = %config.redis.host, "connected to Redis");

    let index = QdrantIndex::connect(&config.qdrant).context("failed to connect to Qdrant")?;
    tracing::info!(url = %config.qdrant.qdrant_url(), "connected to Qdrant");

    // LLM provider. Without an API key embeddings fall back to a
    // deterministic local embedder so ingestion and search still work.
    let client = Arc::new(OpenAiClient::new(&config.llm));
    let embedder: Arc<dyn Embedder> = if client.has_api_key() {
        client.clone()
    } else {
        tracing::warn!("no LLM API key configured, using fallback embedder");
        Arc::new(FallbackEmbedder::new(config.ingest.embedding_dimension))
    };

    println!("🧠 Raglet v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "   🌐 Gateway:  http://{}:{}",
        config.gateway.host, config.gateway.port
    );
    println!("   🗄️  Postgres: {}", config.postgres.host);
    println!("   ⚡ Redis:    {}", config.redis.host);
    println!("   📐 Qdrant:   {}", config.qdrant.qdrant_url());
    println!("   🤖 Model:    {}", config.llm.chat_model);
    println!();

    let state = Arc::new(AppState::new(
        config,
        Arc::new(db),
        Arc::new(cache),
        Arc::new(index),
        embedder,
        client,
    ));

    raglet_gateway::start(state).await?;
    Ok(())
}
