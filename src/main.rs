//! docqa CLI entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docqa::adapters::http::{HttpConfig, HttpServer};
use docqa::domain::models::{Config, ExtractionMode, LoggingConfig};
use docqa::domain::ports::{AnswerExtractor, EmbeddingClient};
use docqa::infrastructure::backend::{OllamaClient, RetryPolicy};
use docqa::infrastructure::chunker::Chunker;
use docqa::infrastructure::config::ConfigLoader;
use docqa::infrastructure::index::{create_pool, SqliteVectorIndex};
use docqa::services::{
    GenerationExtractor, IngestLock, IngestionPipeline, MockExtractor, QueryService, Retriever,
};

#[derive(Parser)]
#[command(name = "docqa", about = "Question answering over a fixed knowledge source")]
struct Cli {
    /// Path to a configuration file (defaults to docqa.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the query HTTP server
    Serve,
    /// Rebuild the vector collection from the source text
    Ingest,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err:#}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    let result = match cli.command {
        Commands::Serve => run_serve(config).await,
        Commands::Ingest => run_ingest(config).await,
    };

    if let Err(err) = result {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_serve(config: Config) -> anyhow::Result<()> {
    let pool = create_pool(Path::new(&config.storage.path))
        .await
        .context("opening index storage")?;
    let index = Arc::new(SqliteVectorIndex::new(pool).await?);

    let client = Arc::new(OllamaClient::new(
        config.backend.clone(),
        RetryPolicy::from(&config.retry),
    )?);
    let embedder: Arc<dyn EmbeddingClient> = client.clone();

    let extractor: Arc<dyn AnswerExtractor> = match config.extractor.mode {
        ExtractionMode::Mock => {
            Arc::new(MockExtractor::new(config.extractor.not_found_distance))
        }
        ExtractionMode::Production => Arc::new(GenerationExtractor::new(client)),
    };

    tracing::info!(
        mode = ?config.extractor.mode,
        index = %config.storage.path,
        "starting query service"
    );

    let retriever = Retriever::new(embedder, index.clone());
    let service = QueryService::new(retriever, extractor, index, config.retrieval.top_k);

    let server = HttpServer::new(
        service,
        HttpConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            enable_cors: true,
        },
    );

    server
        .serve_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))
}

async fn run_ingest(config: Config) -> anyhow::Result<()> {
    let storage_path = Path::new(&config.storage.path);

    let _lock = IngestLock::acquire(storage_path)?;

    let pool = create_pool(storage_path)
        .await
        .context("opening index storage")?;
    let index = Arc::new(SqliteVectorIndex::new(pool).await?);

    let embedder: Arc<dyn EmbeddingClient> = Arc::new(OllamaClient::new(
        config.backend.clone(),
        RetryPolicy::from(&config.retry),
    )?);

    let chunker = Chunker::new(config.chunking.clone())?;

    let pipeline = IngestionPipeline::new(
        chunker,
        embedder,
        index,
        &config.ingest.source_path,
        &config.ingest.source_id,
    );

    let report = pipeline.run().await?;

    tracing::info!(
        "ingestion complete: {} chunks in collection at {}",
        report.chunks,
        config.storage.path
    );

    Ok(())
}
