//! Operator front-end for the migration backend: index a chunk dump, run a
//! migration request, or inspect session statistics. Configuration comes
//! from `RECAST_*` environment variables; `--store` overrides the
//! persistence path.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recast_chunk_store::ChunkStore;
use recast_indexer::{EmbeddingIndexer, JsonChunkSource};
use recast_pipeline::{MigrationPipeline, MigrationRequest, RuntimeConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recast", version, about = "AI-assisted code migration backend")]
struct Cli {
    /// Store persistence path (overrides RECAST_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index a JSON chunk dump into the store
    Index {
        /// Path to a JSON array of chunk records
        #[arg(long)]
        chunks: PathBuf,
    },

    /// Run a migration request and print the report
    Migrate {
        /// Path to a migration request JSON file
        #[arg(long)]
        request: PathBuf,
    },

    /// Print aggregate statistics for a session
    Stats {
        #[arg(long)]
        session: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = RuntimeConfig::from_env();
    if cli.store.is_some() {
        config.store_path = cli.store.clone();
    }
    let caps = config
        .build_capabilities()
        .await
        .context("failed to build capability bundle")?;

    match cli.command {
        Command::Index { chunks } => {
            let source = JsonChunkSource::new(&chunks);
            let indexer = EmbeddingIndexer::new(caps.embedder.clone(), caps.store.clone());
            let stats = indexer
                .index(&source)
                .await
                .with_context(|| format!("indexing {}", chunks.display()))?;
            caps.store.save().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        Command::Migrate { request } => {
            let raw = tokio::fs::read_to_string(&request)
                .await
                .with_context(|| format!("reading {}", request.display()))?;
            let request: MigrationRequest =
                serde_json::from_str(&raw).context("parsing migration request")?;

            let pipeline = MigrationPipeline::new(caps);
            let report = pipeline.process_migration(&request).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Stats { session } => {
            let statistics = caps.store.project_statistics(&session).await?;
            println!("{}", serde_json::to_string_pretty(&statistics)?);
        }
    }

    Ok(())
}
