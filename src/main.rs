//! Thin CLI over the `gcq` library: `index`, `search`, `status` (spec §1.1, C16).
//!
//! Mirrors the teacher's binary shape (parse args, build the shared runtime
//! state, dispatch to a subcommand, print and set an exit code) but the
//! actual work lives entirely in the library — this file is wiring only.

use clap::{Parser, Subcommand};
use colored::Colorize;
use gcq::config::Config;
use gcq::daemon::ExitCode;
use gcq::embed::providers::{HuggingFaceProvider, OllamaProvider};
use gcq::embed::{EmbeddingProvider, Purpose};
use gcq::embed::service::EmbeddingService;
use gcq::error::CoreError;
use gcq::metadata::IndexMetadata;
use gcq::paths::Layout;
use gcq::pipeline::Indexer;
use gcq::search::{Searcher, UnitPayload};
use gcq::vectorindex::VectorIndex;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "gcq", about = "Local code-intelligence engine", version)]
struct Cli {
    /// Project root to operate on (defaults to the current directory).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk the project, extract structure, and build/refresh the semantic index.
    Index,
    /// Embed a query and return the top-k closest code units.
    Search {
        query: String,
        #[arg(short, long, default_value_t = 10)]
        k: usize,
        #[arg(long, default_value_t = 0.0)]
        threshold: f32,
    },
    /// Report index freshness and record counts without rebuilding.
    Status,
}

#[tokio::main]
async fn main() -> ProcessExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let root = cli.root.unwrap_or_else(|| PathBuf::from("."));

    let (code, message) = match cli.command {
        Command::Index => run_index(&root).await,
        Command::Search { query, k, threshold } => run_search(&root, &query, k, threshold).await,
        Command::Status => run_status(&root).await,
    };

    match code {
        ExitCode::Ok => println!("{message}"),
        _ => eprintln!("{}", message.red()),
    }
    ProcessExitCode::from(code as u8)
}

fn build_embedding_service(config: &Config) -> EmbeddingService {
    let warm: Arc<dyn EmbeddingProvider> = build_provider(&config.warm);
    let search: Arc<dyn EmbeddingProvider> = build_provider(&config.search);
    EmbeddingService::new(warm, search, config.cache_max_size, config.cache_max_bytes)
}

fn build_provider(block: &gcq::config::ProviderBlock) -> Arc<dyn EmbeddingProvider> {
    match block.provider.as_str() {
        "huggingface" => {
            let base_url = block
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api-inference.huggingface.co".to_string());
            let api_key = block
                .token
                .clone()
                .or_else(|| std::env::var("GCQ_HF_API_KEY").ok())
                .unwrap_or_default();
            Arc::new(HuggingFaceProvider::new(base_url, block.model.clone(), api_key))
        }
        _ => {
            let base_url = block
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434".to_string());
            Arc::new(OllamaProvider::new(base_url, block.model.clone()))
        }
    }
}

async fn probe_dimension(service: &EmbeddingService, token: &CancellationToken) -> Result<usize, CoreError> {
    let vectors = service
        .embed(token, Purpose::Warm, &["gcq dimension probe".to_string()])
        .await?;
    Ok(vectors.first().map(|v| v.len()).unwrap_or(0))
}

async fn run_index(root: &PathBuf) -> (ExitCode, String) {
    let config = gcq::pipeline::load_config(root);
    let service = build_embedding_service(&config);
    let token = CancellationToken::new();

    let dimension = match probe_dimension(&service, &token).await {
        Ok(d) if d > 0 => d,
        Ok(_) => return (ExitCode::ProviderError, "provider returned an empty embedding".to_string()),
        Err(e) => return (classify(&e), e.to_string()),
    };

    let mut indexer = Indexer::new(root.clone(), Arc::new(service), dimension);
    if let Err(e) = indexer.load_dirty_state() {
        return (ExitCode::Corruption, format!("failed to load dirty state: {e}"));
    }

    match indexer.build(&token).await {
        Ok(report) => (
            ExitCode::Ok,
            format!(
                "indexed {} files ({} reindexed, {} units, {} unresolved calls)",
                report.files_seen, report.files_reindexed, report.unit_count, report.unresolved_call_count
            ),
        ),
        Err(e) => (classify(&e), e.to_string()),
    }
}

async fn run_search(root: &PathBuf, query: &str, k: usize, threshold: f32) -> (ExitCode, String) {
    let config = gcq::pipeline::load_config(root);
    let service = build_embedding_service(&config);
    let layout = Layout::new(root);

    let metadata = match IndexMetadata::load(&layout.index_metadata_path()) {
        Ok(m) => m,
        Err(e) => return (ExitCode::NotFound, format!("no index found, run `gcq index` first: {e}")),
    };
    let index: VectorIndex<UnitPayload> = match VectorIndex::load(&layout.vector_index_path()) {
        Ok(i) => i,
        Err(e) => return (ExitCode::Corruption, format!("failed to load index: {e}")),
    };

    let searcher = Searcher {
        index: &index,
        metadata: &metadata,
        embeddings: &service,
    };
    let token = CancellationToken::new();
    match searcher.search(&token, query, k, threshold).await {
        Ok(hits) if hits.is_empty() => (ExitCode::Ok, "no results".to_string()),
        Ok(hits) => {
            let lines: Vec<String> = hits
                .iter()
                .map(|h| format!("{:.3}  {}  {}:{}", h.score, h.payload.qualified_name, h.payload.file, h.payload.line))
                .collect();
            (ExitCode::Ok, lines.join("\n"))
        }
        Err(e) => (classify(&e), e.to_string()),
    }
}

async fn run_status(root: &PathBuf) -> (ExitCode, String) {
    let layout = Layout::new(root);
    match IndexMetadata::load(&layout.index_metadata_path()) {
        Ok(meta) => (
            ExitCode::Ok,
            format!(
                "{} records, model {}, dimension {}, built {}",
                meta.record_count, meta.search.model, meta.dimension, meta.created_at
            ),
        ),
        Err(_) => (ExitCode::NotFound, "no index found, run `gcq index` first".to_string()),
    }
}

fn classify(err: &CoreError) -> ExitCode {
    match err {
        CoreError::InvalidInput(_) => ExitCode::InvalidInput,
        CoreError::NotFound(_) => ExitCode::NotFound,
        CoreError::ProviderUnavailable(_) | CoreError::AuthFailure(_) | CoreError::InvalidModel(_) => {
            ExitCode::ProviderError
        }
        CoreError::DimensionMismatch { .. } | CoreError::Corruption { .. } => ExitCode::Corruption,
        CoreError::Other(_) => ExitCode::ProviderError,
    }
}
