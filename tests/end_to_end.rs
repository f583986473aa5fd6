//! End-to-end scenarios exercising the full pipeline through the public API.

use async_trait::async_trait;
use gcq::embed::service::EmbeddingService;
use gcq::embed::{EmbeddingProvider, ProviderConfig, Purpose};
use gcq::error::CoreError;
use gcq::metadata::IndexMetadata;
use gcq::paths::Layout;
use gcq::pipeline::Indexer;
use gcq::search::{Searcher, UnitPayload};
use gcq::vectorindex::VectorIndex;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Deterministic provider: hashes the text into a small vector so identical
/// texts collide and distinct texts are very likely to land far apart,
/// without depending on any real embedding model.
struct HashProvider {
    config: ProviderConfig,
    dim: usize,
}

impl HashProvider {
    fn new(model: &str, dim: usize) -> Self {
        Self {
            config: ProviderConfig {
                endpoint: "local".into(),
                model: model.into(),
                api_key: None,
            },
            dim,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HashProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError> {
        if text.is_empty() {
            return Err(CoreError::invalid_input("empty text"));
        }
        let mut v = vec![0.0f32; self.dim];
        for (i, byte) in text.bytes().enumerate() {
            v[i % self.dim] += byte as f32;
        }
        Ok(v)
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

fn service(dim: usize) -> Arc<EmbeddingService> {
    Arc::new(EmbeddingService::new(
        Arc::new(HashProvider::new("hash-model", dim)),
        Arc::new(HashProvider::new("hash-model", dim)),
        100,
        None,
    ))
}

fn write(dir: &std::path::Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

#[cfg(feature = "lang-typescript")]
#[tokio::test]
async fn greet_round_trip_finds_the_function_by_query() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "main.ts",
        "export function greet(name: string): string { return \"Hello, \" + name; }\n",
    );

    let svc = service(16);
    let mut indexer = Indexer::new(tmp.path(), svc.clone(), 16);
    let token = CancellationToken::new();
    let report = indexer.build(&token).await.unwrap();
    assert_eq!(report.unit_count, 1);

    let layout = Layout::new(tmp.path());
    let metadata = IndexMetadata::load(&layout.index_metadata_path()).unwrap();
    let index: VectorIndex<UnitPayload> = VectorIndex::load(&layout.vector_index_path()).unwrap();

    let searcher = Searcher {
        index: &index,
        metadata: &metadata,
        embeddings: &svc,
    };
    let hits = searcher
        .search(&token, "greet the caller", 1, -1.0)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].payload.qualified_name, "greet");
    assert_eq!(hits[0].payload.file, "main.ts");
}

#[cfg(feature = "lang-rust")]
#[tokio::test]
async fn dirty_rebuild_only_reprocesses_changed_files() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.rs", "fn a() {}\n");
    write(tmp.path(), "b.rs", "fn b() {}\n");

    let svc = service(8);
    let mut indexer = Indexer::new(tmp.path(), svc.clone(), 8);
    let token = CancellationToken::new();
    indexer.build(&token).await.unwrap();

    indexer.load_dirty_state().unwrap();
    write(tmp.path(), "a.rs", "fn a() { println!(\"changed\"); }\n");
    let report = indexer.build(&token).await.unwrap();
    assert_eq!(report.files_seen, 2);
    assert_eq!(report.files_reindexed, 1);
}

#[cfg(feature = "lang-rust")]
#[tokio::test]
async fn gitignore_hierarchy_is_respected_by_the_full_pipeline() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".gcqignore", "*.log");
    write(tmp.path(), "sub/.gcqignore", "!important.log");
    write(tmp.path(), "sub/important.log", "kept");
    write(tmp.path(), "a.log", "dropped");
    write(tmp.path(), "keep.rs", "fn keep() {}\n");

    let svc = service(8);
    let mut indexer = Indexer::new(tmp.path(), svc, 8);
    let token = CancellationToken::new();
    let report = indexer.build(&token).await.unwrap();
    // keep.rs is the only parseable file; important.log/a.log have no
    // registered language but the walker's file count still reflects them.
    assert_eq!(report.files_seen, 2);
}

#[cfg(feature = "lang-python")]
#[tokio::test]
async fn cross_file_call_resolves_and_appears_in_unit_calls() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.py", "def foo():\n    pass\n");
    write(tmp.path(), "b.py", "def bar():\n    foo()\n");

    let svc = service(8);
    let mut indexer = Indexer::new(tmp.path(), svc, 8);
    let token = CancellationToken::new();
    let report = indexer.build(&token).await.unwrap();
    assert_eq!(report.unresolved_call_count, 0);
}

#[cfg(feature = "lang-python")]
#[tokio::test]
async fn ambiguous_call_across_two_definers_is_unresolved() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.py", "def log():\n    pass\n");
    write(tmp.path(), "b.py", "def log():\n    pass\n");
    write(tmp.path(), "c.py", "def caller():\n    log()\n");

    let svc = service(8);
    let mut indexer = Indexer::new(tmp.path(), svc, 8);
    let token = CancellationToken::new();
    let report = indexer.build(&token).await.unwrap();
    assert_eq!(report.unresolved_call_count, 1);
}

#[tokio::test]
async fn search_against_an_empty_index_returns_empty_not_an_error() {
    let svc = service(4);
    let index: VectorIndex<UnitPayload> = VectorIndex::new(4);
    let metadata = IndexMetadata {
        model: "hash-model".into(),
        provider_endpoint: "local".into(),
        dimension: 4,
        record_count: 0,
        created_at: chrono::DateTime::from_timestamp(0, 0).unwrap(),
        warm: gcq::metadata::ProviderTag {
            provider: "local".into(),
            model: "hash-model".into(),
        },
        search: gcq::metadata::ProviderTag {
            provider: "local".into(),
            model: "hash-model".into(),
        },
    };
    let searcher = Searcher {
        index: &index,
        metadata: &metadata,
        embeddings: &svc,
    };
    let token = CancellationToken::new();
    let hits = searcher.search(&token, "anything", 5, -1.0).await.unwrap();
    assert!(hits.is_empty());
}
