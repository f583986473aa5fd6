//! Orchestrator tying the walker through persistence together (C1-C13).
//!
//! Indexing data flow: walk -> ignore filter (inside the walker) -> dirty
//! stamp -> parse -> resolve call graph -> assemble units -> render
//! embedding text -> embed (cached) -> insert into the vector index ->
//! write metadata -> flush to disk. Mirrors the teacher's top-level
//! `index_notes`/enumerate-then-process shape in `src/lib.rs`, generalized
//! off the SQL store onto the flat-file components built here.

use crate::callgraph::{self, CrossFileCallGraph};
use crate::config::Config;
use crate::dirty::DirtyTracker;
use crate::embed::service::EmbeddingService;
use crate::embed::Purpose;
use crate::embedtext;
use crate::error::CoreError;
use crate::extractor;
use crate::metadata::{IndexMetadata, ProviderTag};
use crate::model::Module;
use crate::paths::Layout;
use crate::search::UnitPayload;
use crate::unit::{self, CodeUnit};
use crate::vectorindex::{IndexError, VectorIndex};
use crate::walk::{self, WalkOptions};
use chrono::Utc;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct IndexReport {
    pub files_seen: usize,
    pub files_reindexed: usize,
    pub unit_count: usize,
    pub unresolved_call_count: usize,
}

/// Ties every component together for one project root.
pub struct Indexer {
    root: std::path::PathBuf,
    layout: Layout,
    dirty: DirtyTracker,
    embeddings: Arc<EmbeddingService>,
    dimension: usize,
}

impl Indexer {
    pub fn new(root: impl Into<std::path::PathBuf>, embeddings: Arc<EmbeddingService>, dimension: usize) -> Self {
        let root = root.into();
        let layout = Layout::new(&root);
        Self {
            root,
            layout,
            dirty: DirtyTracker::new(),
            embeddings,
            dimension,
        }
    }

    pub fn load_dirty_state(&mut self) -> std::io::Result<()> {
        if self.layout.dirty_state_path().exists() {
            self.dirty = DirtyTracker::load(&self.layout.dirty_state_path())
                .map_err(|e| std::io::Error::other(e.to_string()))?;
        }
        Ok(())
    }

    /// Run a full build pass: walk, stamp dirty state, parse every dirty
    /// file in parallel, resolve the cross-file call graph, assemble units,
    /// embed (cache-aware), and persist the index + metadata + dirty state.
    pub async fn build(&mut self, token: &CancellationToken) -> Result<IndexReport, CoreError> {
        self.layout
            .ensure_dirs()
            .map_err(|e| CoreError::Other(e.into()))?;

        let files = walk::walk(&self.root, WalkOptions::default())
            .map_err(|e| CoreError::Other(e.into()))?;

        let mut dirty_paths = Vec::new();
        for file in &files {
            let is_dirty = self
                .dirty
                .check_and_mark(&file.absolute_path)
                .map_err(|e| CoreError::Other(e.into()))?;
            if is_dirty {
                dirty_paths.push(file.absolute_path.clone());
            }
        }

        // Re-extract every discovered file each pass, not just the dirty
        // ones: call-graph edges to/from an unchanged file still need its
        // definitions in scope. The dirty set only gates re-embedding below.
        let root = self.root.clone();
        let modules: Vec<Module> = files
            .par_iter()
            .filter_map(|file| extractor::extract_file(&root, &file.absolute_path).ok().flatten())
            .collect();

        let graph: CrossFileCallGraph = callgraph::resolve(&modules);
        let units: Vec<CodeUnit> = unit::assemble(&modules, &graph);

        let mut index: VectorIndex<UnitPayload> = if self.layout.vector_index_path().exists() {
            VectorIndex::load(&self.layout.vector_index_path())
                .unwrap_or_else(|_| VectorIndex::new(self.dimension))
        } else {
            VectorIndex::new(self.dimension)
        };

        let texts: Vec<String> = units.iter().map(embedtext::render).collect();
        if !texts.is_empty() {
            let vectors = self.embeddings.embed(token, Purpose::Warm, &texts).await?;
            for (unit, vector) in units.iter().zip(vectors.into_iter()) {
                index
                    .add(unit.key(), vector, UnitPayload::from(unit))
                    .map_err(|e| match e {
                        IndexError::DimensionMismatch { expected, actual } => {
                            CoreError::DimensionMismatch { expected, actual }
                        }
                        other => CoreError::Other(anyhow::anyhow!(other)),
                    })?;
            }
        }

        index
            .save(&self.layout.vector_index_path())
            .map_err(|e| CoreError::Other(anyhow::anyhow!(e)))?;

        let metadata = IndexMetadata {
            model: self.embeddings.search_model().to_string(),
            provider_endpoint: self.root.to_string_lossy().to_string(),
            dimension: index.dimension(),
            record_count: index.count(),
            created_at: Utc::now(),
            warm: ProviderTag {
                provider: self.embeddings.warm_provider_name().to_string(),
                model: self.embeddings.search_model().to_string(),
            },
            search: ProviderTag {
                provider: self.embeddings.search_provider_name().to_string(),
                model: self.embeddings.search_model().to_string(),
            },
        };
        metadata
            .save(&self.layout.index_metadata_path())
            .map_err(|e| CoreError::Other(e.into()))?;

        self.dirty
            .save(&self.layout.dirty_state_path())
            .map_err(|e| CoreError::Other(e.into()))?;
        self.dirty.clear_dirty();

        Ok(IndexReport {
            files_seen: files.len(),
            files_reindexed: dirty_paths.len(),
            unit_count: units.len(),
            unresolved_call_count: graph.unresolved.len(),
        })
    }
}

/// Load the config for `root`, falling back to defaults when absent.
pub fn load_config(root: &Path) -> Config {
    Config::load(root, dirs::home_dir().as_deref()).unwrap_or_default()
}
