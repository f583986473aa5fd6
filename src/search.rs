//! Searcher (spec §4.8, C11): embed query, check compatibility, top-k, enrich.

use crate::embed::service::EmbeddingService;
use crate::embed::Purpose;
use crate::error::CoreError;
use crate::metadata::IndexMetadata;
use crate::unit::CodeUnit;
use crate::vectorindex::{IndexError, VectorIndex};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Prefixed onto every search query before embedding, matching the
/// asymmetric instruction-tuned embedding convention (distinct from how
/// code units themselves are rendered for indexing).
const QUERY_INSTRUCTION_PREFIX: &str = "Given a codebase, find code that: ";

/// Trimmed copy of a [`CodeUnit`] stored alongside its vector, sufficient to
/// reconstruct a search hit without re-reading the source tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitPayload {
    pub qualified_name: String,
    pub kind: String,
    pub file: String,
    pub line: u32,
    pub signature: String,
    pub docstring: String,
}

impl From<&CodeUnit> for UnitPayload {
    fn from(unit: &CodeUnit) -> Self {
        Self {
            qualified_name: unit.qualified_name.clone(),
            kind: unit.kind.as_str().to_string(),
            file: unit.file.to_string_lossy().to_string(),
            line: unit.line,
            signature: unit.signature.clone(),
            docstring: unit.docstring.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub unit_id: String,
    pub score: f32,
    pub payload: UnitPayload,
}

/// Truncate or zero-pad `vector` to exactly `dimension` entries.
fn resize_to(mut vector: Vec<f32>, dimension: usize) -> Vec<f32> {
    vector.resize(dimension, 0.0);
    vector
}

pub struct Searcher<'a> {
    pub index: &'a VectorIndex<UnitPayload>,
    pub metadata: &'a IndexMetadata,
    pub embeddings: &'a EmbeddingService,
}

impl<'a> Searcher<'a> {
    /// Embed `query`, verify it's dimension/model-compatible with the
    /// stored index, run top-k, and filter by `threshold` (inclusive).
    pub async fn search(
        &self,
        token: &CancellationToken,
        query: &str,
        k: usize,
        threshold: f32,
    ) -> Result<Vec<SearchHit>, CoreError> {
        if query.trim().is_empty() {
            return Err(CoreError::invalid_input("empty query"));
        }
        if k == 0 {
            return Err(CoreError::invalid_input("k must be positive"));
        }

        let prefixed = format!("{QUERY_INSTRUCTION_PREFIX}{query}");
        let vectors = self
            .embeddings
            .embed(token, Purpose::Search, &[prefixed])
            .await?;
        let query_vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::invalid_input("embedding returned no vector"))?;

        // Both sides always report a concrete dimension/model/provider here
        // (the provider just returned the vector, the index always knows its
        // own), so an incompatibility is non-fatal: warn and proceed with a
        // resized vector rather than rejecting the query outright.
        let compatible = self.metadata.is_compatible_with(
            query_vector.len(),
            self.embeddings.search_model(),
            self.embeddings.search_provider_name(),
        );
        let query_vector = if !compatible {
            tracing::warn!(
                expected = self.metadata.dimension,
                actual = query_vector.len(),
                "search provider/model/dimension incompatible with stored index, results may be degraded"
            );
            resize_to(query_vector, self.metadata.dimension)
        } else {
            query_vector
        };

        let results = self.index.search(&query_vector, k).map_err(|e| match e {
            IndexError::DimensionMismatch { expected, actual } => {
                CoreError::DimensionMismatch { expected, actual }
            }
            other => CoreError::Other(anyhow::anyhow!(other)),
        })?;

        Ok(results
            .into_iter()
            .filter(|r| r.score >= threshold)
            .map(|r| SearchHit {
                unit_id: r.unit_id,
                score: r.score,
                payload: r.payload,
            })
            .collect())
    }
}
