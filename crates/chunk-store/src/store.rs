use crate::error::Result;
use crate::indexed::IndexedStore;
use crate::scan::ScanStore;
use crate::vector_index::VectorIndex;
use async_trait::async_trait;
use recast_chunk_model::{ChunkKind, CodeChunk, EmbeddingRecord, SimilarChunk};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Which backend a store instance runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Per-session vector index answers similarity queries
    Indexed,
    /// Candidates are fetched and cosine-scored locally
    Scan,
}

/// Store construction options
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// JSON persistence path; in-memory only when absent
    pub path: Option<PathBuf>,

    /// Force the scan fallback even when the index probe passes
    pub disable_index: bool,
}

/// A similarity query against one session
#[derive(Debug, Clone)]
pub struct SimilarQuery {
    /// Minimum similarity; exactly-threshold matches are kept
    pub threshold: f32,
    pub limit: usize,
    pub chunk_kind: Option<ChunkKind>,
    pub language: Option<String>,
    pub exclude_chunk_id: Option<String>,
}

impl Default for SimilarQuery {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            limit: 20,
            chunk_kind: None,
            language: None,
            exclude_chunk_id: None,
        }
    }
}

/// One similarity match
#[derive(Debug, Clone)]
pub struct SimilarityHit {
    pub chunk: CodeChunk,
    pub similarity: f32,
}

/// Filtered chunk search
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub kind: Option<ChunkKind>,
    pub language: Option<String>,
    pub complexity_min: Option<u8>,
    pub complexity_max: Option<u8>,
    pub is_async: Option<bool>,
    pub path_contains: Option<String>,

    /// Free-text query; when present, results are ordered by textual
    /// relevance instead of creation time
    pub query: Option<String>,

    pub offset: usize,
    pub limit: Option<usize>,
}

/// Aggregate statistics over one session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    pub total_chunks: usize,
    pub total_files: usize,
    pub average_complexity: f64,
    pub async_chunks: usize,
    pub by_type: HashMap<String, usize>,
    pub by_language: HashMap<String, usize>,
    pub by_file: HashMap<String, usize>,
}

/// Adapter contract consumed by the migration core.
///
/// Implementations share these semantics: inserts validate the chunk and
/// embedding invariants before committing; `find_similar` keeps ties in
/// store-insertion order; wrong-dimension query vectors score zero.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn insert(&self, chunk: CodeChunk, embedding: Option<EmbeddingRecord>) -> Result<()>;

    async fn insert_many(
        &self,
        chunks: Vec<(CodeChunk, Option<EmbeddingRecord>)>,
    ) -> Result<usize>;

    async fn get_chunks_by_session(&self, session_id: &str) -> Result<Vec<CodeChunk>>;

    async fn count_by_session(&self, session_id: &str) -> Result<usize>;

    async fn project_statistics(&self, session_id: &str) -> Result<ProjectStatistics>;

    async fn find_similar(
        &self,
        session_id: &str,
        vector: &[f32],
        query: &SimilarQuery,
    ) -> Result<Vec<SimilarityHit>>;

    async fn search_chunks(
        &self,
        session_id: &str,
        criteria: &SearchCriteria,
    ) -> Result<Vec<CodeChunk>>;

    async fn update_similar_chunks(
        &self,
        session_id: &str,
        chunk_id: &str,
        similar: Vec<SimilarChunk>,
    ) -> Result<()>;

    async fn delete_by_session(&self, session_id: &str) -> Result<usize>;

    /// Flush to the configured persistence path, if any
    async fn save(&self) -> Result<()>;

    fn backend(&self) -> StoreBackend;
}

/// Open a store, selecting the backend by feature detection: the vector
/// index is probed with a tiny self-check query, and failures (or an
/// explicit disable) fall back to the local-scan variant.
pub async fn connect(config: StoreConfig) -> Result<Arc<dyn ChunkStore>> {
    if config.disable_index {
        log::info!("Vector index disabled, using scan store");
        return Ok(Arc::new(ScanStore::open(config.path).await?));
    }

    match VectorIndex::probe() {
        Ok(()) => {
            log::info!("Vector index probe passed, using indexed store");
            Ok(Arc::new(IndexedStore::open(config.path).await?))
        }
        Err(err) => {
            log::warn!("Vector index probe failed, falling back to scan store: {err}");
            Ok(Arc::new(ScanStore::open(config.path).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_prefers_indexed_backend() {
        let store = connect(StoreConfig::default()).await.unwrap();
        assert_eq!(store.backend(), StoreBackend::Indexed);
    }

    #[tokio::test]
    async fn connect_honours_disable_flag() {
        let config = StoreConfig {
            disable_index: true,
            ..StoreConfig::default()
        };
        let store = connect(config).await.unwrap();
        assert_eq!(store.backend(), StoreBackend::Scan);
    }
}
