use crate::error::Result;
use crate::source::ChunkSource;
use crate::stats::IndexStats;
use futures::future::join_all;
use recast_chunk_model::{search_text, CodeChunk, EmbeddingRecord, SimilarChunk};
use recast_chunk_store::{ChunkStore, SimilarQuery};
use recast_providers::EmbeddingProvider;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Batch behavior of the embedding pipeline
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Chunks embedded concurrently per batch
    pub batch_size: usize,

    /// Pause between batches, to stay inside provider rate limits
    pub delay_between_batches: Duration,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            delay_between_batches: Duration::from_millis(500),
        }
    }
}

/// Embeds chunk records and maintains the store's derived state.
pub struct EmbeddingIndexer {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ChunkStore>,
    config: IndexerConfig,
}

impl EmbeddingIndexer {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn ChunkStore>) -> Self {
        Self {
            embedder,
            store,
            config: IndexerConfig::default(),
        }
    }

    /// Builder: override batch behavior
    #[must_use]
    pub fn config(mut self, config: IndexerConfig) -> Self {
        self.config = config;
        self
    }

    /// Index everything the source yields. Per-chunk failures are recorded in
    /// the stats and skipped; the run keeps going.
    pub async fn index(&self, source: &dyn ChunkSource) -> Result<IndexStats> {
        let started = Instant::now();
        let mut stats = IndexStats::new();

        let chunks = source.scan().await?;
        log::info!(
            "Indexing {} chunks from source '{}'",
            chunks.len(),
            source.name()
        );

        let batch_size = self.config.batch_size.max(1);
        let total_batches = chunks.len().div_ceil(batch_size);
        let mut session_ids: Vec<String> = Vec::new();

        for (batch_idx, batch) in chunks.chunks(batch_size).enumerate() {
            self.index_batch(batch, &mut stats).await;
            stats.add_batch();

            for chunk in batch {
                if !session_ids.contains(&chunk.session_id) {
                    session_ids.push(chunk.session_id.clone());
                }
            }

            if batch_idx + 1 < total_batches {
                tokio::time::sleep(self.config.delay_between_batches).await;
            }
        }

        for session_id in &session_ids {
            if let Err(err) = self.refresh_similar_chunks(session_id).await {
                stats.add_error(format!("similar-chunks refresh for '{session_id}': {err}"));
            }
        }

        stats.time_ms = started.elapsed().as_millis() as u64;
        log::info!(
            "Indexed {} chunks in {} batches ({} ms, {} errors)",
            stats.chunks,
            stats.batches,
            stats.time_ms,
            stats.errors.len()
        );
        Ok(stats)
    }

    /// Embed one batch concurrently and insert the results.
    async fn index_batch(&self, batch: &[CodeChunk], stats: &mut IndexStats) {
        let embeds = batch.iter().map(|chunk| {
            let text = search_text(chunk);
            async move { self.embedder.embed(&text).await }
        });
        let responses = join_all(embeds).await;

        for (chunk, response) in batch.iter().zip(responses) {
            if let Err(err) = chunk.validate() {
                stats.add_error(format!("chunk '{}': {err}", chunk.id));
                continue;
            }

            let embedding = match response {
                Ok(response) => Some(EmbeddingRecord::for_chunk(
                    chunk,
                    response.vector,
                    response.model,
                )),
                Err(err) => {
                    // Store the chunk anyway; a later pass can re-embed it.
                    log::warn!("Embedding failed for chunk '{}': {err}", chunk.id);
                    stats.add_error(format!("embed '{}': {err}", chunk.id));
                    None
                }
            };

            match self.store.insert(chunk.clone(), embedding).await {
                Ok(()) => stats.add_chunk(&chunk.file_path),
                Err(err) => stats.add_error(format!("insert '{}': {err}", chunk.id)),
            }
        }
    }

    /// Recompute each chunk's top-10 similar-chunks list from the stored
    /// embeddings of its session.
    async fn refresh_similar_chunks(&self, session_id: &str) -> Result<()> {
        let chunks = self.store.get_chunks_by_session(session_id).await?;

        for chunk in &chunks {
            let text = search_text(chunk);
            let response = match self.embedder.embed(&text).await {
                Ok(response) => response,
                Err(err) => {
                    log::warn!("Skipping similar-chunks for '{}': {err}", chunk.id);
                    continue;
                }
            };

            let query = SimilarQuery {
                threshold: 0.0,
                limit: recast_chunk_model::MAX_SIMILAR_CHUNKS,
                exclude_chunk_id: Some(chunk.id.clone()),
                ..SimilarQuery::default()
            };
            let hits = self
                .store
                .find_similar(session_id, &response.vector, &query)
                .await?;

            let similar: Vec<SimilarChunk> = hits
                .into_iter()
                .map(|hit| SimilarChunk::new(hit.chunk.id, hit.similarity.clamp(0.0, 1.0)))
                .collect();
            self.store
                .update_similar_chunks(session_id, &chunk.id, similar)
                .await?;
        }

        Ok(())
    }
}
