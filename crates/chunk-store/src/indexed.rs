use crate::error::Result;
use crate::sessions::SessionMap;
use crate::store::{
    ChunkStore, ProjectStatistics, SearchCriteria, SimilarQuery, SimilarityHit, StoreBackend,
};
use crate::vector_index::VectorIndex;
use async_trait::async_trait;
use recast_chunk_model::{CodeChunk, EmbeddingRecord, SimilarChunk};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Primary store variant: each session keeps a vector index and similarity
/// queries are answered by the index, not by scanning chunk records.
pub struct IndexedStore {
    data: RwLock<SessionMap>,
    indexes: RwLock<HashMap<String, VectorIndex>>,
    path: Option<PathBuf>,
}

impl IndexedStore {
    pub async fn open(path: Option<PathBuf>) -> Result<Self> {
        let data = match &path {
            Some(p) if p.exists() => {
                log::info!("Loading indexed store from {}", p.display());
                let raw = tokio::fs::read_to_string(p).await?;
                serde_json::from_str::<SessionMap>(&raw)?
            }
            _ => SessionMap::default(),
        };

        let store = Self {
            data: RwLock::new(data),
            indexes: RwLock::new(HashMap::new()),
            path,
        };
        store.rebuild_indexes().await?;
        Ok(store)
    }

    /// Rebuild every per-session index from the persisted embeddings.
    async fn rebuild_indexes(&self) -> Result<()> {
        let data = self.data.read().await;
        let mut indexes = self.indexes.write().await;
        indexes.clear();

        for session_id in data.session_ids() {
            for stored in data.stored_for(&session_id) {
                let Some(record) = &stored.embedding else {
                    continue;
                };
                indexes
                    .entry(session_id.clone())
                    .or_insert_with(|| VectorIndex::new(record.dimensions))
                    .add(stored.chunk.id.clone(), &record.vector)?;
            }
        }

        let total: usize = indexes.values().map(VectorIndex::len).sum();
        if total > 0 {
            log::info!("Rebuilt {} vector index entries", total);
        }
        Ok(())
    }

    async fn index_vector(&self, session_id: &str, chunk_id: &str, record: &EmbeddingRecord) -> Result<()> {
        let mut indexes = self.indexes.write().await;
        indexes
            .entry(session_id.to_string())
            .or_insert_with(|| VectorIndex::new(record.dimensions))
            .add(chunk_id, &record.vector)
    }
}

#[async_trait]
impl ChunkStore for IndexedStore {
    async fn insert(&self, chunk: CodeChunk, embedding: Option<EmbeddingRecord>) -> Result<()> {
        let session_id = chunk.session_id.clone();
        let chunk_id = chunk.id.clone();
        self.data.write().await.insert(chunk, embedding.clone())?;
        if let Some(record) = embedding {
            self.index_vector(&session_id, &chunk_id, &record).await?;
        }
        Ok(())
    }

    async fn insert_many(
        &self,
        chunks: Vec<(CodeChunk, Option<EmbeddingRecord>)>,
    ) -> Result<usize> {
        let mut inserted = 0;
        for (chunk, embedding) in chunks {
            self.insert(chunk, embedding).await?;
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn get_chunks_by_session(&self, session_id: &str) -> Result<Vec<CodeChunk>> {
        Ok(self.data.read().await.chunks_for(session_id))
    }

    async fn count_by_session(&self, session_id: &str) -> Result<usize> {
        Ok(self.data.read().await.count(session_id))
    }

    async fn project_statistics(&self, session_id: &str) -> Result<ProjectStatistics> {
        Ok(self.data.read().await.statistics(session_id))
    }

    async fn find_similar(
        &self,
        session_id: &str,
        vector: &[f32],
        query: &SimilarQuery,
    ) -> Result<Vec<SimilarityHit>> {
        let indexes = self.indexes.read().await;
        let Some(index) = indexes.get(session_id) else {
            return Ok(Vec::new());
        };

        let scored: Vec<(String, f32)> = index
            .search(vector)
            .into_iter()
            .filter(|(_, similarity)| *similarity >= query.threshold)
            .map(|(id, similarity)| (id.to_string(), similarity))
            .collect();
        drop(indexes);

        let data = self.data.read().await;
        let by_id: HashMap<&str, &CodeChunk> = data
            .stored_for(session_id)
            .iter()
            .map(|s| (s.chunk.id.as_str(), &s.chunk))
            .collect();

        let mut hits = Vec::new();
        for (chunk_id, similarity) in scored {
            if hits.len() >= query.limit {
                break;
            }
            let Some(chunk) = by_id.get(chunk_id.as_str()) else {
                continue;
            };
            if query.chunk_kind.is_some_and(|kind| chunk.kind != kind) {
                continue;
            }
            if query
                .language
                .as_deref()
                .is_some_and(|lang| !chunk.language.eq_ignore_ascii_case(lang))
            {
                continue;
            }
            if query
                .exclude_chunk_id
                .as_deref()
                .is_some_and(|id| chunk.id == id)
            {
                continue;
            }
            hits.push(SimilarityHit {
                chunk: (*chunk).clone(),
                similarity,
            });
        }

        log::debug!(
            "Indexed store: {} hits for session '{session_id}' (threshold {})",
            hits.len(),
            query.threshold
        );
        Ok(hits)
    }

    async fn search_chunks(
        &self,
        session_id: &str,
        criteria: &SearchCriteria,
    ) -> Result<Vec<CodeChunk>> {
        Ok(self.data.read().await.search(session_id, criteria))
    }

    async fn update_similar_chunks(
        &self,
        session_id: &str,
        chunk_id: &str,
        similar: Vec<SimilarChunk>,
    ) -> Result<()> {
        self.data
            .write()
            .await
            .update_similar(session_id, chunk_id, similar)
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<usize> {
        let removed = self.data.write().await.delete(session_id);
        self.indexes.write().await.remove(session_id);
        Ok(removed)
    }

    async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = self.data.read().await;
        let raw = serde_json::to_string_pretty(&*data)?;
        tokio::fs::write(path, raw).await?;
        log::info!("Indexed store saved to {}", path.display());
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Indexed
    }
}
