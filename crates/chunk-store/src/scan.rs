use crate::error::Result;
use crate::sessions::SessionMap;
use crate::similarity::cosine_similarity;
use crate::store::{
    ChunkStore, ProjectStatistics, SearchCriteria, SimilarQuery, SimilarityHit, StoreBackend,
};
use async_trait::async_trait;
use recast_chunk_model::{CodeChunk, EmbeddingRecord, SimilarChunk};
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Fallback store variant: similarity queries fetch the session's candidates
/// and cosine-score them locally.
pub struct ScanStore {
    data: RwLock<SessionMap>,
    path: Option<PathBuf>,
}

impl ScanStore {
    pub async fn open(path: Option<PathBuf>) -> Result<Self> {
        let data = match &path {
            Some(p) if p.exists() => {
                log::info!("Loading scan store from {}", p.display());
                let raw = tokio::fs::read_to_string(p).await?;
                serde_json::from_str(&raw)?
            }
            _ => SessionMap::default(),
        };
        Ok(Self {
            data: RwLock::new(data),
            path,
        })
    }
}

#[async_trait]
impl ChunkStore for ScanStore {
    async fn insert(&self, chunk: CodeChunk, embedding: Option<EmbeddingRecord>) -> Result<()> {
        self.data.write().await.insert(chunk, embedding)
    }

    async fn insert_many(
        &self,
        chunks: Vec<(CodeChunk, Option<EmbeddingRecord>)>,
    ) -> Result<usize> {
        let mut data = self.data.write().await;
        let mut inserted = 0;
        for (chunk, embedding) in chunks {
            data.insert(chunk, embedding)?;
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
        let data = self.data.read().await;

        let mut hits: Vec<SimilarityHit> = data
            .stored_for(session_id)
            .iter()
            .filter(|stored| {
                query
                    .chunk_kind
                    .is_none_or(|kind| stored.chunk.kind == kind)
                    && query
                        .language
                        .as_deref()
                        .is_none_or(|lang| stored.chunk.language.eq_ignore_ascii_case(lang))
                    && query
                        .exclude_chunk_id
                        .as_deref()
                        .is_none_or(|id| stored.chunk.id != id)
            })
            .filter_map(|stored| {
                let record = stored.embedding.as_ref()?;
                let similarity = cosine_similarity(vector, &record.vector);
                (similarity >= query.threshold).then(|| SimilarityHit {
                    chunk: stored.chunk.clone(),
                    similarity,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(query.limit);

        log::debug!(
            "Scan store: {} hits for session '{session_id}' (threshold {})",
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
        Ok(self.data.write().await.delete(session_id))
    }

    async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = self.data.read().await;
        let raw = serde_json::to_string_pretty(&*data)?;
        tokio::fs::write(path, raw).await?;
        log::info!("Scan store saved to {}", path.display());
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Scan
    }
}
