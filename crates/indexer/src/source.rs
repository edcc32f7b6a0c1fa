use crate::error::Result;
use async_trait::async_trait;
use recast_chunk_model::CodeChunk;
use std::path::PathBuf;

/// The ingestion collaborator: something that yields extracted chunk records.
///
/// Implementations own the parsing; the indexer only validates, embeds and
/// stores what they produce.
#[async_trait]
pub trait ChunkSource: Send + Sync {
    /// Label used in logs and stats
    fn name(&self) -> &str;

    /// Produce every chunk to index. May perform I/O.
    async fn scan(&self) -> Result<Vec<CodeChunk>>;
}

/// Chunk source backed by a JSON dump file: an array of chunk records in the
/// wire format.
pub struct JsonChunkSource {
    path: PathBuf,
}

impl JsonChunkSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ChunkSource for JsonChunkSource {
    fn name(&self) -> &str {
        "json-dump"
    }

    async fn scan(&self) -> Result<Vec<CodeChunk>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let chunks: Vec<CodeChunk> = serde_json::from_str(&raw)?;
        log::info!(
            "Loaded {} chunks from {}",
            chunks.len(),
            self.path.display()
        );
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_chunk_model::ChunkKind;

    #[tokio::test]
    async fn json_source_round_trips_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks.json");

        let chunks = vec![CodeChunk::new(
            "c1",
            "s1",
            "src/app.ts",
            ChunkKind::Function,
            "main",
            "function main() {}",
        )];
        std::fs::write(&path, serde_json::to_string(&chunks).unwrap()).unwrap();

        let source = JsonChunkSource::new(&path);
        let loaded = source.scan().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c1");
    }
}
