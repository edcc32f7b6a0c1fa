use crate::chunk::{ChunkKind, CodeChunk};
use crate::error::{ChunkModelError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default embedding width when the deployment does not override it
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 768;

/// Maximum entries kept in a per-chunk similar-chunks list
pub const MAX_SIMILAR_CHUNKS: usize = 10;

/// The persisted embedding of one chunk, denormalized for search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingRecord {
    /// Embedding vector; length must equal `dimensions`
    pub vector: Vec<f32>,
    pub dimensions: usize,

    /// Identifier of the model that produced the vector
    pub model: String,
    pub generated_at: DateTime<Utc>,

    // Denormalized copies of the owning chunk, so similarity hits can be
    // ranked without a second lookup.
    pub chunk_id: String,
    pub chunk_name: String,
    pub file_path: String,
    pub kind: ChunkKind,
    pub language: String,
    pub complexity: u8,

    /// Derived searchable text the vector was generated from
    pub search_text: String,
}

impl EmbeddingRecord {
    /// Build a record for `chunk` from an already generated vector.
    pub fn for_chunk(chunk: &CodeChunk, vector: Vec<f32>, model: impl Into<String>) -> Self {
        Self {
            dimensions: vector.len(),
            vector,
            model: model.into(),
            generated_at: Utc::now(),
            chunk_id: chunk.id.clone(),
            chunk_name: chunk.name.clone(),
            file_path: chunk.file_path.clone(),
            kind: chunk.kind,
            language: chunk.language.clone(),
            complexity: chunk.complexity,
            search_text: search_text(chunk),
        }
    }

    /// Check the embedding invariants: a non-empty vector whose length equals
    /// the declared dimension, referencing a chunk id.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_id.trim().is_empty() {
            return Err(ChunkModelError::InvalidEmbedding {
                chunk_id: self.chunk_id.clone(),
                reason: "missing chunk id".to_string(),
            });
        }
        if self.vector.is_empty() {
            return Err(ChunkModelError::InvalidEmbedding {
                chunk_id: self.chunk_id.clone(),
                reason: "empty vector".to_string(),
            });
        }
        if self.vector.len() != self.dimensions {
            return Err(ChunkModelError::InvalidDimension {
                expected: self.dimensions,
                actual: self.vector.len(),
            });
        }
        Ok(())
    }
}

/// Derive the searchable text a chunk is embedded under: name, code, file
/// path, kind, language, parameter names, and dependency sources.
#[must_use]
pub fn search_text(chunk: &CodeChunk) -> String {
    let mut parts: Vec<&str> = vec![
        chunk.name.as_str(),
        chunk.code.as_str(),
        chunk.file_path.as_str(),
        chunk.kind.as_str(),
        chunk.language.as_str(),
    ];
    parts.extend(chunk.parameters.iter().map(|p| p.name.as_str()));
    parts.extend(chunk.dependencies.iter().map(|d| d.source.as_str()));
    parts.join(" ")
}

/// One entry in a chunk's similar-chunks list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarChunk {
    pub chunk_id: String,
    pub similarity: f32,
    pub calculated_at: DateTime<Utc>,
}

impl SimilarChunk {
    pub fn new(chunk_id: impl Into<String>, similarity: f32) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            similarity,
            calculated_at: Utc::now(),
        }
    }
}

/// Insert `entry` into a similar-chunks list, keeping it sorted descending by
/// similarity and truncated to [`MAX_SIMILAR_CHUNKS`]. Equal similarities keep
/// insertion order, so store order stays deterministic on ties.
pub fn insert_similar(list: &mut Vec<SimilarChunk>, entry: SimilarChunk) {
    let at = list
        .iter()
        .position(|existing| existing.similarity < entry.similarity)
        .unwrap_or(list.len());
    list.insert(at, entry);
    list.truncate(MAX_SIMILAR_CHUNKS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Parameter;
    use pretty_assertions::assert_eq;

    fn chunk() -> CodeChunk {
        CodeChunk::new(
            "c1",
            "s1",
            "src/users.ts",
            ChunkKind::Function,
            "getUsers",
            "function getUsers() { return db.users.findAll(); }",
        )
        .language("typescript")
        .add_parameter(Parameter::new("limit", 1))
    }

    #[test]
    fn search_text_concatenates_chunk_fields() {
        let text = search_text(&chunk());
        assert!(text.contains("getUsers"));
        assert!(text.contains("src/users.ts"));
        assert!(text.contains("function"));
        assert!(text.contains("typescript"));
        assert!(text.contains("limit"));
    }

    #[test]
    fn record_carries_denormalized_fields() {
        let c = chunk();
        let record = EmbeddingRecord::for_chunk(&c, vec![0.1, 0.2, 0.3], "test-model");
        assert_eq!(record.dimensions, 3);
        assert_eq!(record.chunk_id, "c1");
        assert_eq!(record.kind, ChunkKind::Function);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn record_rejects_dimension_mismatch() {
        let c = chunk();
        let mut record = EmbeddingRecord::for_chunk(&c, vec![0.1, 0.2], "test-model");
        record.dimensions = 3;
        assert!(matches!(
            record.validate(),
            Err(ChunkModelError::InvalidDimension {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn record_rejects_empty_vector() {
        let c = chunk();
        let record = EmbeddingRecord::for_chunk(&c, vec![], "test-model");
        assert!(record.validate().is_err());
    }

    #[test]
    fn similar_list_stays_sorted_and_bounded() {
        let mut list = Vec::new();
        for i in 0..15 {
            insert_similar(&mut list, SimilarChunk::new(format!("c{i}"), i as f32 / 20.0));
        }

        assert_eq!(list.len(), MAX_SIMILAR_CHUNKS);
        for pair in list.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        // Highest similarity wins the head slot.
        assert_eq!(list[0].chunk_id, "c14");
    }

    #[test]
    fn similar_list_ties_keep_insertion_order() {
        let mut list = Vec::new();
        insert_similar(&mut list, SimilarChunk::new("first", 0.5));
        insert_similar(&mut list, SimilarChunk::new("second", 0.5));
        insert_similar(&mut list, SimilarChunk::new("third", 0.5));

        let ids: Vec<&str> = list.iter().map(|s| s.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
