use recast_chunk_model::{ChunkKind, CodeChunk};
use serde::Serialize;

/// Knobs recognized by [`RetrievalEngine::retrieve`](crate::RetrievalEngine::retrieve)
#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    /// Minimum cosine similarity for candidates
    pub threshold: f32,

    /// Maximum chunks returned
    pub limit: usize,

    /// Restrict candidates to these kinds
    pub chunk_types: Vec<ChunkKind>,

    /// Restrict candidates to these languages
    pub languages: Vec<String>,

    /// Pull in chunks the winners reference by name
    pub include_dependencies: bool,

    /// Pull in chunks from files the winners import
    pub include_related_files: bool,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            limit: 20,
            chunk_types: Vec::new(),
            languages: Vec::new(),
            include_dependencies: true,
            include_related_files: true,
        }
    }
}

/// File-level context attached to each retrieved chunk
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkContext {
    pub file_name: String,
    pub file_path: String,
    pub file_ext: String,
    pub directory: String,
}

impl ChunkContext {
    #[must_use]
    pub fn for_chunk(chunk: &CodeChunk) -> Self {
        Self {
            file_name: chunk.file_name.clone(),
            file_path: chunk.file_path.clone(),
            file_ext: chunk.file_ext.clone(),
            directory: chunk.directory().to_string(),
        }
    }
}

/// One ranked retrieval result
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk: CodeChunk,

    /// Raw cosine similarity against the query embedding
    pub similarity: f32,

    /// Re-ranked score (cosine + lexical + structural bonuses)
    pub score: f32,

    pub context: ChunkContext,

    /// How migration-worthy this chunk looks, in [0, 1]
    pub migration_relevance: f32,
}

/// What the engine did to answer a query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalMetadata {
    pub expanded_command: String,
    pub candidates_considered: usize,
    pub threshold: f32,
    pub limit: usize,
}
