use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Statistics about one indexing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Chunks stored
    pub chunks: usize,

    /// Distinct files those chunks came from
    pub files: usize,

    /// Embedding batches sent to the provider
    pub batches: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Errors encountered (indexing continues past them)
    pub errors: Vec<String>,

    #[serde(skip)]
    seen_files: HashSet<String>,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chunk(&mut self, file_path: &str) {
        self.chunks += 1;
        if self.seen_files.insert(file_path.to_string()) {
            self.files += 1;
        }
    }

    pub fn add_batch(&mut self) {
        self.batches += 1;
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}
