use crate::error::{Result, StoreError};
use crate::store::{ProjectStatistics, SearchCriteria};
use recast_chunk_model::{insert_similar, search_text, CodeChunk, EmbeddingRecord, SimilarChunk};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A chunk together with its embedding, as persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredChunk {
    pub chunk: CodeChunk,
    pub embedding: Option<EmbeddingRecord>,
}

/// In-memory session data shared by both store variants. Vectors keep
/// insertion order, which is the tie-break order for every query.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SessionMap {
    sessions: HashMap<String, Vec<StoredChunk>>,
}

impl SessionMap {
    pub fn insert(&mut self, chunk: CodeChunk, embedding: Option<EmbeddingRecord>) -> Result<()> {
        chunk.validate()?;
        if let Some(record) = &embedding {
            record.validate()?;
            if record.chunk_id != chunk.id {
                return Err(StoreError::Consistency(format!(
                    "embedding references chunk '{}' but is stored with chunk '{}'",
                    record.chunk_id, chunk.id
                )));
            }
        }
        if self.contains_id(&chunk.id) {
            return Err(StoreError::Consistency(format!(
                "duplicate chunk id '{}'",
                chunk.id
            )));
        }

        self.sessions
            .entry(chunk.session_id.clone())
            .or_default()
            .push(StoredChunk { chunk, embedding });
        Ok(())
    }

    fn contains_id(&self, id: &str) -> bool {
        self.sessions
            .values()
            .any(|stored| stored.iter().any(|s| s.chunk.id == id))
    }

    pub fn stored_for(&self, session_id: &str) -> &[StoredChunk] {
        self.sessions.get(session_id).map_or(&[], Vec::as_slice)
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.keys().cloned().collect()
    }

    pub fn chunks_for(&self, session_id: &str) -> Vec<CodeChunk> {
        self.stored_for(session_id)
            .iter()
            .map(|s| s.chunk.clone())
            .collect()
    }

    pub fn count(&self, session_id: &str) -> usize {
        self.stored_for(session_id).len()
    }

    pub fn statistics(&self, session_id: &str) -> ProjectStatistics {
        let stored = self.stored_for(session_id);

        let mut by_type = HashMap::new();
        let mut by_language = HashMap::new();
        let mut by_file = HashMap::new();
        let mut files = HashSet::new();
        let mut complexity_sum = 0usize;
        let mut async_chunks = 0usize;

        for s in stored {
            *by_type.entry(s.chunk.kind.as_str().to_string()).or_insert(0) += 1;
            *by_language.entry(s.chunk.language.clone()).or_insert(0) += 1;
            *by_file.entry(s.chunk.file_path.clone()).or_insert(0) += 1;
            files.insert(s.chunk.file_path.as_str());
            complexity_sum += s.chunk.complexity as usize;
            if s.chunk.is_async {
                async_chunks += 1;
            }
        }

        let total_chunks = stored.len();
        let average_complexity = if total_chunks == 0 {
            0.0
        } else {
            complexity_sum as f64 / total_chunks as f64
        };

        ProjectStatistics {
            total_chunks,
            total_files: files.len(),
            average_complexity,
            async_chunks,
            by_type,
            by_language,
            by_file,
        }
    }

    pub fn search(&self, session_id: &str, criteria: &SearchCriteria) -> Vec<CodeChunk> {
        let mut matches: Vec<&StoredChunk> = self
            .stored_for(session_id)
            .iter()
            .filter(|s| matches_criteria(&s.chunk, criteria))
            .collect();

        if let Some(query) = criteria.query.as_deref().filter(|q| !q.trim().is_empty()) {
            let tokens: Vec<String> = query
                .split_whitespace()
                .map(str::to_lowercase)
                .collect();
            let mut scored: Vec<(&StoredChunk, usize)> = matches
                .into_iter()
                .map(|s| (s, relevance(s, &tokens)))
                .collect();
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            matches = scored.into_iter().map(|(s, _)| s).collect();
        } else {
            matches.sort_by(|a, b| b.chunk.created_at.cmp(&a.chunk.created_at));
        }

        matches
            .into_iter()
            .skip(criteria.offset)
            .take(criteria.limit.unwrap_or(usize::MAX))
            .map(|s| s.chunk.clone())
            .collect()
    }

    pub fn update_similar(
        &mut self,
        session_id: &str,
        chunk_id: &str,
        similar: Vec<SimilarChunk>,
    ) -> Result<()> {
        let stored = self
            .sessions
            .get_mut(session_id)
            .and_then(|chunks| chunks.iter_mut().find(|s| s.chunk.id == chunk_id))
            .ok_or_else(|| StoreError::NotFound(format!("chunk '{chunk_id}'")))?;

        // Re-insert through the model helper so the list invariants (sorted
        // descending, at most K entries) hold regardless of caller order.
        let mut normalized = Vec::new();
        for entry in similar {
            insert_similar(&mut normalized, entry);
        }
        stored.chunk.similar_chunks = normalized;
        Ok(())
    }

    pub fn delete(&mut self, session_id: &str) -> usize {
        self.sessions.remove(session_id).map_or(0, |v| v.len())
    }
}

fn matches_criteria(chunk: &CodeChunk, criteria: &SearchCriteria) -> bool {
    if let Some(kind) = criteria.kind {
        if chunk.kind != kind {
            return false;
        }
    }
    if let Some(language) = &criteria.language {
        if !chunk.language.eq_ignore_ascii_case(language) {
            return false;
        }
    }
    if let Some(min) = criteria.complexity_min {
        if chunk.complexity < min {
            return false;
        }
    }
    if let Some(max) = criteria.complexity_max {
        if chunk.complexity > max {
            return false;
        }
    }
    if let Some(is_async) = criteria.is_async {
        if chunk.is_async != is_async {
            return false;
        }
    }
    if let Some(fragment) = &criteria.path_contains {
        if !chunk.file_path.contains(fragment.as_str()) {
            return false;
        }
    }
    true
}

fn relevance(stored: &StoredChunk, tokens: &[String]) -> usize {
    let text = stored
        .embedding
        .as_ref()
        .map_or_else(|| search_text(&stored.chunk), |e| e.search_text.clone())
        .to_lowercase();
    tokens
        .iter()
        .map(|token| text.matches(token.as_str()).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recast_chunk_model::ChunkKind;

    fn chunk(id: &str, session: &str, path: &str, kind: ChunkKind, code: &str) -> CodeChunk {
        CodeChunk::new(id, session, path, kind, format!("sym_{id}"), code).language("typescript")
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut map = SessionMap::default();
        map.insert(
            chunk("c1", "s1", "a.ts", ChunkKind::Function, "fn"),
            None,
        )
        .unwrap();
        let err = map
            .insert(chunk("c1", "s2", "b.ts", ChunkKind::Function, "fn"), None)
            .unwrap_err();
        assert!(matches!(err, StoreError::Consistency(_)));
    }

    #[test]
    fn insert_rejects_mismatched_embedding() {
        let mut map = SessionMap::default();
        let a = chunk("c1", "s1", "a.ts", ChunkKind::Function, "fn");
        let b = chunk("c2", "s1", "b.ts", ChunkKind::Function, "fn");
        let record = EmbeddingRecord::for_chunk(&b, vec![0.1, 0.2], "test");
        assert!(map.insert(a, Some(record)).is_err());
    }

    #[test]
    fn statistics_aggregate_by_type_language_file() {
        let mut map = SessionMap::default();
        map.insert(
            chunk("c1", "s1", "a.ts", ChunkKind::Function, "fn").complexity(2),
            None,
        )
        .unwrap();
        map.insert(
            chunk("c2", "s1", "a.ts", ChunkKind::Class, "class A {}").complexity(4),
            None,
        )
        .unwrap();
        map.insert(
            chunk("c3", "s1", "b.ts", ChunkKind::Function, "fn").is_async(true),
            None,
        )
        .unwrap();

        let stats = map.statistics("s1");
        assert_eq!(stats.total_chunks, 3);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.async_chunks, 1);
        assert_eq!(stats.by_type.get("function"), Some(&2));
        assert_eq!(stats.by_type.get("class"), Some(&1));
        assert_eq!(stats.by_file.get("a.ts"), Some(&2));
        assert!((stats.average_complexity - 7.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn search_filters_and_paginates() {
        let mut map = SessionMap::default();
        for i in 0..5 {
            map.insert(
                chunk(
                    &format!("c{i}"),
                    "s1",
                    &format!("src/file{i}.ts"),
                    if i % 2 == 0 {
                        ChunkKind::Function
                    } else {
                        ChunkKind::Class
                    },
                    "code",
                ),
                None,
            )
            .unwrap();
        }

        let criteria = SearchCriteria {
            kind: Some(ChunkKind::Function),
            ..SearchCriteria::default()
        };
        assert_eq!(map.search("s1", &criteria).len(), 3);

        let paged = SearchCriteria {
            kind: Some(ChunkKind::Function),
            offset: 1,
            limit: Some(1),
            ..SearchCriteria::default()
        };
        assert_eq!(map.search("s1", &paged).len(), 1);
    }

    #[test]
    fn search_orders_by_relevance_with_query() {
        let mut map = SessionMap::default();
        map.insert(
            chunk("c1", "s1", "a.ts", ChunkKind::Function, "unrelated code"),
            None,
        )
        .unwrap();
        map.insert(
            chunk(
                "c2",
                "s1",
                "b.ts",
                ChunkKind::Function,
                "database database connection",
            ),
            None,
        )
        .unwrap();

        let criteria = SearchCriteria {
            query: Some("database".to_string()),
            ..SearchCriteria::default()
        };
        let results = map.search("s1", &criteria);
        assert_eq!(results[0].id, "c2");
    }

    #[test]
    fn update_similar_normalizes_order_and_size() {
        let mut map = SessionMap::default();
        map.insert(chunk("c1", "s1", "a.ts", ChunkKind::Function, "fn"), None)
            .unwrap();

        let unsorted: Vec<SimilarChunk> = (0..15)
            .map(|i| SimilarChunk::new(format!("o{i}"), (i % 7) as f32 / 10.0))
            .collect();
        map.update_similar("s1", "c1", unsorted).unwrap();

        let stored = &map.stored_for("s1")[0].chunk.similar_chunks;
        assert_eq!(stored.len(), 10);
        for pair in stored.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn delete_returns_removed_count() {
        let mut map = SessionMap::default();
        map.insert(chunk("c1", "s1", "a.ts", ChunkKind::Function, "fn"), None)
            .unwrap();
        map.insert(chunk("c2", "s1", "b.ts", ChunkKind::Function, "fn"), None)
            .unwrap();
        assert_eq!(map.delete("s1"), 2);
        assert_eq!(map.count("s1"), 0);
        assert_eq!(map.delete("missing"), 0);
    }
}
