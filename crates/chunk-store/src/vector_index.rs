use crate::error::{Result, StoreError};
use crate::similarity::cosine_similarity;
use std::env;

/// Flat vector index over one session's embeddings.
///
/// Entries keep insertion order and the similarity sort is stable, so equal
/// scores come back in store order. Dimension is pinned by the first insert.
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<(String, Vec<f32>)>,
}

impl VectorIndex {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Add a vector under a chunk id
    pub fn add(&mut self, chunk_id: impl Into<String>, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(StoreError::InvalidDimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.entries.push((chunk_id.into(), vector.to_vec()));
        Ok(())
    }

    /// Score every entry against `query`, returning (chunk id, similarity)
    /// sorted descending. A query of the wrong dimension scores zero
    /// everywhere rather than erroring, matching the cosine contract.
    #[must_use]
    pub fn search(&self, query: &[f32]) -> Vec<(&str, f32)> {
        let mut scores: Vec<(&str, f32)> = self
            .entries
            .iter()
            .map(|(id, vector)| (id.as_str(), cosine_similarity(query, vector)))
            .collect();

        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores
    }

    pub fn remove_all(&mut self, chunk_ids: &[String]) {
        self.entries.retain(|(id, _)| !chunk_ids.contains(id));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Startup feature detection: run a tiny self-check query and verify the
    /// index orders an exact match above an orthogonal vector. Honour the
    /// explicit disable switch so operators can force the scan fallback.
    pub fn probe() -> Result<()> {
        let disabled = env::var("RECAST_DISABLE_VECTOR_INDEX")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if disabled {
            return Err(StoreError::Other(
                "vector index disabled via RECAST_DISABLE_VECTOR_INDEX".to_string(),
            ));
        }

        let mut index = Self::new(3);
        index.add("exact", &[1.0, 0.0, 0.0])?;
        index.add("orthogonal", &[0.0, 1.0, 0.0])?;

        let results = index.search(&[1.0, 0.0, 0.0]);
        let head = results
            .first()
            .ok_or_else(|| StoreError::Other("index probe returned nothing".to_string()))?;
        if head.0 != "exact" || (head.1 - 1.0).abs() > 1e-5 {
            return Err(StoreError::Other(
                "index probe returned wrong ordering".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_similarity() {
        let mut index = VectorIndex::new(3);
        index.add("a", &[1.0, 0.0, 0.0]).unwrap();
        index.add("b", &[0.9, 0.1, 0.0]).unwrap();
        index.add("c", &[0.0, 1.0, 0.0]).unwrap();

        let results = index.search(&[1.0, 0.0, 0.0]);
        assert_eq!(results[0].0, "a");
        assert!((results[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(results[1].0, "b");
        assert!(results[1].1 > 0.9);
        assert_eq!(results[2].0, "c");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut index = VectorIndex::new(2);
        index.add("first", &[1.0, 0.0]).unwrap();
        index.add("second", &[1.0, 0.0]).unwrap();

        let results = index.search(&[1.0, 0.0]);
        assert_eq!(results[0].0, "first");
        assert_eq!(results[1].0, "second");
    }

    #[test]
    fn rejects_wrong_dimension_insert() {
        let mut index = VectorIndex::new(3);
        assert!(index.add("a", &[1.0, 0.0]).is_err());
    }

    #[test]
    fn wrong_dimension_query_scores_zero() {
        let mut index = VectorIndex::new(3);
        index.add("a", &[1.0, 0.0, 0.0]).unwrap();
        let results = index.search(&[1.0, 0.0]);
        assert_eq!(results[0].1, 0.0);
    }

    #[test]
    fn probe_passes_by_default() {
        assert!(VectorIndex::probe().is_ok());
    }
}
