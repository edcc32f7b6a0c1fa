use crate::error::{Result, RetrievalError};
use crate::expansion::expand_command;
use crate::rank::{migration_relevance, rerank};
use crate::types::{ChunkContext, RetrievalMetadata, RetrievalOptions, RetrievedChunk};
use lru::LruCache;
use recast_chunk_model::CodeChunk;
use recast_chunk_store::{ChunkStore, SimilarQuery};
use recast_providers::EmbeddingProvider;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

const QUERY_CACHE_CAPACITY: usize = 128;

/// Maximum related chunks appended after re-ranking
const MAX_RELATIVES: usize = 10;

/// Turns commands into ranked, enriched chunk sets.
pub struct RetrievalEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ChunkStore>,
    query_cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl RetrievalEngine {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn ChunkStore>) -> Self {
        Self {
            embedder,
            store,
            query_cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(QUERY_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    pub async fn retrieve(
        &self,
        command: &str,
        session_id: &str,
        options: &RetrievalOptions,
    ) -> Result<(Vec<RetrievedChunk>, RetrievalMetadata)> {
        if command.trim().is_empty() {
            return Err(RetrievalError::EmptyCommand);
        }

        let expanded = expand_command(command);
        log::debug!("Retrieval query for '{session_id}': '{expanded}'");

        let vector = self.query_embedding(&expanded).await?;

        // Ask for twice the final limit so re-ranking has slack to reorder.
        let query = SimilarQuery {
            threshold: options.threshold,
            limit: options.limit * 2,
            chunk_kind: (options.chunk_types.len() == 1).then(|| options.chunk_types[0]),
            language: (options.languages.len() == 1).then(|| options.languages[0].clone()),
            exclude_chunk_id: None,
        };
        let mut candidates = self.store.find_similar(session_id, &vector, &query).await?;
        let considered = candidates.len();

        // Multi-valued filters are applied here; single values went to the store.
        if options.chunk_types.len() > 1 {
            candidates.retain(|hit| options.chunk_types.contains(&hit.chunk.kind));
        }
        if options.languages.len() > 1 {
            candidates.retain(|hit| {
                options
                    .languages
                    .iter()
                    .any(|lang| hit.chunk.language.eq_ignore_ascii_case(lang))
            });
        }

        let mut ranked = rerank(candidates, command);
        ranked.truncate(options.limit);

        let mut results: Vec<RetrievedChunk> = ranked
            .into_iter()
            .map(|(hit, score)| enrich(hit.chunk, hit.similarity, score))
            .collect();

        if options.include_dependencies || options.include_related_files {
            let relatives = self.relatives(session_id, &results, options).await?;
            results.extend(relatives);
            results.truncate(options.limit);
        }

        log::info!(
            "Retrieved {} chunks for '{session_id}' ({} candidates considered)",
            results.len(),
            considered
        );

        let metadata = RetrievalMetadata {
            expanded_command: expanded,
            candidates_considered: considered,
            threshold: options.threshold,
            limit: options.limit,
        };
        Ok((results, metadata))
    }

    async fn query_embedding(&self, expanded: &str) -> Result<Vec<f32>> {
        let cached = self
            .query_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(expanded)
            .cloned();
        if let Some(vector) = cached {
            log::debug!("Query embedding served from cache");
            return Ok(vector);
        }

        let response = self.embedder.embed(expanded).await?;
        self.query_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(expanded.to_string(), response.vector.clone());
        Ok(response.vector)
    }

    /// Chunks the chosen set references: callees matched by name when
    /// dependencies are included, import targets matched by path when related
    /// files are included. Never more than [`MAX_RELATIVES`].
    async fn relatives(
        &self,
        session_id: &str,
        chosen: &[RetrievedChunk],
        options: &RetrievalOptions,
    ) -> Result<Vec<RetrievedChunk>> {
        let present: HashSet<&str> = chosen.iter().map(|r| r.chunk.id.as_str()).collect();
        let session_chunks = self.store.get_chunks_by_session(session_id).await?;

        let mut relatives = Vec::new();
        let mut added: HashSet<String> = HashSet::new();

        for result in chosen {
            for dependency in &result.chunk.dependencies {
                if relatives.len() >= MAX_RELATIVES {
                    break;
                }

                let is_import = dependency.kind == "import";
                let wanted_by_path = options.include_related_files && is_import;
                let wanted_by_name = options.include_dependencies && !is_import;
                if !wanted_by_path && !wanted_by_name {
                    continue;
                }

                let target = dependency
                    .source
                    .trim_start_matches("./")
                    .trim_start_matches("../");
                let matched = session_chunks.iter().find(|chunk| {
                    !present.contains(chunk.id.as_str())
                        && !added.contains(&chunk.id)
                        && if wanted_by_path {
                            chunk.file_path.contains(target)
                        } else {
                            chunk.name == dependency.source
                        }
                });

                if let Some(chunk) = matched {
                    added.insert(chunk.id.clone());
                    relatives.push(enrich(chunk.clone(), 0.0, 0.0));
                }
            }
        }

        Ok(relatives)
    }
}

fn enrich(chunk: CodeChunk, similarity: f32, score: f32) -> RetrievedChunk {
    let context = ChunkContext::for_chunk(&chunk);
    let relevance = migration_relevance(&chunk);
    RetrievedChunk {
        chunk,
        similarity,
        score,
        context,
        migration_relevance: relevance,
    }
}
