use recast_chunk_model::{ChunkKind, CodeChunk};
use recast_chunk_store::SimilarityHit;
use std::cmp::Ordering;

/// Re-rank vector-search candidates with lexical and structural signals:
/// cosine similarity plus 0.1 per matched command token (length > 3, found in
/// name + code, case-insensitive), 0.05 for declaration kinds, 0.03 for
/// complexity above 2. The sort is stable, so equal scores keep store order.
#[must_use]
pub fn rerank(candidates: Vec<SimilarityHit>, command: &str) -> Vec<(SimilarityHit, f32)> {
    let tokens: Vec<String> = command
        .split_whitespace()
        .filter(|word| word.len() > 3)
        .map(str::to_lowercase)
        .collect();

    let mut scored: Vec<(SimilarityHit, f32)> = candidates
        .into_iter()
        .map(|hit| {
            let score = hit.similarity + signal_bonus(&hit.chunk, &tokens);
            (hit, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
}

fn signal_bonus(chunk: &CodeChunk, tokens: &[String]) -> f32 {
    let haystack = format!("{} {}", chunk.name, chunk.code).to_lowercase();
    let matched = tokens
        .iter()
        .filter(|token| haystack.contains(token.as_str()))
        .count();

    let mut bonus = 0.1 * matched as f32;
    if chunk.kind.is_declaration() {
        bonus += 0.05;
    }
    if chunk.complexity > 2 {
        bonus += 0.03;
    }
    bonus
}

/// How migration-worthy a chunk looks: 0.3 for class/function/method/
/// interface kinds, 0.2 for complexity above 2, 0.1 for async, capped at 1.0.
#[must_use]
pub fn migration_relevance(chunk: &CodeChunk) -> f32 {
    let mut relevance: f32 = 0.0;
    if matches!(
        chunk.kind,
        ChunkKind::Class | ChunkKind::Function | ChunkKind::Method | ChunkKind::Interface
    ) {
        relevance += 0.3;
    }
    if chunk.complexity > 2 {
        relevance += 0.2;
    }
    if chunk.is_async {
        relevance += 0.1;
    }
    relevance.min(1.0)
}
