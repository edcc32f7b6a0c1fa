//! # Recast Retrieval
//!
//! Turns a migration command into ranked, enriched code chunks:
//!
//! ```text
//! command
//!     │
//!     ├──> expansion        tech keywords + migration lexicon
//!     ├──> query embedding  (LRU-cached)
//!     ├──> vector search    2 × limit candidates at ≥ threshold
//!     ├──> re-rank          cosine + lexical + structural signals
//!     ├──> relatives        chunks the winners reference
//!     └──> enrichment       file context + migration relevance
//! ```

mod engine;
mod error;
mod expansion;
mod rank;
mod types;

pub use engine::RetrievalEngine;
pub use error::{Result, RetrievalError};
pub use expansion::expand_command;
pub use rank::{migration_relevance, rerank};
pub use types::{ChunkContext, RetrievalMetadata, RetrievalOptions, RetrievedChunk};
