//! # Recast Chunk Model
//!
//! The persisted data model shared by every stage of the migration backend:
//! semantic code chunks, their embedding records, and the per-chunk
//! similar-chunk lists.
//!
//! ## Lifecycle
//!
//! ```text
//! Ingestion (external)
//!     │
//!     ├──> CodeChunk          immutable after creation, except
//!     │                       similar_chunks and derived search text
//!     │
//!     ├──> EmbeddingRecord    created once per chunk, never mutated
//!     │
//!     └──> SimilarChunk[]     sorted descending, at most 10 entries
//! ```
//!
//! Chunk graphs (parent/child identifiers) are plain id references resolved
//! against an id-keyed map; the model never holds owning back-references.

mod chunk;
mod embedding;
mod error;

pub use chunk::{
    ChunkKind, CodeChunk, CommentKind, CommentRecord, DependencyRef, Parameter, Visibility,
    SUPPORTED_EXTENSIONS,
};
pub use embedding::{
    insert_similar, search_text, EmbeddingRecord, SimilarChunk, DEFAULT_EMBEDDING_DIMENSION,
    MAX_SIMILAR_CHUNKS,
};
pub use error::{ChunkModelError, Result};
