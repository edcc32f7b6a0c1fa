//! # Recast Indexer
//!
//! Ingestion-side embedding pipeline. Parsing lives outside this system; a
//! [`ChunkSource`] collaborator yields already-extracted chunk records, and
//! the indexer turns them into searchable store content.
//!
//! ## Pipeline
//!
//! ```text
//! ChunkSource
//!     │
//!     ├──> derive search text per chunk
//!     │
//!     ├──> embed in batches (default 5 concurrent,
//!     │    500 ms pause between batches)
//!     │
//!     ├──> insert chunk + embedding record
//!     │
//!     └──> refresh per-chunk similar-chunks lists (top 10)
//! ```

mod error;
mod indexer;
mod source;
mod stats;

pub use error::{IndexError, Result};
pub use indexer::{EmbeddingIndexer, IndexerConfig};
pub use source::{ChunkSource, JsonChunkSource};
pub use stats::IndexStats;
