//! # Recast Chunk Store
//!
//! Persistence for code chunks and their embedding vectors, behind one
//! adapter trait with two interchangeable variants:
//!
//! ```text
//! connect()
//!     │
//!     ├── probe vector index ── ok ──> IndexedStore   (similarity answered
//!     │                                                by a per-session index)
//!     └── probe failed/disabled ─────> ScanStore      (fetch candidates,
//!                                                      score cosine locally)
//! ```
//!
//! Both variants persist sessions as a single JSON document and rebuild any
//! derived state on load.

mod error;
mod indexed;
mod scan;
mod sessions;
mod similarity;
mod store;
mod vector_index;

pub use error::{Result, StoreError};
pub use indexed::IndexedStore;
pub use scan::ScanStore;
pub use similarity::cosine_similarity;
pub use store::{
    connect, ChunkStore, ProjectStatistics, SearchCriteria, SimilarQuery, SimilarityHit,
    StoreBackend, StoreConfig,
};
pub use vector_index::VectorIndex;
