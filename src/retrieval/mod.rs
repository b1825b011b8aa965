//! Local document retrieval: paragraph chunking, feature-hashed embeddings,
//! and brute-force cosine search over an in-memory index.

pub mod chunking;
pub mod embedding;
pub mod index;
pub mod loader;

pub use chunking::split_chunks;
pub use embedding::{cosine_similarity, embed, DEFAULT_DIMENSION};
pub use index::{DocumentIndex, EmbeddedDocument, IndexOptions, SearchResult};
