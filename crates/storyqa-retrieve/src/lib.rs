//! storyqa-retrieve
//!
//! Cached embedding and similarity ranking of chunks against a question.

pub mod cache;
pub mod embedder;
pub mod rank;

pub use cache::{CacheStats, EmbeddingCache};
pub use embedder::Embedder;
pub use rank::{cosine_similarity, rank};
