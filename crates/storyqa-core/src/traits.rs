use std::path::Path;

use crate::types::Unit;

/// A text vectorization model.
///
/// Must be deterministic for identical input: cached vectors are reused
/// in place of fresh calls.
pub trait Vectorizer: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    /// One vector per input text, same order.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// A generative model that answers a finished prompt.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Produces the ordered units of a story document.
pub trait StoryLoader {
    fn load(&self, path: &Path) -> crate::Result<Vec<Unit>>;
}
