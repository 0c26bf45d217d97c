//! storyqa-embed
//!
//! Vectorization models behind the `Vectorizer` trait: a candle sentence
//! embedder loaded once per process, and a hashing vectorizer for tests.

use anyhow::Result;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use storyqa_core::config::{expand_path, EmbedSettings};
use storyqa_core::traits::Vectorizer;

pub mod device;
pub mod hashing;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use hashing::HashingVectorizer;
pub use model::{resolve_model_dir, SentenceEmbedder, DEFAULT_MODEL_NAME};
pub use pool::masked_mean_l2;

static SHARED_MODEL: Mutex<Option<Arc<SentenceEmbedder>>> = Mutex::new(None);

/// The process-wide sentence embedder; loaded on first use, then reused.
pub fn shared_model(model_dir: &Path, max_len: usize) -> Result<Arc<SentenceEmbedder>> {
    let mut slot = SHARED_MODEL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(model) = slot.as_ref() {
        if model.max_len() != max_len { warn!(requested = max_len, loaded = model.max_len(), "reusing model with different max_len"); }
        return Ok(Arc::clone(model));
    }
    let model = Arc::new(SentenceEmbedder::load(model_dir, max_len)?);
    *slot = Some(Arc::clone(&model));
    Ok(model)
}

fn fake_requested(settings: &EmbedSettings) -> bool {
    settings.use_fake
        || std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Pick the vectorizer described by `settings`.
///
/// Respects `APP_USE_FAKE_EMBEDDINGS=1` to switch to the hashing vectorizer
/// for fast, deterministic runs.
pub fn get_default_vectorizer(settings: &EmbedSettings) -> Result<Arc<dyn Vectorizer>> {
    if fake_requested(settings) {
        info!(dim = settings.fake_dim, "using hashing vectorizer");
        return Ok(Arc::new(HashingVectorizer::new(settings.fake_dim)));
    }
    let explicit = settings.model_dir.as_deref().map(expand_path);
    let dir = resolve_model_dir(explicit.as_deref())?;
    let model: Arc<dyn Vectorizer> = shared_model(&dir, settings.max_len)?;
    Ok(model)
}
