use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use storyqa_core::traits::Vectorizer;

use crate::cache::EmbeddingCache;

/// Vectorizer front end that consults the cache before calling the model.
///
/// Misses are deduplicated and sent to the model in a single batch; the
/// results are written through to the cache.
#[derive(Clone)]
pub struct Embedder {
    vectorizer: Arc<dyn Vectorizer>,
    cache: Arc<EmbeddingCache>,
}

impl Embedder {
    pub fn new(vectorizer: Arc<dyn Vectorizer>, cache: Arc<EmbeddingCache>) -> Self {
        Self { vectorizer, cache }
    }

    pub fn cache(&self) -> &EmbeddingCache { &self.cache }

    /// One vector per input text, in input order.
    pub fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut resolved: HashMap<&str, Vec<f32>> = HashMap::new();
        let mut seen_missing: HashSet<&str> = HashSet::new();
        let mut missing: Vec<&str> = Vec::new();
        for text in texts {
            let key = text.as_str();
            if resolved.contains_key(key) || seen_missing.contains(key) { continue; }
            match self.cache.get(key) {
                Some(v) => { resolved.insert(key, v); }
                None => { seen_missing.insert(key); missing.push(key); }
            }
        }

        if !missing.is_empty() {
            debug!(requested = texts.len(), hits = resolved.len(), misses = missing.len(), "embedding cache misses");
            let batch: Vec<String> = missing.iter().map(|t| t.to_string()).collect();
            let vectors = self.vectorizer.embed_batch(&batch)?;
            if vectors.len() != missing.len() {
                return Err(anyhow!("vectorizer returned {} vectors for {} texts", vectors.len(), missing.len()));
            }
            let dim = self.vectorizer.dim();
            for (text, vector) in missing.into_iter().zip(vectors) {
                if vector.len() != dim {
                    return Err(anyhow!("dim mismatch: got {} expected {}", vector.len(), dim));
                }
                self.cache.put(text.to_string(), vector.clone());
                resolved.insert(text, vector);
            }
        }

        texts
            .iter()
            .map(|t| resolved.get(t.as_str()).cloned().ok_or_else(|| anyhow!("no embedding resolved for input text")))
            .collect()
    }
}
