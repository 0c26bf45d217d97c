use anyhow::Result;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use storyqa_core::traits::Vectorizer;

/// Deterministic bag-of-tokens vectorizer for tests and offline runs.
///
/// Each whitespace token is hashed into one of `dim` buckets; the result is
/// L2-normalised. Texts sharing words score as similar, which is enough to
/// exercise ranking without a model on disk.
#[derive(Debug, Clone)]
pub struct HashingVectorizer { dim: usize }

impl HashingVectorizer {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            if token.is_empty() { continue; }
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            v[idx] += 1.0 + (((h >> 32) as u32) as f32) / (u32::MAX as f32);
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Vectorizer for HashingVectorizer {
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { usize::MAX }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
