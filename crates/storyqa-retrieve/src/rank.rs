use anyhow::{anyhow, Result};
use std::cmp::Ordering;
use tracing::{debug, warn};

use storyqa_core::{Chunk, RankedChunk};

use crate::embedder::Embedder;

/// Cosine of the angle between `a` and `b`.
///
/// Vectors of unequal length, empty vectors and zero vectors are
/// incomparable and score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() { return 0.0; }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { return 0.0; }
    dot / (norm_a * norm_b)
}

/// Score every chunk against `question`, best first. Ties keep input order.
pub fn rank(question: &str, chunks: &[Chunk], embedder: &Embedder) -> Result<Vec<RankedChunk>> {
    if chunks.is_empty() { return Ok(Vec::new()); }

    let question_vec = embedder
        .embed(&[question.to_string()])?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no embedding for question"))?;
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let chunk_vecs = embedder.embed(&texts)?;

    let mismatched = chunk_vecs.iter().filter(|v| v.len() != question_vec.len()).count();
    if mismatched > 0 {
        warn!(mismatched, dim = question_vec.len(), "embedding dimensions differ; those chunks score 0");
    }

    let mut ranked: Vec<RankedChunk> = chunks
        .iter()
        .zip(chunk_vecs.iter())
        .map(|(chunk, v)| RankedChunk { chunk: chunk.clone(), score: cosine_similarity(&question_vec, v) })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    debug!(chunks = ranked.len(), top = ?ranked.first().map(|r| r.score), "ranked chunks");
    Ok(ranked)
}
