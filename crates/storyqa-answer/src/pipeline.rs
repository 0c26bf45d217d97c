use std::sync::Arc;
use tracing::{debug, info, warn};

use storyqa_core::config::Settings;
use storyqa_core::traits::Generator;
use storyqa_core::{AnswerResult, Chunk, Error, Evidence, PromptBuilder, RankedChunk, Result};
use storyqa_retrieve::{rank, Embedder};

/// Result of searching for the largest evidence set that fits the prompt limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fit {
    /// The top `k` ranked chunks fit; `prompt` is ready to send.
    Fits { k: usize, prompt: String },
    /// Not even a single chunk fits.
    Exhausted,
}

/// Rank, fit, generate.
///
/// Every failure after segmentation becomes an [`AnswerResult::Failed`]
/// carrying a readable reason; nothing here retries the generator.
pub struct AnswerPipeline {
    embedder: Embedder,
    generator: Arc<dyn Generator>,
    prompt: PromptBuilder,
    max_evidence: usize,
}

impl AnswerPipeline {
    pub fn new(embedder: Embedder, generator: Arc<dyn Generator>, prompt: PromptBuilder, max_evidence: usize) -> Self {
        Self { embedder, generator, prompt, max_evidence }
    }

    pub fn from_settings(settings: &Settings, embedder: Embedder, generator: Arc<dyn Generator>) -> Self {
        Self::new(embedder, generator, PromptBuilder::new(settings.prompt.max_chars), settings.retrieval.max_evidence)
    }

    pub fn embedder(&self) -> &Embedder { &self.embedder }

    /// Largest `k <= min(max_evidence, ranked.len())` whose top-`k` prompt fits.
    pub fn fit_evidence(&self, question: &str, ranked: &[RankedChunk]) -> Result<Fit> {
        let mut k = self.max_evidence.min(ranked.len());
        while k >= 1 {
            let texts: Vec<&str> = ranked[..k].iter().map(|r| r.chunk.text.as_str()).collect();
            match self.prompt.build(question, &texts[..]) {
                Ok(prompt) => return Ok(Fit::Fits { k, prompt }),
                Err(Error::PromptTooLong { len, max }) => {
                    debug!(k, len, max, "prompt too long; dropping lowest-ranked chunk");
                    k -= 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Fit::Exhausted)
    }

    pub fn answer(&self, question: &str, chunks: &[Chunk]) -> AnswerResult {
        let ranked = match rank(question, chunks, &self.embedder) {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!(error = %e, "ranking failed");
                return AnswerResult::failed(Vec::new(), format!("Embedding failed: {}", e));
            }
        };
        if ranked.is_empty() {
            return AnswerResult::failed(Vec::new(), Error::NoEvidence.to_string());
        }

        let (k, prompt) = match self.fit_evidence(question, &ranked) {
            Ok(Fit::Fits { k, prompt }) => (k, prompt),
            Ok(Fit::Exhausted) => return AnswerResult::failed(Vec::new(), Error::PromptExhausted.to_string()),
            Err(e) => return AnswerResult::failed(Vec::new(), e.to_string()),
        };
        let evidence: Vec<Evidence> = ranked[..k].iter().map(|r| Evidence::from(&r.chunk)).collect();
        info!(evidence = k, prompt_chars = prompt.chars().count(), "sending prompt to generator");

        match self.generator.generate(&prompt) {
            Ok(text) if text.trim().is_empty() => {
                AnswerResult::failed(evidence, Error::EmptyResponse("Generator".to_string()).to_string())
            }
            Ok(answer) => AnswerResult::Answered { answer, evidence },
            Err(e) => {
                warn!(error = %e, "generation failed");
                AnswerResult::failed(evidence, e.to_string())
            }
        }
    }
}
