use crate::error::{Error, Result};

pub const DEFAULT_MAX_PROMPT_CHARS: usize = 3000;

const INSTRUCTIONS: &str = "Instructions:\n\
Answer ONLY using the evidence above. Quote the exact lines you used as evidence. \
If the evidence is insufficient, say why.";

/// Assembles the question and evidence into a bounded prompt.
///
/// Never truncates: an oversized result is reported as
/// [`Error::PromptTooLong`] and the caller decides what to drop.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self { max_chars: DEFAULT_MAX_PROMPT_CHARS }
    }
}

impl PromptBuilder {
    pub fn new(max_chars: usize) -> Self { Self { max_chars } }

    pub fn max_chars(&self) -> usize { self.max_chars }

    pub fn build<S: AsRef<str>>(&self, question: &str, evidence_chunks: &[S]) -> Result<String> {
        let evidence = evidence_chunks.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n\n");
        let prompt = format!("Question: {question}\n\nEvidence:\n{evidence}\n\n{INSTRUCTIONS}");
        // Length in characters, not bytes.
        let len = prompt.chars().count();
        if len > self.max_chars {
            return Err(Error::PromptTooLong { len, max: self.max_chars });
        }
        Ok(prompt)
    }
}
