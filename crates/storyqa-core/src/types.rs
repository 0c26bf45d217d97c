//! Domain types passed between the pipeline stages.

use serde::{Deserialize, Serialize};

pub type ChunkId = usize;

/// Answer text reported whenever the pipeline could not produce one.
pub const FALLBACK_ANSWER: &str = "I couldn't answer the question.";

/// An atomic piece of story content as produced by a loader.
///
/// - `id`: stable identifier from the source (message id, paragraph number)
/// - `sender`/`receiver`: participants, empty when the source has none
/// - `body`: the plain text payload
/// - `raw`: the verbatim serialized form when the source is structured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub sender: String,
    pub receiver: String,
    pub body: String,
    pub raw: Option<String>,
}

impl Unit {
    /// A unit with only a body, as produced from plain text.
    pub fn plain(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self { id: id.into(), sender: String::new(), receiver: String::new(), body: body.into(), raw: None }
    }

    /// Text this unit contributes to a chunk: the raw form if preserved, else the body.
    pub fn text(&self) -> &str {
        self.raw.as_deref().unwrap_or(&self.body)
    }
}

/// A retrievable group of consecutive units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: ChunkId,
    pub unit_ids: Vec<String>,
    pub text: String,
}

/// A chunk paired with its similarity to the question. Higher is better.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub chunk_id: ChunkId,
    pub text: String,
}

impl From<&Chunk> for Evidence {
    fn from(chunk: &Chunk) -> Self {
        Self { chunk_id: chunk.chunk_id, text: chunk.text.clone() }
    }
}

/// Outcome of answering one question.
///
/// Serializes to `{answer, evidence, why_not}`; on failure `answer` is
/// [`FALLBACK_ANSWER`] and `why_not` carries the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerResult {
    Answered { answer: String, evidence: Vec<Evidence> },
    Failed { evidence: Vec<Evidence>, why_not: String },
}

impl AnswerResult {
    pub fn failed(evidence: Vec<Evidence>, why_not: impl Into<String>) -> Self {
        Self::Failed { evidence, why_not: why_not.into() }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }

    pub fn answer(&self) -> &str {
        match self {
            Self::Answered { answer, .. } => answer,
            Self::Failed { .. } => FALLBACK_ANSWER,
        }
    }

    pub fn evidence(&self) -> &[Evidence] {
        match self {
            Self::Answered { evidence, .. } | Self::Failed { evidence, .. } => evidence,
        }
    }

    /// Empty on success.
    pub fn why_not(&self) -> &str {
        match self {
            Self::Answered { .. } => "",
            Self::Failed { why_not, .. } => why_not,
        }
    }
}

#[derive(Serialize)]
struct AnswerRecord<'a> {
    answer: &'a str,
    evidence: &'a [Evidence],
    why_not: &'a str,
}

impl Serialize for AnswerResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        AnswerRecord { answer: self.answer(), evidence: self.evidence(), why_not: self.why_not() }.serialize(serializer)
    }
}
