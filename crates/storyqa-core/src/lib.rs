//! storyqa-core
//!
//! Data model, error taxonomy and collaborator traits shared by every
//! crate in the workspace, plus the two pure stages of the answering
//! pipeline: segmentation (`segment`) and prompt assembly (`prompt`).

pub mod config;
pub mod error;
pub mod prompt;
pub mod segment;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use prompt::{PromptBuilder, DEFAULT_MAX_PROMPT_CHARS};
pub use segment::{segment, segment_text};
pub use types::{AnswerResult, Chunk, ChunkId, Evidence, RankedChunk, Unit, FALLBACK_ANSWER};
