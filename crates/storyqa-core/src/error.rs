use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Recoverable: the caller shrinks the evidence set and retries.
    #[error("Prompt exceeds {max} characters (got {len}).")]
    PromptTooLong { len: usize, max: usize },

    #[error("Prompt too long even with 1 chunk.")]
    PromptExhausted,

    #[error("No chunks available for retrieval.")]
    NoEvidence,

    #[error("{0}")]
    Generation(String),

    #[error("{0} returned empty response")]
    EmptyResponse(String),

    #[error("Failed to parse story: {0}")]
    StoryParse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
