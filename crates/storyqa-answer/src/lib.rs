//! storyqa-answer
//!
//! The answering pipeline and its collaborators: story loaders, the
//! chunking engines and the Gemini generation client.

pub mod engine;
pub mod gemini;
pub mod loader;
pub mod pipeline;

pub use engine::Engine;
pub use gemini::GeminiClient;
pub use loader::{load_story, XmlStoryLoader, TextStoryLoader};
pub use pipeline::{AnswerPipeline, Fit};
