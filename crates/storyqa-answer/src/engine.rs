use std::path::Path;

use storyqa_core::config::Settings;
use storyqa_core::{segment, segment_text, Chunk, Result};

use crate::loader::{load_story, read_story_text};

/// How a story file becomes retrievable chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Load units (messages, events or paragraphs) and group them.
    Messages,
    /// Slide overlapping character windows over the raw file.
    Text,
}

impl Engine {
    pub fn chunks(self, story: &Path, settings: &Settings) -> Result<Vec<Chunk>> {
        match self {
            Engine::Messages => segment(&load_story(story)?, settings.retrieval.group_size),
            Engine::Text => segment_text(&read_story_text(story)?, settings.text.chunk_size, settings.text.overlap),
        }
    }
}
