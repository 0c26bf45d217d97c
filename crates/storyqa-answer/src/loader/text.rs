use std::path::Path;

use storyqa_core::traits::StoryLoader;
use storyqa_core::{Result, Unit};

use super::read_story_text;

/// Blank-line separated paragraphs become units `p1`, `p2`, ...
#[derive(Debug, Default, Clone, Copy)]
pub struct TextStoryLoader;

impl TextStoryLoader {
    pub fn parse(content: &str) -> Vec<Unit> {
        content
            .replace("\r\n", "\n")
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .enumerate()
            .map(|(i, p)| Unit::plain(format!("p{}", i + 1), p))
            .collect()
    }
}

impl StoryLoader for TextStoryLoader {
    fn load(&self, path: &Path) -> Result<Vec<Unit>> {
        Ok(Self::parse(&read_story_text(path)?))
    }
}
