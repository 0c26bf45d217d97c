//! Story loaders: turn a story file into ordered units.
//!
//! `.xml` files go through [`XmlStoryLoader`]; anything else is read as
//! plain text by [`TextStoryLoader`]. Failures surface as
//! `Error::StoryParse` and are never recovered here.

use std::path::Path;

use storyqa_core::traits::StoryLoader;
use storyqa_core::{Error, Result, Unit};

mod text;
mod xml;

pub use text::TextStoryLoader;
pub use xml::{parse_story_xml, XmlStoryLoader};

/// Read a UTF-8 file, tolerating a leading byte-order mark.
pub fn read_story_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::StoryParse(format!("{}: {}", path.display(), e)))?;
    let content = String::from_utf8(bytes).map_err(|e| Error::StoryParse(format!("{}: {}", path.display(), e)))?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

pub fn load_story(path: &Path) -> Result<Vec<Unit>> {
    let is_xml = path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("xml"));
    if is_xml { XmlStoryLoader.load(path) } else { TextStoryLoader.load(path) }
}
