use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Chunk, Unit};

pub const UNIT_SEPARATOR: &str = "\n\n";

/// Group `units` into consecutive chunks of `group_size`; the last chunk
/// holds the remainder. Chunk ids follow emission order starting at 0.
pub fn segment(units: &[Unit], group_size: usize) -> Result<Vec<Chunk>> {
    if group_size == 0 {
        return Err(Error::InvalidArgument("group size must be at least 1".to_string()));
    }
    let chunks: Vec<Chunk> = units
        .chunks(group_size)
        .enumerate()
        .map(|(chunk_id, batch)| Chunk {
            chunk_id,
            unit_ids: batch.iter().map(|u| u.id.clone()).collect(),
            text: batch.iter().map(Unit::text).collect::<Vec<_>>().join(UNIT_SEPARATOR),
        })
        .collect();
    debug!(units = units.len(), chunks = chunks.len(), group_size, "segmented units");
    Ok(chunks)
}

/// Slide a window of `chunk_size` characters over `text`, advancing by
/// `chunk_size - overlap`. The last window always ends at the end of the text.
pub fn segment_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(Error::InvalidArgument("chunk size must be at least 1".to_string()));
    }
    if overlap >= chunk_size {
        return Err(Error::InvalidArgument("overlap must be smaller than chunk size".to_string()));
    }
    // Byte offsets of every char boundary, so windows never split a code point.
    let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let n_chars = bounds.len() - 1;
    let step = chunk_size - overlap;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < n_chars {
        let end = (start + chunk_size).min(n_chars);
        chunks.push(Chunk {
            chunk_id: chunks.len(),
            unit_ids: vec![format!("chars:{}-{}", start, end)],
            text: text[bounds[start]..bounds[end]].to_string(),
        });
        if end >= n_chars { break; }
        start += step;
    }
    debug!(chars = n_chars, chunks = chunks.len(), chunk_size, overlap, "segmented text");
    Ok(chunks)
}
