//! Splitting long text into transport-sized parts.
//!
//! Text arrives as blocks (a header, one block per card). Blocks are packed
//! greedily into parts of at most `limit` characters and never broken across
//! parts. Joining the parts gives back the joined blocks exactly.

use tracing::warn;

/// Character count, the unit transport limits are measured in.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Pack `blocks` into ordered, non-empty parts of at most `limit` characters.
///
/// A block longer than `limit` on its own cannot be kept whole; it gets
/// parts of its own, cut at character boundaries. `EngineConfig::validate`
/// keeps card blocks below that size.
pub fn split_blocks<S: AsRef<str>>(blocks: &[S], limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for block in blocks {
        let block = block.as_ref();
        let block_len = char_len(block);
        if block_len == 0 {
            continue;
        }

        if block_len > limit {
            warn!(block_len, limit, "Text block exceeds message limit, cutting it");
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
                current_len = 0;
            }
            parts.extend(cut_at_chars(block, limit));
            continue;
        }

        if current_len + block_len > limit {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(block);
        current_len += block_len;
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn cut_at_chars(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(limit).map(|chunk| chunk.iter().collect()).collect()
}
