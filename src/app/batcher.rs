//! Line-based message chunking.
//!
//! Splitting is pure: the same input always yields the same chunks, and
//! rejoining the chunks with newlines reproduces the input exactly.

/// Split `text` on line breaks and group consecutive lines into chunks of
/// at most `max_lines` lines, preserving order. The last chunk may be
/// shorter. Empty input yields no chunks.
#[must_use]
pub fn chunk_lines(text: &str, max_lines: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let lines: Vec<&str> = text.split('\n').collect();
    lines
        .chunks(max_lines.max(1))
        .map(|chunk| chunk.join("\n"))
        .collect()
}
