//! Paragraph-aligned chunking.
//!
//! Documents are split on line breaks and paragraphs are packed greedily
//! into chunks of at most `chunk_size` bytes. A paragraph is never split:
//! a single paragraph longer than `chunk_size` comes out as one oversized
//! chunk, and callers must tolerate that.

/// Default chunk budget in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Splits `text` into paragraph-aligned chunks of roughly `chunk_size` bytes.
///
/// Paragraphs are accumulated into a buffer, joined by a single space, while
/// the buffer plus the next paragraph still fits within `chunk_size`. When a
/// paragraph would overflow the buffer, the buffer is trimmed and emitted,
/// and the paragraph starts a new buffer. Empty buffers are never emitted,
/// so empty input yields an empty vec.
///
/// Deterministic and side-effect free. Concatenating the chunks reproduces
/// every non-whitespace character of `text` in order; only boundary
/// whitespace is altered.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for para in text.split('\n') {
        if current.len() + para.len() <= chunk_size {
            current.push(' ');
            current.push_str(para);
        } else {
            let completed = current.trim();
            if !completed.is_empty() {
                chunks.push(completed.to_string());
            }
            current = para.to_string();
        }
    }

    let completed = current.trim();
    if !completed.is_empty() {
        chunks.push(completed.to_string());
    }

    chunks
}
