//! Text chunking with configurable size and overlap.
//!
//! Windows are measured in characters, never split multi-byte sequences, and
//! prefer to break at natural boundaries (paragraph, sentence, whitespace)
//! when one falls inside the window.

use doctalk_core::{AppError, AppResult};
use unicode_segmentation::UnicodeSegmentation;

/// Chunk text into overlapping windows of at most `chunk_size` characters.
///
/// Each window overlaps the previous by exactly `overlap` characters, so
/// concatenating the windows with the overlapped prefixes dropped
/// reconstructs the input losslessly. `overlap` must be smaller than
/// `chunk_size`. Empty input yields no windows.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> AppResult<Vec<String>> {
    if chunk_size == 0 {
        return Err(AppError::Config(
            "Chunk size must be greater than zero".to_string(),
        ));
    }
    if overlap >= chunk_size {
        return Err(AppError::Config(format!(
            "Chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, chunk_size
        )));
    }
    if text.is_empty() {
        return Ok(vec![]);
    }

    let chars: Vec<char> = text.chars().collect();
    let sentence_bounds = sentence_boundaries(text);

    let mut windows = Vec::new();
    let mut start = 0;

    loop {
        let hard_end = (start + chunk_size).min(chars.len());
        let end = if hard_end == chars.len() {
            hard_end
        } else {
            // The floor keeps every window longer than the overlapped
            // prefix, which guarantees forward progress.
            pick_break(&chars, &sentence_bounds, start + overlap + 1, hard_end)
        };

        windows.push(chars[start..end].iter().collect());

        if end == chars.len() {
            break;
        }

        // Next window re-reads the last `overlap` characters
        start = end - overlap;
    }

    tracing::debug!(
        "Chunked {} chars into {} windows (size: {}, overlap: {})",
        chars.len(),
        windows.len(),
        chunk_size,
        overlap
    );

    Ok(windows)
}

/// Choose where a window ends, scanning `floor..=hard_end` for the best
/// break: a paragraph break, then a sentence boundary, then any whitespace,
/// falling back to the hard cut.
fn pick_break(chars: &[char], sentence_bounds: &[usize], floor: usize, hard_end: usize) -> usize {
    // Paragraph break: the position just after a blank line
    for p in (floor..=hard_end).rev() {
        if p >= 2 && chars[p - 1] == '\n' && chars[p - 2] == '\n' {
            return p;
        }
    }

    // Latest sentence boundary inside the window
    let idx = sentence_bounds.partition_point(|&p| p <= hard_end);
    if idx > 0 && sentence_bounds[idx - 1] >= floor {
        return sentence_bounds[idx - 1];
    }

    // Any whitespace
    for p in (floor..=hard_end).rev() {
        if chars[p - 1].is_whitespace() {
            return p;
        }
    }

    hard_end
}

/// Character positions at which a new sentence begins, ascending.
fn sentence_boundaries(text: &str) -> Vec<usize> {
    let mut bounds = Vec::new();
    let mut chars_seen = 0;

    for sentence in text.split_sentence_bounds() {
        chars_seen += sentence.chars().count();
        bounds.push(chars_seen);
    }

    bounds
}
