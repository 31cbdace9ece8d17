/*!
 * Splitting a single caption fragment into sentence pieces.
 *
 * A fragment that carries several sentences is cut after every terminator
 * run that is followed by whitespace. Each piece receives a share of the
 * fragment's time span proportional to its character length; the last piece
 * absorbs any floating point slack so the pieces cover the span exactly.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::transcript::RawFragment;

// @const: Terminator run followed by whitespace
static PIECE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?？！。…]+\s+").unwrap()
});

// @struct: Candidate sentence cut out of one fragment
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SentencePiece {
    // @field: Trimmed, never empty
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl SentencePiece {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Cut `text` after each terminator run followed by whitespace.
///
/// Pieces are trimmed and empty ones dropped.
pub(crate) fn split_text(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for m in PIECE_BREAK_REGEX.find_iter(text) {
        pieces.push(text[last..m.end()].trim());
        last = m.end();
    }
    pieces.push(text[last..].trim());

    pieces.retain(|piece| !piece.is_empty());
    pieces
}

/// Split one fragment into pieces with interpolated timing
pub(crate) fn split_fragment(fragment: &RawFragment) -> Vec<SentencePiece> {
    let texts = split_text(&fragment.text);
    if texts.is_empty() {
        return Vec::new();
    }

    let lengths: Vec<usize> = texts.iter().map(|t| t.chars().count()).collect();
    let total_len = match lengths.iter().sum::<usize>() {
        0 => texts.len(),
        n => n,
    } as f64;

    let end = fragment.end();
    let last_index = texts.len() - 1;
    let mut cursor = fragment.start;
    let mut pieces = Vec::with_capacity(texts.len());

    for (i, (text, len)) in texts.into_iter().zip(lengths).enumerate() {
        let duration = if i == last_index {
            end - cursor
        } else {
            fragment.duration * (len as f64 / total_len)
        };

        pieces.push(SentencePiece {
            text: text.to_string(),
            start: cursor,
            duration,
        });
        cursor += duration;
    }

    pieces
}
