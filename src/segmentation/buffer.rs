/*!
 * Cross-fragment sentence accumulation.
 *
 * Pieces are collected until one of them ends a sentence or the collected
 * text reaches the character threshold, then the buffer is flushed as one
 * `SentenceSegment` spanning from the first piece's start to the last
 * piece's end. Flushes only ever happen between pieces.
 */

use std::mem;

use crate::segmentation::boundary::ends_sentence;
use crate::segmentation::splitter::SentencePiece;
use crate::transcript::{round_millis, SentenceSegment};

/// Accumulator turning a stream of pieces into sentence segments
#[derive(Debug, Clone)]
pub(crate) struct SentenceBuffer {
    // @field: Flush threshold in characters, separators included
    max_chars: usize,

    pieces: Vec<String>,
    start: Option<f64>,
    accumulated_length: usize,
    last_end: Option<f64>,
}

impl SentenceBuffer {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            pieces: Vec::new(),
            start: None,
            accumulated_length: 0,
            last_end: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Feed the next piece, returning a segment when this piece completes one
    pub fn add(&mut self, piece: SentencePiece) -> Option<SentenceSegment> {
        if self.is_empty() {
            self.start = Some(piece.start);
        }

        // +1 for the space inserted between pieces on flush
        self.accumulated_length += piece.text.chars().count() + 1;
        self.last_end = Some(piece.end());

        let should_flush = ends_sentence(&piece.text) || self.accumulated_length >= self.max_chars;
        self.pieces.push(piece.text);

        if should_flush { self.flush() } else { None }
    }

    /// Emit whatever is buffered, even without a terminator
    pub fn finish(&mut self) -> Option<SentenceSegment> {
        self.flush()
    }

    fn flush(&mut self) -> Option<SentenceSegment> {
        let pieces = mem::take(&mut self.pieces);
        let start = self.start.take();
        let last_end = self.last_end.take();
        self.accumulated_length = 0;

        match (start, last_end) {
            (Some(start), Some(end)) if !pieces.is_empty() => Some(SentenceSegment {
                text: pieces.join(" ").trim().to_string(),
                start,
                duration: round_millis(end - start),
            }),
            _ => None,
        }
    }
}
