/*!
 * Caption fragment to sentence segmentation.
 *
 * Automatic captions arrive as arbitrary line-sized fragments. This module
 * regroups them into punctuation-delimited sentences:
 *
 * - `boundary`: sentence terminator detection
 * - `splitter`: splitting one fragment that holds several sentences, with
 *   time shared out by character length
 * - `buffer`: accumulating pieces across fragments until a sentence ends or
 *   the text grows past the character threshold
 *
 * Timing is interpolated from character counts. It approximates where each
 * sentence is spoken; it is not aligned to the audio.
 */

pub mod boundary;
pub(crate) mod buffer;
pub(crate) mod splitter;

use log::debug;

use crate::transcript::{RawFragment, SentenceSegment};

use self::buffer::SentenceBuffer;
use self::splitter::split_fragment;

pub use self::boundary::{ends_sentence, SENTENCE_TERMINATORS};

/// Default flush threshold in characters
pub const DEFAULT_MAX_CHARS: usize = 120;

/// Merge caption fragments into sentence segments.
///
/// Fragments must be in non-decreasing start order. Fragments whose text is
/// blank are skipped. A single buffer spans the whole input, so a sentence
/// may stretch over many fragments; whatever is left at the end is emitted
/// as a final segment even without terminal punctuation.
pub fn merge_segments_to_sentences<'a, I>(fragments: I, max_chars: usize) -> Vec<SentenceSegment>
where
    I: IntoIterator<Item = &'a RawFragment>,
{
    let mut buffer = SentenceBuffer::new(max_chars);
    let mut merged = Vec::new();

    for fragment in fragments {
        if fragment.text.trim().is_empty() {
            continue;
        }

        for piece in split_fragment(fragment) {
            if let Some(segment) = buffer.add(piece) {
                merged.push(segment);
            }
        }
    }

    if let Some(segment) = buffer.finish() {
        merged.push(segment);
    }

    merged
}

// @struct: Sentence merger carrying its flush threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceMerger {
    max_chars: usize,
}

impl SentenceMerger {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Merge a whole transcript
    pub fn merge(&self, fragments: &[RawFragment]) -> Vec<SentenceSegment> {
        let sentences = merge_segments_to_sentences(fragments, self.max_chars);
        debug!(
            "Merged {} fragments into {} sentences (max_chars = {})",
            fragments.len(),
            sentences.len(),
            self.max_chars
        );
        sentences
    }
}

impl Default for SentenceMerger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}
