/*!
 * Sentence boundary detection.
 *
 * A piece of text ends a sentence when it finishes with a run of terminator
 * characters. Latin, CJK fullwidth and ellipsis terminators are recognized.
 * No attempt is made to tell abbreviations apart from real sentence ends.
 */

/// Characters recognized as ending a sentence
pub const SENTENCE_TERMINATORS: [char; 7] = ['.', '!', '?', '？', '！', '。', '…'];

/// Check whether a single character is a sentence terminator
pub fn is_terminator(c: char) -> bool {
    SENTENCE_TERMINATORS.contains(&c)
}

/// Number of terminator characters at the very end of `text`
pub fn trailing_terminator_run(text: &str) -> usize {
    text.chars().rev().take_while(|c| is_terminator(*c)).count()
}

/// Check whether `text` ends a sentence
pub fn ends_sentence(text: &str) -> bool {
    trailing_terminator_run(text) > 0
}
