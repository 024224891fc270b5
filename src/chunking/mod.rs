//! Sentence-respecting text chunking.
//!
//! Splits arbitrarily long transcripts into bounded segments so each fits
//! the summarization model's input window. Chunk boundaries never fall
//! mid-sentence.

use serde::{Deserialize, Serialize};

/// A bounded, sentence-aligned segment of a longer text.
///
/// Chunks form an ordered sequence; summaries are reassembled in the same
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in the output sequence.
    pub index: usize,
    /// Text content.
    pub text: String,
    /// Length of `text` in characters.
    pub char_length: usize,
}

impl Chunk {
    fn new(index: usize, text: String) -> Self {
        let char_length = text.chars().count();
        Self { index, text, char_length }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Split text into sentence-aligned chunks of at most `max_chars` characters.
///
/// Newlines are normalized to spaces, then the text is cut into sentence-like
/// units at boundaries following `.`, `!` or `?` plus whitespace. Sentences
/// accumulate into a chunk until appending the next one (with a joining
/// space) would exceed `max_chars`. A single sentence longer than `max_chars`
/// is kept whole in its own chunk rather than split mid-sentence, so chunk
/// length may exceed the cap in that case.
///
/// Empty or whitespace-only input yields no chunks. Text without any sentence
/// terminator becomes one chunk holding the whole trimmed text. `max_chars`
/// must be greater than zero.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();

    for sentence in split_sentences(text) {
        if buffer.is_empty() {
            buffer = sentence;
        } else if char_len(&buffer) + 1 + char_len(&sentence) > max_chars {
            chunks.push(Chunk::new(chunks.len(), std::mem::take(&mut buffer)));
            buffer = sentence;
        } else {
            buffer.push(' ');
            buffer.push_str(&sentence);
        }
    }

    if !buffer.is_empty() {
        chunks.push(Chunk::new(chunks.len(), buffer));
    }

    chunks
}

/// Split text into sentence-like units, normalizing newlines to spaces.
///
/// A sentence ends at `.`, `!` or `?` when the next character is whitespace
/// or end of input. Trailing text without a terminator is kept as a final
/// unit.
fn split_sentences(text: &str) -> Vec<String> {
    let normalized = text.replace(['\r', '\n'], " ");

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = normalized.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |next| next.is_whitespace()) {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sentences_merge_into_one_chunk() {
        let chunks = chunk_text("One. Two. Three.", 100);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "One. Two. Three.");
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].char_length, 16);
    }

    #[test]
    fn test_boundary_arithmetic() {
        // Each sentence nearly fills the cap alone, so no merging occurs.
        let chunks = chunk_text("Sentence one. Sentence two. Sentence three.", 20);

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Sentence one.", "Sentence two.", "Sentence three."]);
        assert_eq!(chunks.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_chunk_lengths_respect_cap() {
        let text = "Alpha beta gamma. Delta epsilon. Zeta eta theta iota. Kappa. Lambda mu nu xi omicron.";
        let chunks = chunk_text(text, 40);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.char_length <= 40, "chunk {} too long: {}", chunk.index, chunk.char_length);
        }
    }

    #[test]
    fn test_content_preserved_in_order() {
        let text = "First point. Second point! Third point? Fourth point.";
        let chunks = chunk_text(text, 25);

        let rejoined = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_oversized_sentence_kept_whole() {
        let long = "This single sentence is much longer than the configured chunk cap.";
        let text = format!("Short. {} Tail.", long);
        let chunks = chunk_text(&text, 20);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "Short.");
        assert_eq!(chunks[1].text, long);
        assert!(chunks[1].char_length > 20);
        assert_eq!(chunks[2].text, "Tail.");
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_text("", 10).is_empty());
        assert!(chunk_text("   \n\t  ", 10).is_empty());
    }

    #[test]
    fn test_unterminated_text_becomes_single_unit() {
        let chunks = chunk_text("  no terminal punctuation here  ", 1000);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "no terminal punctuation here");
    }

    #[test]
    fn test_newlines_normalized_to_spaces() {
        let chunks = chunk_text("Line one.\nLine two.\r\nLine three.", 100);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Line one. Line two. Line three.");
    }

    #[test]
    fn test_punctuation_without_whitespace_is_not_a_boundary() {
        let chunks = chunk_text("Version 2.5 shipped today. Nothing broke.", 30);

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Version 2.5 shipped today.", "Nothing broke."]);
    }

    #[test]
    fn test_word_count() {
        let chunks = chunk_text("Count these five words now.", 100);
        assert_eq!(chunks[0].word_count(), 5);
    }
}
