//! Sequential chunk summarization with partial-failure tolerance.

use super::{ChunkSummaryResult, NoopProgress, ProgressSink, SummaryOutcome, Summarizer};
use crate::chunking::Chunk;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Default ceiling on requested summary length, in words.
pub const DEFAULT_WORD_CEILING: usize = 140;

/// Feeds chunks to a summarizer one at a time and aggregates the results.
///
/// A failing chunk is recorded and skipped; it never aborts the run. Chunks
/// are processed strictly in order, one at a time.
pub struct SummaryAssembler {
    summarizer: Arc<dyn Summarizer>,
    progress: Arc<dyn ProgressSink>,
    word_ceiling: usize,
}

impl SummaryAssembler {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            summarizer,
            progress: Arc::new(NoopProgress),
            word_ceiling: DEFAULT_WORD_CEILING,
        }
    }

    /// Set the progress sink (defaults to discarding reports).
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Set the ceiling on requested summary length.
    pub fn with_word_ceiling(mut self, word_ceiling: usize) -> Self {
        self.word_ceiling = word_ceiling;
        self
    }

    /// Summarize chunks in order, reporting progress after each attempt.
    #[instrument(skip_all, fields(chunks = chunks.len()))]
    pub async fn summarize_chunks(&self, chunks: &[Chunk]) -> SummaryOutcome {
        let total = chunks.len();
        let mut results = Vec::with_capacity(total);

        for chunk in chunks {
            let (min_words, max_words) = summary_bounds(chunk.word_count(), self.word_ceiling);
            debug!(
                "Summarizing chunk {} ({} chars, {}-{} words requested)",
                chunk.index, chunk.char_length, min_words, max_words
            );

            match self.summarizer.summarize(&chunk.text, min_words, max_words).await {
                Ok(text) => results.push(ChunkSummaryResult::success(chunk.index, text)),
                Err(e) => {
                    warn!("Chunk {} failed to summarize: {}", chunk.index, e);
                    results.push(ChunkSummaryResult::failure(chunk.index, e.to_string()));
                }
            }

            self.progress.report(results.len() as f64 / total as f64);
        }

        SummaryOutcome::from_results(results)
    }
}

/// Derive requested summary length bounds from a chunk's word count.
///
/// The requested length stays proportionate to the input: minimum 10% of the
/// words (at least 15), maximum 40% (at least 40), capped at `ceiling`. When
/// the bounds cross, the minimum drops to `ceiling − 20` territory with a
/// floor of 10.
pub fn summary_bounds(word_count: usize, ceiling: usize) -> (usize, usize) {
    let mut min_words = ((word_count as f64) * 0.10).round() as usize;
    let mut max_words = ((word_count as f64) * 0.40).round() as usize;

    min_words = min_words.max(15);
    max_words = max_words.max(40).min(ceiling);

    if min_words >= max_words {
        min_words = max_words.saturating_sub(20).max(10);
    }

    (min_words, max_words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::chunk_text;
    use crate::error::{OppsumError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeSummarizer {
        fail_indices: Vec<usize>,
        calls: Mutex<usize>,
    }

    impl FakeSummarizer {
        fn failing_on(fail_indices: Vec<usize>) -> Self {
            Self { fail_indices, calls: Mutex::new(0) }
        }
    }

    #[async_trait]
    impl Summarizer for FakeSummarizer {
        async fn summarize(&self, text: &str, _min: usize, _max: usize) -> Result<String> {
            let mut calls = self.calls.lock().unwrap();
            let index = *calls;
            *calls += 1;

            if self.fail_indices.contains(&index) {
                Err(OppsumError::Summarization(format!("chunk {} rejected", index)))
            } else {
                Ok(format!("sum{}:{}", index, text.split_whitespace().next().unwrap_or("")))
            }
        }
    }

    struct RecordingProgress {
        fractions: Mutex<Vec<f64>>,
    }

    impl RecordingProgress {
        fn new() -> Self {
            Self { fractions: Mutex::new(Vec::new()) }
        }
    }

    impl ProgressSink for RecordingProgress {
        fn report(&self, fraction: f64) {
            self.fractions.lock().unwrap().push(fraction);
        }
    }

    fn five_chunks() -> Vec<Chunk> {
        let text = "Aa one. Bb two. Cc three. Dd four. Ee five.";
        let chunks = chunk_text(text, 8);
        assert_eq!(chunks.len(), 5);
        chunks
    }

    #[tokio::test]
    async fn test_partial_failure_preserves_slots_and_order() {
        let summarizer = Arc::new(FakeSummarizer::failing_on(vec![1, 2, 4]));
        let assembler = SummaryAssembler::new(summarizer);

        let outcome = assembler.summarize_chunks(&five_chunks()).await;

        assert_eq!(outcome.attempted_chunks, 5);
        assert_eq!(outcome.succeeded_chunks, 2);
        assert_eq!(outcome.chunk_results.len(), 5);
        assert_eq!(outcome.final_text, "sum0:Aa sum3:Dd");

        for (i, result) in outcome.chunk_results.iter().enumerate() {
            assert_eq!(result.chunk_index, i);
            assert_eq!(result.failed, [1, 2, 4].contains(&i));
        }
        assert!(outcome.is_degraded());
        assert!(!outcome.is_failed());
    }

    #[tokio::test]
    async fn test_all_chunks_failing_flags_outcome() {
        let summarizer = Arc::new(FakeSummarizer::failing_on(vec![0, 1, 2, 3, 4]));
        let assembler = SummaryAssembler::new(summarizer);

        let outcome = assembler.summarize_chunks(&five_chunks()).await;

        assert_eq!(outcome.final_text, "");
        assert!(outcome.is_failed());
        assert!(outcome.chunk_results.iter().all(|r| r.error_detail.is_some()));
    }

    #[tokio::test]
    async fn test_progress_reported_after_each_chunk() {
        let summarizer = Arc::new(FakeSummarizer::failing_on(vec![2]));
        let progress = Arc::new(RecordingProgress::new());
        let assembler = SummaryAssembler::new(summarizer).with_progress(progress.clone());

        assembler.summarize_chunks(&five_chunks()).await;

        let fractions = progress.fractions.lock().unwrap().clone();
        assert_eq!(fractions, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[tokio::test]
    async fn test_no_chunks_yields_empty_outcome() {
        let summarizer = Arc::new(FakeSummarizer::failing_on(Vec::new()));
        let assembler = SummaryAssembler::new(summarizer);

        let outcome = assembler.summarize_chunks(&[]).await;

        assert_eq!(outcome.attempted_chunks, 0);
        assert!(!outcome.is_failed());
    }

    #[test]
    fn test_summary_bounds_proportional() {
        // Small chunks hit the floors
        assert_eq!(summary_bounds(50, 140), (15, 40));
        // Mid-size chunks scale with word count
        assert_eq!(summary_bounds(300, 140), (30, 120));
        // Large chunks hit the ceiling
        assert_eq!(summary_bounds(1000, 140), (100, 140));
        // Very large chunks would cross; minimum backs off
        assert_eq!(summary_bounds(2000, 140), (120, 140));
    }

    #[test]
    fn test_summary_bounds_tiny_ceiling() {
        let (min, max) = summary_bounds(5000, 25);
        assert_eq!(max, 25);
        assert_eq!(min, 10);
    }
}
