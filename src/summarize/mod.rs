//! Chunked summarization.
//!
//! Feeds each chunk of a transcript to a summarization service, tolerating
//! per-chunk failure, and aggregates the partial summaries into a single
//! outcome with a per-chunk record.

mod assembler;
mod openai;

pub use assembler::{summary_bounds, SummaryAssembler, DEFAULT_WORD_CEILING};
pub use openai::OpenAiSummarizer;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for summarization services.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize bounded text into roughly `min_words`..=`max_words` words.
    async fn summarize(&self, text: &str, min_words: usize, max_words: usize) -> Result<String>;
}

/// Receiver for incremental progress reports.
///
/// `fraction` is the completed share of the run in `0.0..=1.0`. Reports are
/// fire-and-forget; implementations must not fail.
pub trait ProgressSink: Send + Sync {
    fn report(&self, fraction: f64);
}

/// Progress sink that discards all reports.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _fraction: f64) {}
}

/// Result of summarizing a single chunk.
///
/// A failed chunk keeps its slot so the aggregate ordering is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSummaryResult {
    /// Index of the source chunk.
    pub chunk_index: usize,
    /// Summary text, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Whether summarization of this chunk failed.
    pub failed: bool,
    /// Failure reason, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ChunkSummaryResult {
    pub fn success(chunk_index: usize, text: String) -> Self {
        Self { chunk_index, text: Some(text), failed: false, error_detail: None }
    }

    pub fn failure(chunk_index: usize, error_detail: String) -> Self {
        Self { chunk_index, text: None, failed: true, error_detail: Some(error_detail) }
    }
}

/// Aggregate outcome of a chunked summarization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutcome {
    /// Successful chunk summaries joined by single spaces, in original order.
    pub final_text: String,
    /// One entry per attempted chunk, in order.
    pub chunk_results: Vec<ChunkSummaryResult>,
    /// Number of chunks attempted (always equals `chunk_results.len()`).
    pub attempted_chunks: usize,
    /// Number of chunks that produced a summary.
    pub succeeded_chunks: usize,
}

impl SummaryOutcome {
    /// Build an outcome from per-chunk results.
    pub fn from_results(chunk_results: Vec<ChunkSummaryResult>) -> Self {
        let attempted_chunks = chunk_results.len();
        let succeeded_chunks = chunk_results.iter().filter(|r| !r.failed).count();
        let final_text = chunk_results
            .iter()
            .filter_map(|r| r.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ");

        Self { final_text, chunk_results, attempted_chunks, succeeded_chunks }
    }

    /// Whether any chunk failed.
    pub fn is_degraded(&self) -> bool {
        self.succeeded_chunks < self.attempted_chunks
    }

    /// Whether every attempted chunk failed.
    ///
    /// An empty input (zero attempts) is not a failure.
    pub fn is_failed(&self) -> bool {
        self.attempted_chunks > 0 && self.succeeded_chunks == 0
    }
}
