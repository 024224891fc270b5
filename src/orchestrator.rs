//! Pipeline orchestrator for Oppsum.
//!
//! Wires transcript acquisition to chunked summarization.

use crate::audio::YtDlpAudioFetcher;
use crate::captions::YtDlpCaptionSource;
use crate::chunking::chunk_text;
use crate::config::Settings;
use crate::error::{OppsumError, Result};
use crate::summarize::{OpenAiSummarizer, ProgressSink, SummaryAssembler, SummaryOutcome};
use crate::transcript::{Transcript, TranscriptAcquirer, TranscriptSource};
use crate::transcription::WhisperTranscriber;
use crate::video::VideoId;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Oppsum pipeline.
pub struct Orchestrator {
    settings: Settings,
    acquirer: TranscriptAcquirer,
    assembler: SummaryAssembler,
}

impl Orchestrator {
    /// Create a new orchestrator with the default collaborators.
    pub fn new(settings: Settings) -> Result<Self> {
        let temp_dir = settings.temp_dir();
        std::fs::create_dir_all(&temp_dir)?;

        let captions = Arc::new(YtDlpCaptionSource::new(
            settings.captions.languages.clone(),
            temp_dir.clone(),
        ));
        let audio = Arc::new(YtDlpAudioFetcher::new(temp_dir));
        let transcriber = Arc::new(WhisperTranscriber::with_config(
            &settings.transcription.model,
            settings.transcription.language.clone(),
            settings.transcription.segment_seconds,
        ));
        let summarizer = Arc::new(OpenAiSummarizer::with_config(
            &settings.summarization.model,
            settings.summarization.temperature,
        ));

        let acquirer = TranscriptAcquirer::new(captions, audio, transcriber);
        let assembler = SummaryAssembler::new(summarizer)
            .with_word_ceiling(settings.summarization.max_summary_words);

        Ok(Self { settings, acquirer, assembler })
    }

    /// Create an orchestrator from injected components.
    pub fn with_components(
        settings: Settings,
        acquirer: TranscriptAcquirer,
        assembler: SummaryAssembler,
    ) -> Self {
        Self { settings, acquirer, assembler }
    }

    /// Set the progress sink fed during summarization.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.assembler = self.assembler.with_progress(progress);
        self
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Acquire a transcript for a video URL.
    pub async fn acquire_transcript(&self, url: &str) -> Result<Transcript> {
        self.acquirer.acquire(url).await
    }

    /// Chunk and summarize transcript text.
    ///
    /// Never aborts on individual chunk failures; the returned outcome
    /// records every attempt.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn summarize_transcript(
        &self,
        text: &str,
        max_chars_per_chunk: usize,
    ) -> SummaryOutcome {
        let chunks = chunk_text(text, max_chars_per_chunk);
        info!("Summarizing {} chunks", chunks.len());
        self.assembler.summarize_chunks(&chunks).await
    }

    /// Run the full URL-to-summary pipeline.
    ///
    /// Fails with `AllChunksFailed` when a transcript was acquired but no
    /// chunk could be summarized.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn summarize_url(&self, url: &str) -> Result<VideoSummary> {
        let transcript = self.acquirer.acquire(url).await?;
        info!(
            "Transcript acquired via {} ({} chars)",
            transcript.source,
            transcript.char_count()
        );

        let outcome = self
            .summarize_transcript(&transcript.text, self.settings.summarization.max_chars_per_chunk)
            .await;

        if outcome.is_failed() {
            return Err(OppsumError::AllChunksFailed);
        }

        Ok(VideoSummary {
            video_id: transcript.video_id.clone(),
            source: transcript.source,
            transcript_chars: transcript.char_count(),
            outcome,
        })
    }
}

/// Result of the full URL-to-summary pipeline.
#[derive(Debug, serde::Serialize)]
pub struct VideoSummary {
    /// Video identifier.
    pub video_id: VideoId,
    /// How the transcript was obtained.
    pub source: TranscriptSource,
    /// Length of the acquired transcript in characters.
    pub transcript_chars: usize,
    /// Aggregate summarization outcome.
    pub outcome: SummaryOutcome,
}
