//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::audio::segment_audio;
use crate::error::{OppsumError, Result};
use crate::openai::create_client;
use async_openai::types::{AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, instrument};

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    language: Option<String>,
    segment_seconds: u32,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with default settings.
    pub fn new() -> Self {
        Self::with_config("whisper-1", None, 600)
    }

    /// Create a new Whisper transcriber with custom configuration.
    pub fn with_config(model: &str, language: Option<String>, segment_seconds: u32) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            language,
            segment_seconds,
        }
    }

    /// Transcribe a single audio file (no splitting).
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_single(&self, audio_path: &Path) -> Result<String> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::Json);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| OppsumError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| OppsumError::OpenAI(format!("Whisper API error: {}", e)))?;

        Ok(response.text.trim().to_string())
    }
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let temp_dir = tempfile::tempdir()?;
        let segments = segment_audio(audio_path, temp_dir.path(), self.segment_seconds).await?;

        if segments.len() == 1 {
            return self.transcribe_single(audio_path).await;
        }

        info!("Transcribing {} audio segments with {}", segments.len(), self.model);

        // Segments go through the speech model one at a time, in order.
        let mut parts = Vec::with_capacity(segments.len());
        for (idx, segment_path) in segments.iter().enumerate() {
            let text = self.transcribe_single(segment_path).await.map_err(|e| {
                OppsumError::Transcription(format!(
                    "Segment {} of {} failed: {}",
                    idx + 1,
                    segments.len(),
                    e
                ))
            })?;
            if !text.is_empty() {
                parts.push(text);
            }
        }

        Ok(parts.join(" "))
    }
}
