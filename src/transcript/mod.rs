//! Transcript acquisition.
//!
//! Produces one transcript per video, preferring platform captions and
//! falling back to audio download plus speech recognition when no caption
//! track is usable.

use crate::audio::AudioFetcher;
use crate::captions::{CaptionFetch, CaptionSource};
use crate::error::{OppsumError, Result};
use crate::transcription::Transcriber;
use crate::video::VideoId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// How a transcript was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptSource {
    Captions,
    SpeechRecognition,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Captions => write!(f, "captions"),
            TranscriptSource::SpeechRecognition => write!(f, "speech-recognition"),
        }
    }
}

/// A transcript with provenance. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video this transcript belongs to.
    pub video_id: VideoId,
    /// Full transcript text.
    pub text: String,
    /// How the text was obtained.
    pub source: TranscriptSource,
}

impl Transcript {
    pub fn new(video_id: VideoId, text: String, source: TranscriptSource) -> Self {
        Self { video_id, text, source }
    }

    /// Length of the transcript in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Orchestrates caption lookup with a speech-recognition fallback.
///
/// Captions always win over speech recognition when a track exists; this
/// ordering is a contract, not a heuristic.
pub struct TranscriptAcquirer {
    captions: Arc<dyn CaptionSource>,
    audio: Arc<dyn AudioFetcher>,
    transcriber: Arc<dyn Transcriber>,
}

impl TranscriptAcquirer {
    pub fn new(
        captions: Arc<dyn CaptionSource>,
        audio: Arc<dyn AudioFetcher>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self { captions, audio, transcriber }
    }

    /// Acquire a transcript for a video URL.
    ///
    /// The downloaded audio file, if any, is removed on every exit path,
    /// including a failed transcription.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn acquire(&self, url: &str) -> Result<Transcript> {
        let video_id =
            VideoId::extract(url).ok_or_else(|| OppsumError::InvalidUrl(url.to_string()))?;

        match self.captions.fetch(&video_id).await {
            Ok(CaptionFetch::Available(text)) if !text.trim().is_empty() => {
                info!("Using caption track for {} ({} chars)", video_id, text.len());
                return Ok(Transcript::new(video_id, text, TranscriptSource::Captions));
            }
            Ok(CaptionFetch::Available(_)) => debug!("Caption track for {} is empty", video_id),
            Ok(CaptionFetch::Disabled) => debug!("Captions are disabled for {}", video_id),
            Ok(CaptionFetch::NotFound) => debug!("No caption track for {}", video_id),
            Err(e) => warn!("Caption lookup for {} failed: {}", video_id, e),
        }

        info!("Falling back to speech recognition for {}", video_id);

        let asset = self.audio.fetch(url, &video_id).await.map_err(|e| match e {
            e @ (OppsumError::AudioDownload(_) | OppsumError::ToolNotFound(_)) => e,
            other => OppsumError::AudioDownload(other.to_string()),
        })?;

        // The asset deletes its file on drop, so the early returns below
        // still clean up the download.
        let text = self
            .transcriber
            .transcribe(asset.path())
            .await
            .map_err(|e| match e {
                e @ (OppsumError::Transcription(_) | OppsumError::ToolNotFound(_)) => e,
                other => OppsumError::Transcription(other.to_string()),
            })?;

        drop(asset);

        if text.trim().is_empty() {
            return Err(OppsumError::Transcription(format!(
                "Speech recognition produced no text for {}",
                video_id
            )));
        }

        Ok(Transcript::new(video_id, text, TranscriptSource::SpeechRecognition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioAsset;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, Ordering};

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    struct FakeCaptions {
        outcome: Result<CaptionFetch>,
    }

    #[async_trait]
    impl CaptionSource for FakeCaptions {
        async fn fetch(&self, _video_id: &VideoId) -> Result<CaptionFetch> {
            match &self.outcome {
                Ok(fetch) => Ok(fetch.clone()),
                Err(_) => Err(OppsumError::Captions("caption lookup broke".into())),
            }
        }
    }

    struct FakeAudio {
        dir: PathBuf,
        fail: bool,
    }

    #[async_trait]
    impl AudioFetcher for FakeAudio {
        async fn fetch(&self, _url: &str, video_id: &VideoId) -> Result<AudioAsset> {
            if self.fail {
                return Err(OppsumError::AudioDownload("network unreachable".into()));
            }
            let path = self.dir.join(format!("{}.mp3", video_id));
            std::fs::write(&path, b"fake audio")?;
            Ok(AudioAsset::new(path, video_id.clone()))
        }
    }

    struct FakeTranscriber {
        text: Option<String>,
        invoked: AtomicBool,
    }

    impl FakeTranscriber {
        fn returning(text: &str) -> Self {
            Self { text: Some(text.to_string()), invoked: AtomicBool::new(false) }
        }

        fn failing() -> Self {
            Self { text: None, invoked: AtomicBool::new(false) }
        }
    }

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
            self.invoked.store(true, Ordering::SeqCst);
            self.text
                .clone()
                .ok_or_else(|| OppsumError::Transcription("model crashed".into()))
        }
    }

    fn acquirer(
        captions: Result<CaptionFetch>,
        audio_dir: PathBuf,
        audio_fail: bool,
        transcriber: Arc<FakeTranscriber>,
    ) -> TranscriptAcquirer {
        TranscriptAcquirer::new(
            Arc::new(FakeCaptions { outcome: captions }),
            Arc::new(FakeAudio { dir: audio_dir, fail: audio_fail }),
            transcriber,
        )
    }

    #[tokio::test]
    async fn test_captions_preferred_over_speech_recognition() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::returning("spoken words"));
        let acquirer = acquirer(
            Ok(CaptionFetch::Available("caption words".into())),
            dir.path().to_path_buf(),
            false,
            transcriber.clone(),
        );

        let transcript = acquirer.acquire(URL).await.unwrap();

        assert_eq!(transcript.text, "caption words");
        assert_eq!(transcript.source, TranscriptSource::Captions);
        assert_eq!(transcript.video_id.as_str(), "dQw4w9WgXcQ");
        assert!(!transcriber.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_fallback_on_caption_miss() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::returning("spoken words"));
        let acquirer = acquirer(
            Ok(CaptionFetch::NotFound),
            dir.path().to_path_buf(),
            false,
            transcriber.clone(),
        );

        let transcript = acquirer.acquire(URL).await.unwrap();

        assert_eq!(transcript.text, "spoken words");
        assert_eq!(transcript.source, TranscriptSource::SpeechRecognition);
        assert!(transcriber.invoked.load(Ordering::SeqCst));
        // Audio file must not outlive the acquisition call
        assert!(!dir.path().join("dQw4w9WgXcQ.mp3").exists());
    }

    #[tokio::test]
    async fn test_fallback_on_disabled_captions() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::returning("spoken words"));
        let acquirer = acquirer(
            Ok(CaptionFetch::Disabled),
            dir.path().to_path_buf(),
            false,
            transcriber.clone(),
        );

        let transcript = acquirer.acquire(URL).await.unwrap();
        assert_eq!(transcript.source, TranscriptSource::SpeechRecognition);
    }

    #[tokio::test]
    async fn test_caption_lookup_error_is_soft() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::returning("spoken words"));
        let acquirer = acquirer(
            Err(OppsumError::Captions("boom".into())),
            dir.path().to_path_buf(),
            false,
            transcriber,
        );

        let transcript = acquirer.acquire(URL).await.unwrap();
        assert_eq!(transcript.source, TranscriptSource::SpeechRecognition);
    }

    #[tokio::test]
    async fn test_audio_download_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::returning("never used"));
        let acquirer = acquirer(
            Ok(CaptionFetch::NotFound),
            dir.path().to_path_buf(),
            true,
            transcriber.clone(),
        );

        let err = acquirer.acquire(URL).await.unwrap_err();

        assert!(matches!(err, OppsumError::AudioDownload(_)));
        assert!(!transcriber.invoked.load(Ordering::SeqCst));
        assert!(!dir.path().join("dQw4w9WgXcQ.mp3").exists());
    }

    #[tokio::test]
    async fn test_failed_transcription_still_removes_audio() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::failing());
        let acquirer = acquirer(
            Ok(CaptionFetch::NotFound),
            dir.path().to_path_buf(),
            false,
            transcriber,
        );

        let err = acquirer.acquire(URL).await.unwrap_err();

        assert!(matches!(err, OppsumError::Transcription(_)));
        assert!(!dir.path().join("dQw4w9WgXcQ.mp3").exists());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_any_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::returning("never used"));
        let acquirer = acquirer(
            Ok(CaptionFetch::Available("captions".into())),
            dir.path().to_path_buf(),
            false,
            transcriber.clone(),
        );

        let err = acquirer.acquire("https://example.com/clip").await.unwrap_err();

        assert!(matches!(err, OppsumError::InvalidUrl(_)));
        assert!(!transcriber.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_caption_track_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let transcriber = Arc::new(FakeTranscriber::returning("spoken words"));
        let acquirer = acquirer(
            Ok(CaptionFetch::Available("   ".into())),
            dir.path().to_path_buf(),
            false,
            transcriber,
        );

        let transcript = acquirer.acquire(URL).await.unwrap();
        assert_eq!(transcript.source, TranscriptSource::SpeechRecognition);
    }
}
