//! Audio download via yt-dlp.

use super::{AudioAsset, AudioFetcher};
use crate::error::{OppsumError, Result};
use crate::video::VideoId;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Audio fetcher that shells out to yt-dlp.
///
/// The download is extracted to MP3 by yt-dlp's own ffmpeg postprocessor,
/// so a successful fetch always yields an `.mp3` file named after the
/// video. Downstream segmentation relies on that format.
pub struct YtDlpAudioFetcher {
    output_dir: PathBuf,
}

impl YtDlpAudioFetcher {
    /// Create a fetcher writing downloads to `output_dir`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

#[async_trait]
impl AudioFetcher for YtDlpAudioFetcher {
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch(&self, url: &str, video_id: &VideoId) -> Result<AudioAsset> {
        std::fs::create_dir_all(&self.output_dir)?;

        let audio_path = self.output_dir.join(format!("{}.mp3", video_id));
        let template = self.output_dir.join(format!("{}.%(ext)s", video_id));

        info!("Downloading audio from {}", url);

        let result = Command::new("yt-dlp")
            .arg("--extract-audio")
            .arg("--audio-format").arg("mp3")
            .arg("--audio-quality").arg("0")
            .arg("--output").arg(template.to_str().unwrap_or_default())
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OppsumError::ToolNotFound("yt-dlp".into()));
            }
            Err(e) => {
                return Err(OppsumError::AudioDownload(format!("yt-dlp execution failed: {e}")));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OppsumError::AudioDownload(format!("yt-dlp failed: {}", stderr.trim())));
        }

        // The mp3 postprocessor requires ffmpeg; a success exit without the
        // expected file means the extraction step was skipped.
        if !audio_path.exists() {
            return Err(OppsumError::AudioDownload(
                "yt-dlp succeeded but produced no mp3 file".into(),
            ));
        }

        Ok(AudioAsset::new(audio_path, video_id.clone()))
    }
}
