//! Audio acquisition for speech recognition.
//!
//! Provides the audio fetcher abstraction, the scoped-lifetime audio asset,
//! and ffmpeg-based segmentation for long recordings.

mod downloader;
mod segment;

pub use downloader::YtDlpAudioFetcher;
pub use segment::segment_audio;

use crate::error::Result;
use crate::video::VideoId;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A downloaded audio file owned by a single acquisition call.
///
/// The file is deleted when the asset is dropped, so it cannot outlive the
/// call that created it — whether transcription succeeded, failed, or the
/// surrounding future was abandoned.
#[derive(Debug)]
pub struct AudioAsset {
    path: PathBuf,
    video_id: VideoId,
}

impl AudioAsset {
    pub fn new(path: PathBuf, video_id: VideoId) -> Self {
        Self { path, video_id }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }
}

impl Drop for AudioAsset {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to remove audio file {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Trait for audio providers.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Download the audio track for a video, yielding an owned local file.
    async fn fetch(&self, url: &str, video_id: &VideoId) -> Result<AudioAsset>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_video_id() -> VideoId {
        VideoId::extract("https://youtu.be/dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_asset_removes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dQw4w9WgXcQ.mp3");
        std::fs::write(&path, b"fake audio").unwrap();

        let asset = AudioAsset::new(path.clone(), test_video_id());
        assert!(path.exists());

        drop(asset);
        assert!(!path.exists());
    }

    #[test]
    fn test_asset_drop_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.mp3");

        // Never created; drop must not panic.
        let asset = AudioAsset::new(path, test_video_id());
        drop(asset);
    }
}
