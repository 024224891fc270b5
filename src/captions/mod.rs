//! Caption track retrieval.
//!
//! Provides a trait-based interface for fetching platform-provided caption
//! text, so the transcript acquirer can prefer captions over the audio
//! round-trip.

mod ytdlp;

pub use ytdlp::YtDlpCaptionSource;

use crate::error::Result;
use crate::video::VideoId;
use async_trait::async_trait;

/// Outcome of a caption lookup.
///
/// `Disabled` and `NotFound` are distinct reasons, but both are soft misses
/// that trigger the speech-recognition fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionFetch {
    /// A caption track exists; its plain-text content.
    Available(String),
    /// The uploader disabled captions for this video.
    Disabled,
    /// No caption track exists in the requested languages.
    NotFound,
}

/// Trait for caption providers.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Look up the caption text for a video.
    async fn fetch(&self, video_id: &VideoId) -> Result<CaptionFetch>;
}
