//! Video identification and metadata.
//!
//! Parses video URLs into canonical identifiers and looks up platform
//! metadata (title, duration, channel) via yt-dlp.

mod id;
mod metadata;

pub use id::VideoId;
pub use metadata::{fetch_metadata, VideoMetadata};
