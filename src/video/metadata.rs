//! Video metadata lookup via yt-dlp.

use super::VideoId;
use crate::error::{OppsumError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Metadata about a video, as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video identifier.
    pub id: VideoId,
    /// Title.
    pub title: String,
    /// Duration in seconds (if known).
    pub duration_seconds: Option<u32>,
    /// Channel or uploader name (if available).
    pub channel: Option<String>,
    /// Publication date (if available).
    pub published_at: Option<DateTime<Utc>>,
    /// Canonical watch URL.
    pub source_url: String,
}

/// Fetch metadata for a video using yt-dlp.
#[instrument(fields(video_id = %video_id))]
pub async fn fetch_metadata(video_id: &VideoId) -> Result<VideoMetadata> {
    let url = video_id.watch_url();

    let output = tokio::process::Command::new("yt-dlp")
        .args([
            "--dump-json",
            "--no-download",
            "--no-warnings",
            "--no-playlist",
            &url,
        ])
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OppsumError::ToolNotFound("yt-dlp".to_string())
            } else {
                OppsumError::ToolFailed(format!("Failed to run yt-dlp: {}", e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OppsumError::InvalidInput(format!(
            "Video {} not found or unavailable: {}",
            video_id,
            stderr.trim()
        )));
    }

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| OppsumError::ToolFailed(format!("Failed to parse yt-dlp output: {}", e)))?;

    let title = json["title"].as_str().unwrap_or("Unknown Title").to_string();

    let duration_seconds = json["duration"].as_f64().map(|d| d as u32);

    let channel = json["channel"]
        .as_str()
        .or_else(|| json["uploader"].as_str())
        .map(|s| s.to_string());

    // yt-dlp reports the upload date as YYYYMMDD
    let published_at = json["upload_date"].as_str().and_then(parse_upload_date);

    debug!("Fetched metadata for '{}'", title);

    Ok(VideoMetadata {
        id: video_id.clone(),
        title,
        duration_seconds,
        channel,
        published_at,
        source_url: url,
    })
}

fn parse_upload_date(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.len() != 8 {
        return None;
    }
    chrono::NaiveDate::parse_from_str(date_str, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload_date() {
        let parsed = parse_upload_date("20240131").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-31T00:00:00+00:00");

        assert!(parse_upload_date("2024-01-31").is_none());
        assert!(parse_upload_date("").is_none());
    }
}
