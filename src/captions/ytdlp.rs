//! yt-dlp backed caption source.
//!
//! Downloads existing subtitle tracks (manual or auto-generated) as WebVTT
//! and flattens them to plain text.

use super::{CaptionFetch, CaptionSource};
use crate::error::{OppsumError, Result};
use crate::video::VideoId;
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Caption source that shells out to yt-dlp.
pub struct YtDlpCaptionSource {
    languages: Vec<String>,
    temp_dir: PathBuf,
}

impl YtDlpCaptionSource {
    /// Create a caption source writing temporary subtitle files to `temp_dir`.
    pub fn new(languages: Vec<String>, temp_dir: PathBuf) -> Self {
        Self { languages, temp_dir }
    }

    fn sub_langs(&self) -> String {
        if self.languages.is_empty() {
            "en".to_string()
        } else {
            self.languages.join(",")
        }
    }

    /// Locate a downloaded subtitle file for the video, regardless of which
    /// language tag yt-dlp appended.
    fn find_subtitle_file(&self, video_id: &VideoId) -> Option<PathBuf> {
        let prefix = format!("{}.", video_id);
        let entries = std::fs::read_dir(&self.temp_dir).ok()?;

        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&prefix) && name.ends_with(".vtt") {
                return Some(entry.path());
            }
        }
        None
    }
}

#[async_trait]
impl CaptionSource for YtDlpCaptionSource {
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch(&self, video_id: &VideoId) -> Result<CaptionFetch> {
        std::fs::create_dir_all(&self.temp_dir)?;

        let template = self.temp_dir.join(format!("{}.%(ext)s", video_id));

        let result = Command::new("yt-dlp")
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs").arg(self.sub_langs())
            .arg("--sub-format").arg("vtt")
            .arg("--output").arg(template.to_str().unwrap_or_default())
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(video_id.watch_url())
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
                return Err(OppsumError::Captions(format!("yt-dlp execution failed: {e}")));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.to_lowercase().contains("disabled") {
                debug!("Captions reported as disabled");
                return Ok(CaptionFetch::Disabled);
            }
            return Err(OppsumError::Captions(format!("yt-dlp failed: {}", stderr.trim())));
        }

        let Some(subtitle_path) = self.find_subtitle_file(video_id) else {
            debug!("No subtitle track produced");
            return Ok(CaptionFetch::NotFound);
        };

        let raw = std::fs::read_to_string(&subtitle_path)?;
        if let Err(e) = std::fs::remove_file(&subtitle_path) {
            warn!("Failed to remove subtitle file {}: {}", subtitle_path.display(), e);
        }

        let text = vtt_to_text(&raw);
        if text.is_empty() {
            return Ok(CaptionFetch::NotFound);
        }

        debug!("Caption track extracted ({} chars)", text.len());
        Ok(CaptionFetch::Available(text))
    }
}

/// Flatten a WebVTT document to plain text.
///
/// Drops the header, cue numbers, timing lines and inline tags, and collapses
/// the consecutive duplicate lines typical of rolling auto-generated captions.
fn vtt_to_text(raw: &str) -> String {
    let mut lines_out: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with("WEBVTT")
            || line.starts_with("Kind:")
            || line.starts_with("Language:")
            || line.starts_with("NOTE")
            || line.starts_with("STYLE")
            || line.contains("-->")
            || line.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }

        let cleaned = decode_entities(&cue_tag_pattern().replace_all(line, ""));
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            continue;
        }
        if lines_out.last().map(String::as_str) == Some(cleaned) {
            continue;
        }
        lines_out.push(cleaned.to_string());
    }

    lines_out.join(" ")
}

/// Inline cue tags such as `<00:00:01.000>`, `<c>` and `</c>`.
fn cue_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid cue tag pattern"))
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vtt_to_text_strips_structure() {
        let vtt = "WEBVTT\nKind: captions\nLanguage: en\n\n1\n00:00:00.000 --> 00:00:02.000\nHello there.\n\n2\n00:00:02.000 --> 00:00:04.000\nGeneral Kenobi.\n";
        assert_eq!(vtt_to_text(vtt), "Hello there. General Kenobi.");
    }

    #[test]
    fn test_vtt_to_text_collapses_rolling_duplicates() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nfirst line\n\n00:00:02.000 --> 00:00:04.000\nfirst line\nsecond line\n";
        assert_eq!(vtt_to_text(vtt), "first line second line");
    }

    #[test]
    fn test_vtt_to_text_strips_inline_tags_and_entities() {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\n<c>tom &amp; jerry<00:00:01.000></c>\n";
        assert_eq!(vtt_to_text(vtt), "tom & jerry");
    }

    #[test]
    fn test_vtt_to_text_empty_document() {
        assert_eq!(vtt_to_text("WEBVTT\n"), "");
        assert_eq!(vtt_to_text(""), "");
    }
}
