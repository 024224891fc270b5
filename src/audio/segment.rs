//! Segmentation of long audio files.
//!
//! The speech API caps upload size, so recordings are cut into bounded
//! segments before transcription. Input is the fetcher's MP3, whose
//! frame-aligned format lets ffmpeg's segment muxer cut without
//! re-encoding.

use crate::error::{OppsumError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Cut an audio file into segments of at most `segment_seconds` each.
///
/// Returns the segment paths in playback order. Audio shorter than one
/// segment still yields a single segment file in `output_dir`.
#[instrument(skip_all)]
pub async fn segment_audio(
    source: &Path,
    output_dir: &Path,
    segment_seconds: u32,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("audio");
    let pattern = output_dir.join(format!("{}-%03d.mp3", stem));

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-f").arg("segment")
        .arg("-segment_time").arg(segment_seconds.to_string())
        .arg("-reset_timestamps").arg("1")
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(&pattern)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(OppsumError::ToolNotFound("ffmpeg".into()));
        }
        Err(e) => {
            return Err(OppsumError::ToolFailed(format!("ffmpeg segmentation failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OppsumError::ToolFailed(format!(
            "ffmpeg segmentation failed: {}",
            stderr.trim()
        )));
    }

    let segments = collect_segments(output_dir, stem)?;
    if segments.is_empty() {
        return Err(OppsumError::ToolFailed(
            "ffmpeg produced no audio segments".into(),
        ));
    }

    debug!("Cut audio into {} segments", segments.len());
    Ok(segments)
}

/// List produced segment files in playback order.
///
/// The `%03d` output pattern sorts lexicographically, so a name sort is a
/// playback-order sort.
fn collect_segments(dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let prefix = format!("{}-", stem);
    let mut segments: Vec<PathBuf> = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(".mp3"))
        })
        .collect();
    segments.sort();
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_segments_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["clip-002.mp3", "clip-000.mp3", "clip-001.mp3"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let segments = collect_segments(dir.path(), "clip").unwrap();

        let names: Vec<&str> = segments
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["clip-000.mp3", "clip-001.mp3", "clip-002.mp3"]);
    }

    #[test]
    fn test_collect_segments_ignores_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip-000.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("other-000.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("clip-000.txt"), b"").unwrap();

        let segments = collect_segments(dir.path(), "clip").unwrap();

        assert_eq!(segments.len(), 1);
        assert!(segments[0].ends_with("clip-000.mp3"));
    }
}
