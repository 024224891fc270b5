//! Summarize command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::summarize::ProgressSink;
use crate::video::{fetch_metadata, VideoId};
use anyhow::Result;
use indicatif::ProgressBar;
use std::sync::Arc;

/// Progress sink that drives an indicatif bar.
struct BarProgress(ProgressBar);

impl ProgressSink for BarProgress {
    fn report(&self, fraction: f64) {
        self.0.set_position((fraction * 100.0).round() as u64);
    }
}

/// Run the summarize command.
pub async fn run_summarize(
    url: &str,
    max_chars: Option<usize>,
    output: Option<String>,
    json: bool,
    mut settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Summarize) {
        Output::error(&format!("{}", e));
        Output::info("Run 'oppsum doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let Some(video_id) = VideoId::extract(url) else {
        Output::error(&format!("Not a recognizable video URL: {}", url));
        return Err(anyhow::anyhow!("invalid video URL"));
    };

    show_video_info(&video_id, settings.transcription.max_duration_seconds).await?;

    if let Some(max_chars) = max_chars {
        settings.summarization.max_chars_per_chunk = max_chars;
    }

    let spinner = Output::spinner("Acquiring transcript...");
    let orchestrator = Orchestrator::new(settings)?;
    let transcript = orchestrator.acquire_transcript(url).await?;
    spinner.finish_and_clear();
    Output::info(&format!(
        "Transcript acquired via {} ({} chars)",
        transcript.source,
        transcript.char_count()
    ));

    let bar = Output::progress_bar(100, "Summarizing");
    let outcome = {
        let orchestrator = orchestrator.with_progress(Arc::new(BarProgress(bar.clone())));
        let max_chars = orchestrator.settings().summarization.max_chars_per_chunk;
        orchestrator
            .summarize_transcript(&transcript.text, max_chars)
            .await
    };
    bar.finish_and_clear();

    if outcome.is_failed() {
        Output::error("Every chunk failed to summarize.");
        for result in &outcome.chunk_results {
            if let Some(detail) = &result.error_detail {
                Output::kv(&format!("chunk {}", result.chunk_index), detail);
            }
        }
        return Err(anyhow::anyhow!("every chunk failed to summarize"));
    }

    if outcome.is_degraded() {
        Output::warning(&format!(
            "{} of {} chunks failed; the summary is incomplete.",
            outcome.attempted_chunks - outcome.succeeded_chunks,
            outcome.attempted_chunks
        ));
        for result in outcome.chunk_results.iter().filter(|r| r.failed) {
            Output::kv(
                &format!("chunk {}", result.chunk_index),
                result.error_detail.as_deref().unwrap_or("unknown error"),
            );
        }
    }

    let content = if json {
        serde_json::to_string_pretty(&serde_json::json!({
            "video_id": transcript.video_id,
            "source": transcript.source,
            "transcript_chars": transcript.char_count(),
            "outcome": outcome,
        }))?
    } else {
        outcome.final_text.clone()
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &content)?;
            Output::success(&format!("Summary written to {}", path));
        }
        None => {
            Output::header("Summary");
            println!("{}", content);
        }
    }

    Ok(())
}

/// Fetch and display video metadata, enforcing the duration limit.
///
/// Metadata lookup failure is not fatal; the transcript acquisition will
/// surface a proper error if the video is truly unreachable.
async fn show_video_info(video_id: &VideoId, max_duration_seconds: u32) -> Result<()> {
    let spinner = Output::spinner("Fetching video info...");
    let metadata = fetch_metadata(video_id).await;
    spinner.finish_and_clear();

    match metadata {
        Ok(meta) => {
            Output::video_info(
                &meta.title,
                meta.id.as_str(),
                meta.channel.as_deref(),
                meta.duration_seconds,
            );

            if let Some(duration) = meta.duration_seconds {
                if duration > max_duration_seconds {
                    Output::error(&format!(
                        "Video is {}s long, over the configured limit of {}s.",
                        duration, max_duration_seconds
                    ));
                    Output::info("Raise transcription.max_duration_seconds to allow longer media.");
                    return Err(anyhow::anyhow!("video exceeds the configured duration limit"));
                }
            }
        }
        Err(e) => {
            Output::warning(&format!("Could not fetch video info: {}", e));
        }
    }

    Ok(())
}
