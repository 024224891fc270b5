//! Transcript command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(
    url: &str,
    output: Option<String>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Transcript) {
        Output::error(&format!("{}", e));
        Output::info("Run 'oppsum doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Acquiring transcript...");
    let transcript = match orchestrator.acquire_transcript(url).await {
        Ok(t) => t,
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to acquire transcript: {}", e));
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    Output::success(&format!(
        "Transcript acquired via {} ({} chars)",
        transcript.source,
        transcript.char_count()
    ));

    let content = if json {
        serde_json::to_string_pretty(&transcript)?
    } else {
        transcript.text.clone()
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &content)?;
            Output::success(&format!("Transcript written to {}", path));
        }
        None => {
            println!("{}", content);
        }
    }

    Ok(())
}
