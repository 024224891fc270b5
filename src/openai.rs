//! Shared OpenAI client construction.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Request timeout applied to all OpenAI calls. Whisper uploads of long
/// audio segments can take minutes, so this is deliberately generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Create an OpenAI client with a bounded request timeout.
///
/// The API key is read from `OPENAI_API_KEY` by the client itself.
pub fn create_client() -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
