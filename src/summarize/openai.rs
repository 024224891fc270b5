//! OpenAI chat-completion summarizer.

use super::Summarizer;
use crate::error::{OppsumError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You condense transcript excerpts into short prose summaries. \
    Reply with the summary text only: no preamble, no headings, no bullet points.";

/// Summarizer backed by an OpenAI chat model.
pub struct OpenAiSummarizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiSummarizer {
    /// Create a summarizer with the default temperature.
    pub fn new(model: &str) -> Self {
        Self::with_config(model, 0.3)
    }

    /// Create a summarizer with custom configuration.
    pub fn with_config(model: &str, temperature: f32) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str, min_words: usize, max_words: usize) -> Result<String> {
        let user_prompt = format!(
            "Summarize the following transcript excerpt in {} to {} words:\n\n{}",
            min_words, max_words, text
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT.to_string())
                .build()
                .map_err(|e| OppsumError::Summarization(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| OppsumError::Summarization(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| OppsumError::Summarization(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| OppsumError::OpenAI(format!("Summarization request failed: {}", e)))?;

        let summary = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| OppsumError::Summarization("Empty response from model".to_string()))?
            .trim()
            .to_string();

        debug!("Summarized {} chars into {} chars", text.len(), summary.len());

        Ok(summary)
    }
}
