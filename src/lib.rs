//! Oppsum - Video Summarization
//!
//! A CLI tool that turns a video URL into a short textual summary.
//!
//! The name "Oppsum" comes from the Norwegian "oppsummere," to summarize.
//!
//! # Overview
//!
//! Oppsum allows you to:
//! - Summarize YouTube videos from their URL
//! - Use existing caption tracks when the platform provides them
//! - Fall back to audio download and speech recognition otherwise
//! - Summarize transcripts of any length through sentence-aligned chunking
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `video` - Video identification and metadata
//! - `captions` - Caption track retrieval
//! - `audio` - Audio download and segmentation
//! - `transcription` - Speech-to-text transcription
//! - `transcript` - Transcript acquisition with caption/speech fallback
//! - `chunking` - Sentence-respecting text chunking
//! - `summarize` - Chunked summarization with partial-failure tolerance
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use oppsum::config::Settings;
//! use oppsum::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let summary = orchestrator
//!         .summarize_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     println!("{}", summary.outcome.final_text);
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod captions;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod summarize;
pub mod transcript;
pub mod transcription;
pub mod video;

pub use error::{OppsumError, Result};
