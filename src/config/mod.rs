//! Configuration module for Oppsum.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    CaptionSettings, GeneralSettings, Settings, SummarizationSettings, TranscriptionSettings,
};
