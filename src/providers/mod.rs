/*!
 * Clients for the text-to-sign translation service.
 *
 * This module contains client implementations for the translation service:
 * - `http`: client for the service's JSON API over HTTP
 * - `mock`: scripted client for tests
 * - `wire`: serde types for the service's JSON payloads
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::sequence::{SequenceStats, SignSequence};

pub mod http;
pub mod mock;
pub mod wire;

pub use http::HttpTranslationClient;
pub use mock::{MockBehavior, MockTranslator};
pub use wire::{DictionaryResponse, HealthResponse, SignLookupResponse, TranslationResponse};

/// Shortest input the service accepts, in characters
pub const MIN_TEXT_CHARS: usize = 2;

/// Result of a successful translation
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// Text the sequence was produced from
    pub input_text: String,
    /// Units in signing order
    pub sequence: SignSequence,
    /// Duration estimate reported by the service, in seconds
    pub estimated_duration: Option<f64>,
}

impl Translation {
    /// Statistics for display next to the sequence
    pub fn stats(&self) -> SequenceStats {
        SequenceStats::compute(&self.sequence, &self.input_text, self.estimated_duration)
    }
}

/// Common trait for translation service clients
///
/// Implementations turn text into a [`Translation`] and expose the service's
/// auxiliary endpoints. They never touch playback state.
#[async_trait]
pub trait TranslationClient: Send + Sync + Debug {
    /// Translate `text` written in `language` into a sign sequence
    ///
    /// # Arguments
    /// * `text` - Text to translate, validated with [`validate_text`] first
    /// * `language` - ISO 639-1 code of the input language
    async fn translate(&self, text: &str, language: &str) -> Result<Translation, ProviderError>;

    /// List the words the service has a sign for
    async fn dictionary(&self) -> Result<DictionaryResponse, ProviderError>;

    /// Look up the clip for a single word
    ///
    /// Returns `ProviderError::NotFound` when the service has no clip for it.
    async fn lookup_sign(&self, word: &str) -> Result<SignLookupResponse, ProviderError>;

    /// Test the connection to the service
    async fn health(&self) -> Result<HealthResponse, ProviderError>;
}

/// Check user text before it is sent anywhere
///
/// Returns the trimmed text.
pub fn validate_text(text: &str) -> Result<&str, ProviderError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::InvalidInput("Please enter some text to translate".to_string()));
    }
    if trimmed.chars().count() < MIN_TEXT_CHARS {
        return Err(ProviderError::InvalidInput(format!(
            "Text must be at least {} characters long",
            MIN_TEXT_CHARS
        )));
    }
    Ok(trimmed)
}
