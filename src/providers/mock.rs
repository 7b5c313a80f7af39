/*!
 * Mock translation client for testing.
 *
 * This module provides a mock client that simulates different behaviors:
 * - `MockTranslator::working()` - Translates against a small built-in dictionary
 * - `MockTranslator::intermittent(n)` - Fails every Nth request
 * - `MockTranslator::failing()` - Always fails with a server error
 * - `MockTranslator::unreachable()` - Always fails to connect
 *
 * Known words become signs with a clip under `/static/videos/`, other words
 * are fingerspelled without a clip, and articles are dropped, which mirrors
 * the real service closely enough for playback tests.
 */

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::wire::{
    Animation, DictionaryResponse, FINGERSPELL_TYPE, HealthResponse, SignLookupResponse, TranslationResponse,
    WireSignUnit,
};
use super::{Translation, TranslationClient, validate_text};
use crate::errors::ProviderError;
use crate::sequence::SECONDS_PER_SIGN;

/// Words the mock has a clip for
pub const DEFAULT_WORDS: &[&str] = &["hello", "thank", "you", "good", "morning", "help", "there", "please"];

/// Tokens the service removes before signing
const DROPPED_WORDS: &[&str] = &["a", "an", "the", "is", "am", "are", "was", "were"];

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with a server error
    Failing,
    /// Always fails with a connection error
    Unreachable,
    /// Succeeds with an empty sign sequence
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock client for testing translation-driven behavior
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter shared between clones
    request_count: Arc<AtomicUsize>,
    /// Word to clip file
    dictionary: BTreeMap<String, String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        let dictionary = DEFAULT_WORDS
            .iter()
            .map(|word| (word.to_string(), format!("{}.mp4", word)))
            .collect();
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            dictionary,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Unreachable)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Replace the built-in dictionary
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dictionary = words
            .into_iter()
            .map(|word| {
                let word = word.into().to_lowercase();
                let file = format!("{}.mp4", word);
                (word, file)
            })
            .collect();
        self
    }

    /// Number of requests served so far, across clones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn video_url(&self, word: &str) -> Option<String> {
        self.dictionary.get(word).map(|file| format!("/static/videos/{}", file))
    }

    /// Build the response the real service would send for `text`
    pub fn respond(&self, text: &str) -> TranslationResponse {
        let sign_sequence: Vec<WireSignUnit> = tokenize(text)
            .into_iter()
            .filter(|token| !DROPPED_WORDS.contains(&token.as_str()))
            .map(|token| match self.video_url(&token) {
                Some(url) => WireSignUnit {
                    data: Some(serde_json::json!({ "file": url.trim_start_matches("/static/videos/") })),
                    kind: Some("sign".to_string()),
                    video_url: Some(url),
                    word: token,
                },
                None => WireSignUnit {
                    data: Some(serde_json::json!(
                        token
                            .chars()
                            .map(|c| serde_json::json!({ "letter": c.to_string() }))
                            .collect::<Vec<_>>()
                    )),
                    kind: Some(FINGERSPELL_TYPE.to_string()),
                    video_url: None,
                    word: token,
                },
            })
            .collect();

        let total = sign_sequence.len();
        TranslationResponse {
            status: "success".to_string(),
            error: None,
            input_text: Some(text.to_string()),
            sign_sequence,
            animation: Some(Animation {
                total_signs: Some(total),
                estimated_duration: Some(total as f64 * SECONDS_PER_SIGN),
            }),
        }
    }

    /// Outcome of the current request under the configured behavior
    async fn gate(&self) -> Result<(), ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working | MockBehavior::Empty => Ok(()),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(())
                }
            }
            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated service failure".to_string(),
                status_code: 500,
            }),
            MockBehavior::Unreachable => Err(ProviderError::ConnectionError(
                "Simulated connection refused".to_string(),
            )),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(())
            }
        }
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::working()
    }
}

/// Lowercase alphanumeric tokens of `text`
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|token| token.trim_matches('\'').to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

#[async_trait]
impl TranslationClient for MockTranslator {
    async fn translate(&self, text: &str, _language: &str) -> Result<Translation, ProviderError> {
        let text = validate_text(text)?;
        self.gate().await?;

        let mut response = self.respond(text);
        if self.behavior == MockBehavior::Empty {
            response.sign_sequence.clear();
            response.animation = None;
        }
        response.into_translation(200, text)
    }

    async fn dictionary(&self) -> Result<DictionaryResponse, ProviderError> {
        self.gate().await?;
        Ok(DictionaryResponse {
            status: "success".to_string(),
            total_words: self.dictionary.len(),
            words: self.dictionary.keys().cloned().collect(),
        })
    }

    async fn lookup_sign(&self, word: &str) -> Result<SignLookupResponse, ProviderError> {
        self.gate().await?;
        let word = word.trim().to_lowercase();
        match self.video_url(&word) {
            Some(url) => Ok(SignLookupResponse {
                word,
                video_url: Some(url),
                status: "success".to_string(),
            }),
            None => Err(ProviderError::NotFound(format!("No sign for '{}'", word))),
        }
    }

    async fn health(&self) -> Result<HealthResponse, ProviderError> {
        self.gate().await?;
        Ok(HealthResponse {
            status: "healthy".to_string(),
            service: Some("Mock Sign Language Translator".to_string()),
            video_count: Some(self.dictionary.len()),
        })
    }
}
