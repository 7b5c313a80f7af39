/*!
 * JSON payloads exchanged with the translation service.
 */

use serde::{Deserialize, Serialize};

use super::Translation;
use crate::errors::ProviderError;
use crate::sequence::{SignSequence, UnitKind, UnitSpec};

/// `type` value marking a fingerspelled unit
pub const FINGERSPELL_TYPE: &str = "fingerspell";

/// `status` value of a failed request
pub const STATUS_ERROR: &str = "error";

/// Request body for `POST /api/translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub language: String,
}

/// Response body of `POST /api/translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_text: Option<String>,
    #[serde(default)]
    pub sign_sequence: Vec<WireSignUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
}

/// One element of `sign_sequence`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSignUnit {
    pub word: String,
    /// `"sign"` or `"fingerspell"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Service-specific details, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Timing summary attached to a translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    #[serde(default)]
    pub total_signs: Option<usize>,
    #[serde(default)]
    pub estimated_duration: Option<f64>,
}

/// Response body of `GET /api/dictionary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryResponse {
    pub status: String,
    #[serde(default)]
    pub total_words: usize,
    #[serde(default)]
    pub words: Vec<String>,
}

/// Response body of `GET /api/sign/<word>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignLookupResponse {
    pub word: String,
    #[serde(default)]
    pub video_url: Option<String>,
    pub status: String,
}

/// Response body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub video_count: Option<usize>,
}

/// Error body returned alongside non-success HTTP codes
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl WireSignUnit {
    fn into_spec(self) -> UnitSpec {
        let kind = match self.kind.as_deref() {
            Some(FINGERSPELL_TYPE) => UnitKind::FingerspellLetter,
            _ => UnitKind::LexicalSign,
        };
        UnitSpec {
            word: self.word,
            kind,
            media_ref: self.video_url,
        }
    }
}

impl TranslationResponse {
    /// Convert into a [`Translation`]
    ///
    /// An `"error"` status becomes `ProviderError::ApiError` carrying
    /// `status_code`. `requested_text` stands in for a missing `input_text`.
    pub fn into_translation(self, status_code: u16, requested_text: &str) -> Result<Translation, ProviderError> {
        if self.status == STATUS_ERROR {
            return Err(ProviderError::ApiError {
                status_code,
                message: self.error.unwrap_or_else(|| "Translation failed".to_string()),
            });
        }

        let sequence = SignSequence::new(self.sign_sequence.into_iter().map(WireSignUnit::into_spec));
        Ok(Translation {
            input_text: self.input_text.unwrap_or_else(|| requested_text.to_string()),
            sequence,
            estimated_duration: self.animation.and_then(|a| a.estimated_duration),
        })
    }
}
