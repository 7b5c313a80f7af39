use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::wire::{
    DictionaryResponse, ErrorBody, HealthResponse, STATUS_ERROR, SignLookupResponse, TranslateRequest,
    TranslationResponse,
};
use super::{Translation, TranslationClient, validate_text};
use crate::errors::ProviderError;

/// Longest slice of a response body quoted in errors and logs
const BODY_EXCERPT_CHARS: usize = 500;

/// Client for the translation service's JSON API
#[derive(Debug, Clone)]
pub struct HttpTranslationClient {
    /// Base URL of the service
    endpoint: Url,
    /// HTTP client for making requests
    client: Client,
    /// Retries after the first attempt
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

impl HttpTranslationClient {
    /// Create a client for the service at `endpoint`
    pub fn new(endpoint: &str, timeout: Duration, max_retries: u32, backoff_base_ms: u64) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ProviderError::InvalidInput(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidInput(format!(
                "Endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }

        Ok(Self {
            endpoint,
            client: Client::builder()
                .timeout(timeout)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// URL of an API path below the endpoint, one segment per element
    pub fn url_for(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidInput(format!("Endpoint '{}' cannot carry a path", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, retrying failures that [`ProviderError::is_transient`] accepts
    ///
    /// Returns the status and body of the first response that is not a
    /// server error, or the last failure once retries are exhausted.
    async fn execute<F>(&self, what: &str, build: F) -> Result<(StatusCode, String), ProviderError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let err = match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .map_err(|e| ProviderError::ParseError(format!("Failed to read {} response: {}", what, e)))?;

                    if status.is_success() {
                        debug!("{} answered {}", what, status);
                        return Ok((status, body));
                    }
                    let err = ProviderError::ApiError {
                        status_code: status.as_u16(),
                        message: error_message(&body),
                    };
                    // Callers map client errors themselves
                    if !err.is_transient() {
                        debug!("{} answered {}", what, status);
                        return Ok((status, body));
                    }
                    error!(
                        "Translation service error on {} ({}) - attempt {}/{}",
                        what,
                        err,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    err
                }
                Err(e) => {
                    let err = if e.is_connect() || e.is_timeout() {
                        ProviderError::ConnectionError(format!("{} failed: {}", what, e))
                    } else {
                        ProviderError::RequestFailed(format!("{} failed: {}", what, e))
                    };
                    error!(
                        "Translation service network error: {} - attempt {}/{}",
                        err,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    err
                }
            };

            if !err.is_transient() {
                return Err(err);
            }
            last_error = Some(err);
            attempt += 1;

            // If we have more retries left, wait with exponential backoff
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!("{} failed after {} attempts", what, self.max_retries + 1))
        }))
    }

    async fn get_json<T: DeserializeOwned>(&self, what: &str, segments: &[&str]) -> Result<T, ProviderError> {
        let url = self.url_for(segments)?;
        let (status, body) = self.execute(what, || self.client.get(url.clone())).await?;
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_message(&body),
            });
        }
        decode(what, &body)
    }
}

#[async_trait]
impl TranslationClient for HttpTranslationClient {
    async fn translate(&self, text: &str, language: &str) -> Result<Translation, ProviderError> {
        let text = validate_text(text)?;
        let url = self.url_for(&["api", "translate"])?;
        let request = TranslateRequest {
            text: text.to_string(),
            language: language.to_string(),
        };

        let (status, body) = self
            .execute("translate", || self.client.post(url.clone()).json(&request))
            .await?;

        // Error statuses carry a JSON body with `status: "error"` when the service produced them
        match serde_json::from_str::<TranslationResponse>(&body) {
            Ok(response) if status.is_success() || response.status == STATUS_ERROR => {
                response.into_translation(status.as_u16(), text)
            }
            Err(e) if status.is_success() => {
                error!(
                    "Failed to parse translate response: {}. Raw response: {}",
                    e,
                    excerpt(&body)
                );
                Err(ProviderError::ParseError(format!("translate: {}", e)))
            }
            _ => Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_message(&body),
            }),
        }
    }

    async fn dictionary(&self) -> Result<DictionaryResponse, ProviderError> {
        self.get_json("dictionary", &["api", "dictionary"]).await
    }

    async fn lookup_sign(&self, word: &str) -> Result<SignLookupResponse, ProviderError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(ProviderError::InvalidInput("Word must not be empty".to_string()));
        }
        let url = self.url_for(&["api", "sign", &word])?;
        let (status, body) = self.execute("sign lookup", || self.client.get(url.clone())).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(format!("No sign for '{}'", word)));
        }
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_message(&body),
            });
        }
        decode("sign lookup", &body)
    }

    async fn health(&self) -> Result<HealthResponse, ProviderError> {
        self.get_json("health", &["api", "health"]).await
    }
}

fn decode<T: DeserializeOwned>(what: &str, body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse {} response: {}. Raw response: {}", what, e, excerpt(body));
        ProviderError::ParseError(format!("{}: {}", what, e))
    })
}

/// Message from an error body, or the body itself
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(message), .. }) => message,
        Ok(ErrorBody { status: Some(status), .. }) => status,
        _ if body.trim().is_empty() => "empty response".to_string(),
        _ => excerpt(body),
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() > BODY_EXCERPT_CHARS {
        body.chars().take(BODY_EXCERPT_CHARS).collect()
    } else {
        body.to_string()
    }
}
