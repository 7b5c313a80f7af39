/*!
 * Error types for the signplay application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the sequence model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// Cursor target outside `[0, len]`
    #[error("Index {index} is out of range for a sequence of {len} units")]
    OutOfRange {
        /// Requested index
        index: i64,
        /// Sequence length
        len: usize,
    },
}

/// Errors reported by a media adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The media resource could not be opened
    #[error("Failed to load media '{locator}': {reason}")]
    LoadFailed {
        /// Locator that was being opened
        locator: String,
        /// Human readable cause
        reason: String,
    },

    /// The media resource did not become ready in time
    #[error("Timed out loading media '{locator}' after {secs}s")]
    Timeout {
        /// Locator that was being opened
        locator: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// `start()` was called before the media was ready
    #[error("Media is not ready for playback")]
    NotReady,

    /// The adapter was already disposed
    #[error("Media adapter has been disposed")]
    Disposed,
}

/// Errors returned by transport controls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Seek target outside the sequence
    #[error("Unit {index} does not exist (sequence has {len} units)")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Sequence length
        len: usize,
    },

    /// Seek target exists but has no playable media
    #[error("No media for unit {index} ('{word}')")]
    NoMedia {
        /// Requested index
        index: usize,
        /// Label of the unit
        word: String,
    },

    /// The playback session is no longer running
    #[error("Playback session is closed")]
    SessionClosed,
}

/// Errors that can occur when talking to the translation service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Text rejected before any request was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource does not exist on the service
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ProviderError {
    /// Whether a retry has a chance of succeeding
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RequestFailed(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) | Self::InvalidInput(_) | Self::NotFound(_) => false,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translation service
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a transport control
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Input the interactive shell does not understand
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
