/*!
 * # signplay - sequential sign-language clip playback
 *
 * A Rust library that turns text into a sequence of sign-language clips via a
 * translation service and plays the clips back one after another.
 *
 * ## Features
 *
 * - Translate text into lexical signs and fingerspelled words
 * - Play a sequence unit by unit, skipping units without a clip
 * - Play, pause, stop and seek with well-defined outcomes in every state
 * - Ignore late events from clips that were already replaced
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `sequence`: Sign units, sequences, the cursor model and statistics
 * - `media`: Media adapter contract and implementations:
 *   - `media::clip`: Timer-driven adapter probing local or remote clips
 *   - `media::mock`: Scripted adapter for tests
 * - `playback`: The playback state machine and its async session
 * - `providers`: Translation service clients:
 *   - `providers::http`: Client for the service's JSON API
 *   - `providers::mock`: Scripted client for tests
 * - `console`: Progress-bar presentation of playback
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod console;
pub mod errors;
pub mod language_utils;
pub mod media;
pub mod playback;
pub mod providers;
pub mod sequence;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, MediaError, PlaybackError, ProviderError, SequenceError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use playback::{PlaybackController, PlaybackSession, PlaybackState, PlayerHandle, PresentationSink, Transition};
pub use providers::{Translation, TranslationClient};
pub use sequence::{SequenceModel, SignSequence, SignUnit, UnitKind};
