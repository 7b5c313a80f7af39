/*!
 * Tests for application configuration functionality
 */

use signplay::app_config::{Config, LogLevel};
use std::time::Duration;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "en");
    assert_eq!(config.translation.endpoint, "http://127.0.0.1:5000");
    assert_eq!(config.translation.timeout(), Duration::from_secs(30));
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.playback.media_base, None);
    assert_eq!(config.playback.clip_duration(), Duration::from_millis(2500));
    assert!(config.playback.autoplay);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.language = "xx".to_string();
    assert!(config.validate().is_err());
    config.language = "hin".to_string();
    assert!(config.validate().is_ok(), "3-letter codes are accepted");

    // Valid ISO code the service does not know only warns
    config.language = "fr".to_string();
    assert!(config.validate().is_ok());
    config.language = "en".to_string();

    config.translation.endpoint = "ftp://example.com".to_string();
    assert!(config.validate().is_err());
    config.translation.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.translation.endpoint = "https://signs.example.com".to_string();
    assert!(config.validate().is_ok());

    config.playback.clip_duration_ms = 0;
    assert!(config.validate().is_err());
    config.playback.clip_duration_ms = 100;

    config.playback.open_timeout_secs = 0;
    assert!(config.validate().is_err());
    config.playback.open_timeout_secs = 1;

    config.translation.timeout_secs = 0;
    assert!(config.validate().is_err());
}

/// Test the media base fallback
#[test]
fn test_mediaBase_withoutOverride_shouldFallBackToEndpoint() {
    let mut config = Config::default();
    assert_eq!(config.media_base(), "http://127.0.0.1:5000");

    config.playback.media_base = Some("   ".to_string());
    assert_eq!(config.media_base(), "http://127.0.0.1:5000");

    config.playback.media_base = Some("/srv/signs".to_string());
    assert_eq!(config.media_base(), "/srv/signs");
}

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded, config);
}

/// Test that omitted fields take their defaults
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        br#"{ "language": "mr", "playback": { "autoplay": false }, "log_level": "debug" }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();
    assert_eq!(config.language, "mr");
    assert!(!config.playback.autoplay);
    assert_eq!(config.playback.clip_duration_ms, 2500);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
}

/// Test that a broken config file is reported
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", b"{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

/// Test saving and loading round trip with a customised config
#[test]
fn test_save_withCustomValues_shouldReloadIdentically() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("custom.json");

    let mut config = Config::default();
    config.language = "hi".to_string();
    config.playback.media_base = Some("https://cdn.example.com".to_string());
    config.log_level = LogLevel::Trace;
    config.save(&path).unwrap();

    assert_eq!(Config::load_or_create(&path).unwrap(), config);
}
