/*!
 * Tests for translation clients and the service's wire format
 */

use std::sync::Arc;

use signplay::errors::ProviderError;
use signplay::providers::wire::{TranslateRequest, TranslationResponse};
use signplay::providers::{MockBehavior, MockTranslator, TranslationClient};
use signplay::sequence::UnitKind;

/// Test that the mock behaves the same behind a trait object
#[tokio::test]
async fn test_translate_throughTraitObject_shouldBuildSequence() {
    let client: Arc<dyn TranslationClient> = Arc::new(MockTranslator::working());

    let translation = client.translate("  Good morning, you  ", "en").await.unwrap();
    assert_eq!(translation.input_text, "Good morning, you");
    assert_eq!(translation.sequence.len(), 3);
    assert!(translation.sequence.units().iter().all(|u| u.is_playable()));

    let stats = translation.stats();
    assert_eq!(stats.sign_count, 3);
    assert_eq!(stats.word_count, 3);
    assert_eq!(stats.playable_count, 3);
}

#[tokio::test]
async fn test_translate_withEmptyBehavior_shouldSucceedWithNoUnits() {
    let client = MockTranslator::empty();
    let translation = client.translate("hello", "en").await.unwrap();

    assert!(translation.sequence.is_empty());
    assert_eq!(translation.estimated_duration, None);
    assert_eq!(translation.stats().display_duration(), "0s");
}

#[tokio::test]
async fn test_unreachableTranslator_shouldFailEveryEndpointWithConnectionError() {
    let client = MockTranslator::unreachable();

    assert!(matches!(client.translate("hello", "en").await, Err(ProviderError::ConnectionError(_))));
    assert!(matches!(client.dictionary().await, Err(ProviderError::ConnectionError(_))));
    assert!(matches!(client.health().await, Err(ProviderError::ConnectionError(_))));
    assert_eq!(client.request_count(), 3);
}

#[tokio::test]
async fn test_slowTranslator_shouldExceedShortTimeout() {
    let client = MockTranslator::new(MockBehavior::Slow { delay_ms: 200 });
    let outcome = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        client.translate("hello", "en"),
    )
    .await;
    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_dictionaryAndHealth_shouldReportCustomWords() {
    let client = MockTranslator::working().with_words(["wave", "sun"]);

    let dictionary = client.dictionary().await.unwrap();
    assert_eq!(dictionary.total_words, 2);
    assert_eq!(dictionary.words, vec!["sun", "wave"]);

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.video_count, Some(2));
}

/// Test decoding a response shaped like the service's
#[test]
fn test_translationResponse_fromServiceJson_shouldMapKinds() {
    let body = r#"{
        "status": "success",
        "input_text": "hello zed",
        "sign_sequence": [
            { "word": "hello", "type": "sign", "data": { "file": "hello.mp4" }, "video_url": "/static/videos/hello.mp4" },
            { "word": "zed", "type": "fingerspell", "data": [{ "letter": "z" }, { "letter": "e" }, { "letter": "d" }], "video_url": null },
            { "word": "", "type": "sign", "video_url": "/static/videos/blank.mp4" }
        ],
        "animation": { "total_signs": 3, "estimated_duration": 7.5 }
    }"#;

    let response: TranslationResponse = serde_json::from_str(body).unwrap();
    let translation = response.into_translation(200, "ignored").unwrap();

    assert_eq!(translation.input_text, "hello zed");
    assert_eq!(translation.sequence.len(), 2, "blank words are dropped");
    assert_eq!(translation.sequence.get(0).unwrap().kind(), UnitKind::LexicalSign);
    assert_eq!(translation.sequence.get(1).unwrap().kind(), UnitKind::FingerspellLetter);
    assert_eq!(translation.sequence.get(1).unwrap().media_ref(), None);
    assert_eq!(translation.estimated_duration, Some(7.5));
}

#[test]
fn test_translationResponse_withErrorStatus_shouldBecomeApiError() {
    let response: TranslationResponse =
        serde_json::from_str(r#"{ "status": "error", "error": "Text must be at least 2 characters long" }"#).unwrap();

    match response.into_translation(400, "x") {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 400);
            assert!(message.contains("at least 2"));
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[test]
fn test_translateRequest_shouldSerializeServiceFields() {
    let request = TranslateRequest {
        text: "hello".to_string(),
        language: "hi".to_string(),
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json, serde_json::json!({ "text": "hello", "language": "hi" }));
}

#[test]
fn test_mockRespond_shouldMatchServiceShape() {
    let response = MockTranslator::working().respond("hello an zed");
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], "success");
    assert_eq!(json["sign_sequence"][0]["type"], "sign");
    assert_eq!(json["sign_sequence"][0]["video_url"], "/static/videos/hello.mp4");
    assert_eq!(json["sign_sequence"][1]["type"], "fingerspell");
    assert_eq!(json["sign_sequence"][1]["data"][0]["letter"], "z");
    assert_eq!(json["animation"]["total_signs"], 2);
}
