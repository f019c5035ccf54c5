//! Tests for the OpenAI-compatible integrations that need no network.

use storystrip_core::ScriptRequest;
use storystrip_error::PipelineErrorKind;
use storystrip_interface::{ImageGenerator, ScriptGenerator};
use storystrip_models::{
    ChatResponse, DEFAULT_MIN_SUMMARY_CHARS, ImageGenerationRequest, ImageGenerationResponse,
    OpenAIClient, OpenAIImageGenerator, OpenAIScriptGenerator,
};

// Nothing listens here; tests that reach the network would fail loudly.
const UNREACHABLE: &str = "http://127.0.0.1:9/v1/";

fn generator() -> OpenAIScriptGenerator {
    OpenAIScriptGenerator::builder()
        .client(OpenAIClient::with_base_url("test-key", UNREACHABLE))
        .build()
        .unwrap()
}

fn request(summary: &str) -> ScriptRequest {
    ScriptRequest::builder()
        .summary(summary)
        .style_modifier("noir")
        .build()
        .unwrap()
}

#[test]
fn test_base_url_trailing_slash_is_trimmed() {
    let client = OpenAIClient::with_base_url("key", UNREACHABLE);
    assert_eq!(client.base_url(), "http://127.0.0.1:9/v1");
}

#[test]
fn test_script_generator_defaults() {
    let generator = generator();
    assert_eq!(generator.provider_name(), "openai");
    assert_eq!(generator.model_name(), "o4-mini");
}

#[tokio::test]
async fn test_short_summary_is_rejected_before_any_request() {
    let summary = "x".repeat(DEFAULT_MIN_SUMMARY_CHARS - 1);
    let err = generator().generate_script(&request(&summary)).await.unwrap_err();
    assert_eq!(
        err.pipeline_kind(),
        Some(&PipelineErrorKind::Validation(
            "Summary content too short for comic visualization.".to_string()
        ))
    );
}

#[tokio::test]
async fn test_threshold_counts_characters_not_bytes() {
    let generator = OpenAIScriptGenerator::builder()
        .client(OpenAIClient::with_base_url("test-key", UNREACHABLE))
        .min_summary_chars(5usize)
        .build()
        .unwrap();

    // Four characters, twelve bytes.
    let err = generator.generate_script(&request("日本語だ")).await;
    assert!(matches!(
        err.unwrap_err().pipeline_kind(),
        Some(PipelineErrorKind::Validation(_))
    ));
}

#[test]
fn test_image_generator_names() {
    let generator =
        OpenAIImageGenerator::new(OpenAIClient::with_base_url("key", UNREACHABLE), "gpt-image-1");
    assert_eq!(generator.provider_name(), "openai");
    assert_eq!(generator.model_name(), "gpt-image-1");
}

#[test]
fn test_chat_response_first_text_is_trimmed() {
    let response: ChatResponse = serde_json::from_str(
        r#"{"choices":[{"message":{"role":"assistant","content":"  1. Panel 1: A pier  \n"},"finish_reason":"stop"}]}"#,
    )
    .unwrap();
    assert_eq!(response.first_text(), Some("1. Panel 1: A pier"));
}

#[test]
fn test_chat_response_without_text() {
    let null_content: ChatResponse =
        serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
    assert_eq!(null_content.first_text(), None);

    let blank: ChatResponse =
        serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
    assert_eq!(blank.first_text(), None);

    let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
    assert_eq!(empty.first_text(), None);
}

#[test]
fn test_image_request_omits_unset_options() {
    let request = ImageGenerationRequest::builder()
        .model("gpt-image-1")
        .prompt("A harbor")
        .size("1024x1024")
        .build()
        .unwrap();
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["n"], 1);
    assert_eq!(json["size"], "1024x1024");
    assert!(json.get("quality").is_none());
    assert!(json.get("output_compression").is_none());
}

#[test]
fn test_image_response_accepts_either_payload() {
    let response: ImageGenerationResponse = serde_json::from_str(
        r#"{"created":1,"data":[{"b64_json":"aGVsbG8="},{"url":"https://example.test/a.png"}]}"#,
    )
    .unwrap();
    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[0].b64_json.as_deref(), Some("aGVsbG8="));
    assert_eq!(response.data[1].url.as_deref(), Some("https://example.test/a.png"));

    let missing: ImageGenerationResponse = serde_json::from_str("{}").unwrap();
    assert!(missing.data.is_empty());
}

#[test]
fn test_unreadable_body_is_malformed_response() {
    let err = OpenAIClient::decode_response::<ChatResponse>("<html>gateway</html>").unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::MalformedResponse(_))));

    let err =
        OpenAIClient::decode_response::<ImageGenerationResponse>(r#"{"data":"nope"}"#).unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::MalformedResponse(_))));
}

#[test]
fn test_well_formed_body_decodes() {
    let response: ChatResponse =
        OpenAIClient::decode_response(r#"{"choices":[{"message":{"content":"Panel 1: A pier"}}]}"#)
            .unwrap();
    assert_eq!(response.first_text(), Some("Panel 1: A pier"));
}
