//! One function per endpoint: decode, prompt, call the model once, normalize.
//!
//! Nothing here retries. A failed call is reported to the caller as is.

use chrono::Utc;
use serde_json::{Map, Value};
use std::time::Instant;

use super::image::decode_image;
use super::metrics;
use super::normalizer::{normalize_label, parse_analysis};
use super::prompts;
use super::providers::{ImagePart, VisionProvider};
use crate::error::AnalysisError;
use crate::models::SessionSummaryRequest;

pub const ACTIVITY_ENDPOINT: &str = "analyze_activity";
pub const SUMMARY_ENDPOINT: &str = "generate_summary";
pub const SCREENSHOT_ENDPOINT: &str = "analyze_screenshot";

/// Label the student's current activity from a screen capture.
pub async fn detect_activity(
    provider: &dyn VisionProvider,
    image_b64: &str,
) -> Result<String, AnalysisError> {
    let image = decode_image(image_b64)?;
    let raw = call_model(provider, ACTIVITY_ENDPOINT, &prompts::activity_prompt(), &[image]).await?;
    Ok(normalize_label(&raw))
}

/// Markdown lesson report written by the model; passed through untouched.
pub async fn generate_report(
    provider: &dyn VisionProvider,
    session: &SessionSummaryRequest,
) -> Result<String, AnalysisError> {
    let prompt = prompts::summary_prompt(session, Utc::now().date_naive());
    call_model(provider, SUMMARY_ENDPOINT, &prompt, &[]).await
}

/// Structured violation and code review analysis of a screenshot.
pub async fn review_screenshot(
    provider: &dyn VisionProvider,
    image_b64: &str,
    student_name: &str,
) -> Result<Map<String, Value>, AnalysisError> {
    let image = decode_image(image_b64)?;
    let prompt = prompts::screenshot_prompt(student_name);
    let raw = call_model(provider, SCREENSHOT_ENDPOINT, &prompt, &[image]).await?;

    parse_analysis(&raw).map_err(|e| {
        tracing::warn!(
            student_name = %student_name,
            error = %e,
            response_len = raw.len(),
            "Model response is not a usable analysis"
        );
        e
    })
}

async fn call_model(
    provider: &dyn VisionProvider,
    endpoint: &str,
    prompt: &str,
    images: &[ImagePart],
) -> Result<String, AnalysisError> {
    let started = Instant::now();
    let result = provider.generate(prompt, images).await;
    let elapsed = started.elapsed();

    match &result {
        Ok(text) => {
            metrics::record_model_call(endpoint, "success", elapsed);
            tracing::debug!(
                provider = provider.name(),
                model = provider.model(),
                endpoint,
                elapsed_ms = elapsed.as_millis() as u64,
                response_len = text.len(),
                "Model call completed"
            );
        }
        Err(e) => {
            metrics::record_model_call(endpoint, "error", elapsed);
            tracing::error!(
                provider = provider.name(),
                model = provider.model(),
                endpoint,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "Model call failed"
            );
        }
    }

    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockVisionProvider;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn jpeg_b64() -> String {
        STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'])
    }

    #[tokio::test]
    async fn activity_label_is_normalized() {
        let provider = MockVisionProvider::replying("  \"Coding Python\"\n");
        let label = detect_activity(&provider, &jpeg_b64()).await.unwrap();

        assert_eq!(label, "Coding Python");
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.last_image_count(), Some(1));
    }

    #[tokio::test]
    async fn undecodable_image_never_reaches_the_model() {
        let provider = MockVisionProvider::replying("Coding Python");
        let err = detect_activity(&provider, "%%%").await.unwrap_err();

        assert!(matches!(err, AnalysisError::Decode(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_upstream_error() {
        let provider = MockVisionProvider::failing("quota exhausted");
        let err = detect_activity(&provider, &jpeg_b64()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Provider(_)));
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn report_is_text_only() {
        let provider = MockVisionProvider::replying("## 📊 Overall Performance\nGood.");
        let report = generate_report(&provider, &SessionSummaryRequest::default())
            .await
            .unwrap();

        assert_eq!(report, "## 📊 Overall Performance\nGood.");
        assert_eq!(provider.last_image_count(), Some(0));
        assert!(provider
            .last_prompt()
            .unwrap()
            .contains("No student data available"));
    }

    #[tokio::test]
    async fn screenshot_review_parses_fenced_reply() {
        let provider = MockVisionProvider::replying(
            "```json\n{\"severity\":\"warning\",\"overallStatus\":\"Possible distraction\"}\n```",
        );
        let analysis = review_screenshot(&provider, &jpeg_b64(), "Alex Brown")
            .await
            .unwrap();

        assert_eq!(analysis["severity"], "warning");
        assert!(provider.last_prompt().unwrap().contains("Alex Brown"));
    }

    #[tokio::test]
    async fn screenshot_review_without_json_fails() {
        let provider = MockVisionProvider::replying("I can't tell what is on this screen.");
        let err = review_screenshot(&provider, &jpeg_b64(), "Alex Brown")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::NoJsonObject { .. }));
    }
}
