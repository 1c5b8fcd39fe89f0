use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use service_core::extract::AppJson;
use std::time::Instant;

use crate::error::{AnalysisError, Rejection};
use crate::models::analysis::UNKNOWN_STUDENT_NAME;
use crate::models::{AnalysisFailure, AnalysisMetadata, ScreenshotRequest};
use crate::services::analysis::{review_screenshot, SCREENSHOT_ENDPOINT};
use crate::services::demo::demo_analysis;
use crate::services::image::is_missing;
use crate::services::normalizer::finalize_analysis;
use crate::startup::AppState;

/// Violation detection and code review for one screenshot.
pub async fn analyze_screenshot(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScreenshotRequest>,
) -> Result<Json<Value>, Rejection> {
    state.admit(SCREENSHOT_ENDPOINT)?;

    let image = match request.image.as_deref() {
        Some(image) if !is_missing(Some(image)) => image,
        _ => return Err(AnalysisError::MissingImage.into()),
    };

    let started = Instant::now();
    let student_name = request
        .student_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_STUDENT_NAME.to_string());
    let timestamp = request
        .timestamp
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    let analysis = match state.provider.as_deref() {
        None => demo_fields(),
        Some(provider) => match review_screenshot(provider, image, &student_name).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::error!(
                    student_name = %student_name,
                    kind = e.kind(),
                    error = %e,
                    "Screenshot analysis failed"
                );
                let body = AnalysisFailure {
                    error: e.to_string(),
                    raw_response: e.raw_response().map(str::to_string),
                    student_name,
                    timestamp,
                };
                return Err(Rejection::new(&e, body));
            }
        },
    };

    let metadata = AnalysisMetadata {
        timestamp,
        student_name,
        analysis_time_ms: started.elapsed().as_millis() as u64,
    };
    let body = finalize_analysis(analysis, &metadata);
    let severity = body
        .get("severity")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown");

    tracing::info!(
        student_name = %metadata.student_name,
        severity = %severity,
        analysis_time_ms = metadata.analysis_time_ms,
        "Screenshot analyzed"
    );

    Ok(Json(body))
}

fn demo_fields() -> Map<String, Value> {
    match serde_json::to_value(demo_analysis()) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}
