use axum::{extract::State, Json};
use service_core::extract::AppJson;

use crate::error::{AnalysisError, Rejection};
use crate::models::{ActivityCategory, ActivityFailure, ActivityResponse, AnalyzeActivityRequest};
use crate::services::analysis::{detect_activity, ACTIVITY_ENDPOINT};
use crate::services::demo::DEMO_ACTIVITY;
use crate::services::image::is_missing;
use crate::startup::AppState;

/// Label what a student is doing from one capture of their screen.
pub async fn analyze_activity(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeActivityRequest>,
) -> Result<Json<ActivityResponse>, Rejection> {
    if let Err(e) = state.admit(ACTIVITY_ENDPOINT) {
        return Err(Rejection::new(&e, ActivityFailure::rate_limited(e.to_string())));
    }

    let image = match request.image.as_deref() {
        Some(image) if !is_missing(Some(image)) => image,
        _ => return Err(AnalysisError::MissingImage.into()),
    };
    let student_id = request.student_id();

    let Some(provider) = state.provider.as_deref() else {
        return Ok(Json(ActivityResponse::new(DEMO_ACTIVITY, student_id)));
    };

    match detect_activity(provider, image).await {
        Ok(activity) => {
            tracing::info!(
                student_id = %student_id,
                activity = %activity,
                category = ?ActivityCategory::classify(&activity),
                "Activity detected"
            );
            Ok(Json(ActivityResponse::new(activity, student_id)))
        }
        Err(e) => {
            tracing::error!(
                student_id = %student_id,
                kind = e.kind(),
                error = %e,
                "Activity analysis failed"
            );
            Err(Rejection::new(&e, ActivityFailure::failed(student_id, e.to_string())))
        }
    }
}
