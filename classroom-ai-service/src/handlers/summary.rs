use axum::{extract::State, Json};
use service_core::extract::AppJson;

use crate::error::Rejection;
use crate::models::{SessionSummaryRequest, SummaryResponse};
use crate::services::analysis::{generate_report, SUMMARY_ENDPOINT};
use crate::services::demo::{demo_stats, DEMO_REPORT};
use crate::services::normalizer::report_stats;
use crate::startup::AppState;

/// Markdown lesson report plus statistics computed from the submitted roster.
pub async fn generate_summary(
    State(state): State<AppState>,
    AppJson(session): AppJson<SessionSummaryRequest>,
) -> Result<Json<SummaryResponse>, Rejection> {
    state.admit(SUMMARY_ENDPOINT)?;

    let Some(provider) = state.provider.as_deref() else {
        return Ok(Json(SummaryResponse::new(DEMO_REPORT, demo_stats(&session))));
    };

    let report = generate_report(provider, &session).await.map_err(|e| {
        tracing::error!(
            students = session.students.len(),
            kind = e.kind(),
            error = %e,
            "Summary generation failed"
        );
        Rejection::from(e)
    })?;

    let stats = report_stats(&session);
    tracing::info!(
        students = session.students.len(),
        avg_engagement = stats.avg_engagement,
        report_len = report.len(),
        "Lesson summary generated"
    );

    Ok(Json(SummaryResponse::new(report, stats)))
}
