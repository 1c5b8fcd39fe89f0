use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::models::unix_timestamp;
use crate::startup::AppState;

pub const SERVICE_NAME: &str = "classroom-ai-service";

/// Liveness check. Never touches the model.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "mode": if state.is_demo_mode() { "demo" } else { "live" },
        "timestamp": unix_timestamp(),
    }))
}

/// Readiness check: demo mode is always ready, otherwise the provider must answer.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let Some(provider) = state.provider.as_deref() else {
        return (StatusCode::OK, Json(json!({ "status": "ready", "mode": "demo" })));
    };

    match provider.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "provider": provider.name() })),
        ),
        Err(e) => {
            tracing::warn!(provider = provider.name(), error = %e, "Provider health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "provider": provider.name(),
                    "error": e.to_string()
                })),
            )
        }
    }
}
