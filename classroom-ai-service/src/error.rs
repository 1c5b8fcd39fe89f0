//! Failure kinds of the analysis pipeline and their HTTP rendering.
//!
//! Every endpoint answers failures with its own JSON shape, so a failure is a
//! pair: the [`AnalysisError`] kind (which fixes the status code) and the body
//! the endpoint built from whatever context it had at that point.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::services::providers::ProviderError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Too many requests")]
    Throttled { retry_after_secs: u64 },

    #[error("No image provided")]
    MissingImage,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No JSON object found in AI response")]
    NoJsonObject { raw: String },

    #[error("Failed to parse AI response as JSON: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalysisError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            AnalysisError::MissingImage => StatusCode::BAD_REQUEST,
            AnalysisError::Decode(_)
            | AnalysisError::Provider(_)
            | AnalysisError::NoJsonObject { .. }
            | AnalysisError::InvalidJson { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The model output that could not be normalized, when there was one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AnalysisError::NoJsonObject { raw } | AnalysisError::InvalidJson { raw, .. } => {
                Some(raw.as_str())
            }
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Throttled { .. } => "throttled",
            AnalysisError::MissingImage => "missing_image",
            AnalysisError::Decode(_) => "decode",
            AnalysisError::Provider(_) => "upstream",
            AnalysisError::NoJsonObject { .. } | AnalysisError::InvalidJson { .. } => "parse",
        }
    }
}

/// An endpoint failure ready to be sent.
#[derive(Debug)]
pub struct Rejection {
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: serde_json::Value,
}

impl Rejection {
    /// Pair an error kind with an endpoint-specific body.
    pub fn new(error: &AnalysisError, body: impl Serialize) -> Self {
        let body = serde_json::to_value(body)
            .unwrap_or_else(|_| json!({ "error": error.to_string() }));
        let retry_after_secs = match error {
            AnalysisError::Throttled { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        Self {
            status: error.status(),
            retry_after_secs,
            body,
        }
    }

    /// `{"error": "<message>"}`.
    pub fn plain(error: &AnalysisError) -> Self {
        Self::new(error, json!({ "error": error.to_string() }))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

impl From<AnalysisError> for Rejection {
    fn from(error: AnalysisError) -> Self {
        Rejection::plain(&error)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let mut res = (self.status, Json(self.body)).into_response();

        if let Some(retry) = self.retry_after_secs {
            res.headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry));
        }

        res
    }
}
