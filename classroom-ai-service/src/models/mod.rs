//! Request and response shapes of the classroom API.

pub mod activity;
pub mod analysis;
pub mod summary;

pub use activity::{ActivityCategory, ActivityFailure, ActivityResponse, AnalyzeActivityRequest};
pub use analysis::{
    AnalysisFailure, AnalysisMetadata, AnalysisReport, CodeReview, ScreenshotRequest, Severity,
    SyntaxIssue, Violation,
};
pub use summary::{SessionSummaryRequest, StudentSession, SummaryResponse, SummaryStats};

/// Seconds since the Unix epoch with sub-second precision.
pub fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
