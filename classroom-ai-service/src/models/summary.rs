use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::unix_timestamp;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryRequest {
    /// Lesson length in minutes, echoed back as given.
    #[serde(default)]
    pub duration: Option<Number>,
    #[serde(default)]
    pub total_students: Option<Number>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub students: Vec<StudentSession>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSession {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub engagement_score: f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub report: String,
    pub stats: SummaryStats,
    pub timestamp: f64,
}

impl SummaryResponse {
    pub fn new(report: impl Into<String>, stats: SummaryStats) -> Self {
        Self {
            report: report.into(),
            stats,
            timestamp: unix_timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub avg_engagement: f64,
    pub total_students: Number,
    pub duration: Number,
}
