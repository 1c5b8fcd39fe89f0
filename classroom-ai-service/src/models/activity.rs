use serde::{Deserialize, Serialize};

use super::unix_timestamp;

pub const UNKNOWN_STUDENT_ID: &str = "unknown";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeActivityRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
}

impl AnalyzeActivityRequest {
    pub fn student_id(&self) -> String {
        self.student_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_STUDENT_ID.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub activity: String,
    pub student_id: String,
    pub timestamp: f64,
}

impl ActivityResponse {
    pub fn new(activity: impl Into<String>, student_id: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
            student_id: student_id.into(),
            timestamp: unix_timestamp(),
        }
    }
}

/// Failure body of `/analyze-activity` when the student context is known.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFailure {
    pub activity: String,
    pub student_id: String,
    pub error: String,
}

impl ActivityFailure {
    pub fn rate_limited(error: impl Into<String>) -> Self {
        Self {
            activity: "Rate limited".to_string(),
            student_id: String::new(),
            error: error.into(),
        }
    }

    pub fn failed(student_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            activity: "Error".to_string(),
            student_id: student_id.into(),
            error: error.into(),
        }
    }
}

/// Coarse grouping of activity labels, the same buckets the classroom badges
/// are colored by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityCategory {
    Focused,
    Reading,
    Distracted,
    Inactive,
    Unknown,
}

impl ActivityCategory {
    /// Classify a free-form label by keyword; the first matching keyword wins.
    pub fn classify(label: &str) -> Self {
        const KEYWORDS: &[(&str, ActivityCategory)] = &[
            ("Coding", ActivityCategory::Focused),
            ("Working", ActivityCategory::Focused),
            ("Reading", ActivityCategory::Reading),
            ("Documentation", ActivityCategory::Reading),
            ("YouTube", ActivityCategory::Distracted),
            ("Game", ActivityCategory::Distracted),
            ("Social", ActivityCategory::Distracted),
            ("Idle", ActivityCategory::Inactive),
            ("Error", ActivityCategory::Inactive),
            ("Demo", ActivityCategory::Inactive),
        ];

        KEYWORDS
            .iter()
            .find(|(keyword, _)| label.contains(keyword))
            .map(|(_, category)| *category)
            .unwrap_or(ActivityCategory::Unknown)
    }
}
