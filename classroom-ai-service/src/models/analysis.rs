use serde::{Deserialize, Serialize};

pub const UNKNOWN_STUDENT_NAME: &str = "Unknown";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    /// Capture time as sent by the client (ISO-8601).
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Severity of a screenshot analysis, each with a fixed display icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "success" => Some(Severity::Success),
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Critical => "🚨",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
            Severity::Success => "✅",
        }
    }

    /// Icon for a raw severity value; anything unrecognized gets the info icon.
    pub fn icon_for(label: Option<&str>) -> &'static str {
        label
            .and_then(Severity::parse)
            .unwrap_or(Severity::Info)
            .icon()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyntaxIssue {
    pub line: Option<u32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeReview {
    pub has_code: bool,
    pub language: Option<String>,
    pub editor: Option<String>,
    pub syntax_errors: Vec<SyntaxIssue>,
    pub warnings: Vec<String>,
}

/// The analysis body the model is asked to produce.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub violations: Vec<Violation>,
    pub code_review: CodeReview,
    pub overall_status: String,
    pub severity: Severity,
    pub confidence: u8,
    pub recommendations: Vec<String>,
}

/// Fields the service adds to every analysis it returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub timestamp: String,
    pub student_name: String,
    pub analysis_time_ms: u64,
}

/// Failure body of `/analyze-screenshot`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    pub student_name: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_icons_follow_fixed_table() {
        assert_eq!(Severity::icon_for(Some("critical")), "🚨");
        assert_eq!(Severity::icon_for(Some("warning")), "⚠️");
        assert_eq!(Severity::icon_for(Some("info")), "ℹ️");
        assert_eq!(Severity::icon_for(Some("success")), "✅");
    }

    #[test]
    fn unrecognized_severity_falls_back_to_info_icon() {
        assert_eq!(Severity::icon_for(Some("catastrophic")), "ℹ️");
        assert_eq!(Severity::icon_for(None), "ℹ️");
    }

    #[test]
    fn severity_parse_ignores_case_and_padding() {
        assert_eq!(Severity::parse(" Critical "), Some(Severity::Critical));
    }

    #[test]
    fn report_serializes_with_client_field_names() {
        let report = AnalysisReport {
            violations: vec![Violation {
                kind: "Gaming".to_string(),
                description: "Browser game open".to_string(),
                evidence: "Game canvas fills the screen".to_string(),
            }],
            code_review: CodeReview {
                has_code: false,
                language: None,
                editor: None,
                syntax_errors: Vec::new(),
                warnings: Vec::new(),
            },
            overall_status: "Off task".to_string(),
            severity: Severity::Critical,
            confidence: 90,
            recommendations: vec!["Redirect the student".to_string()],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["violations"][0]["type"], "Gaming");
        assert_eq!(value["codeReview"]["hasCode"], false);
        assert_eq!(value["overallStatus"], "Off task");
        assert_eq!(value["severity"], "critical");
    }
}
