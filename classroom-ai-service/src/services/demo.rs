//! Canned responses served when no provider credential is configured.
//!
//! None of these reflect the request content.

use serde_json::Number;

use crate::models::{AnalysisReport, CodeReview, SessionSummaryRequest, Severity, SummaryStats};

pub const DEMO_ACTIVITY: &str = "Demo Mode";

/// Average engagement reported alongside the demo report.
pub const DEMO_AVG_ENGAGEMENT: f64 = 75.0;

pub const DEMO_REPORT: &str = r#"## 📊 Overall Performance

The class showed strong engagement with 75% of students staying on-task throughout the lesson. Most students worked productively on their coding assignments with minimal distractions.

## 🌟 Top Performers (Top 3)

1. **Sarah Johnson** - Maintained focus on Python coding for 90% of the session
2. **Mike Chen** - Consistently reading documentation and implementing features
3. **Emily Davis** - Strong engagement with minimal off-task behavior

## ⚠️ Students Needing Support

- **Alex Brown** - Frequently distracted by YouTube videos. Recommend closer monitoring.
- **David Kim** - Spent significant time on social media. May benefit from one-on-one check-in.

## 💡 Recommendations for Next Lesson

1. Consider implementing 10-minute focused work blocks with short breaks
2. Provide more structured guidance for students struggling with task focus
3. Recognize top performers to encourage continued engagement

---
*This is a demo report. Set GEMINI_API_KEY for AI-generated summaries.*
"#;

pub fn demo_analysis() -> AnalysisReport {
    AnalysisReport {
        violations: Vec::new(),
        code_review: CodeReview {
            has_code: false,
            language: None,
            editor: None,
            syntax_errors: Vec::new(),
            warnings: Vec::new(),
        },
        overall_status: "Demo mode: screenshot was not analyzed. Set GEMINI_API_KEY for AI analysis."
            .to_string(),
        severity: Severity::Info,
        confidence: 0,
        recommendations: vec![
            "Set GEMINI_API_KEY to enable violation detection and code review.".to_string(),
        ],
    }
}

/// Demo statistics echo the session header instead of the roster.
pub fn demo_stats(session: &SessionSummaryRequest) -> SummaryStats {
    SummaryStats {
        avg_engagement: DEMO_AVG_ENGAGEMENT,
        total_students: session
            .total_students
            .clone()
            .unwrap_or_else(|| Number::from(0)),
        duration: session.duration.clone().unwrap_or_else(|| Number::from(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_stats_echo_session_header() {
        let session: SessionSummaryRequest = serde_json::from_value(serde_json::json!({
            "duration": 45,
            "totalStudents": 25,
            "students": [{"name": "Mike Chen", "activities": [], "engagementScore": 10}]
        }))
        .unwrap();

        let stats = serde_json::to_value(demo_stats(&session)).unwrap();
        assert_eq!(stats["avgEngagement"], 75.0);
        assert_eq!(stats["totalStudents"], 25);
        assert_eq!(stats["duration"], 45);
    }

    #[test]
    fn demo_stats_default_to_zero() {
        let stats = demo_stats(&SessionSummaryRequest::default());
        assert_eq!(stats.total_students, Number::from(0));
        assert_eq!(stats.duration, Number::from(0));
    }

    #[test]
    fn demo_analysis_is_informational() {
        let value = serde_json::to_value(demo_analysis()).unwrap();
        assert_eq!(value["severity"], "info");
        assert_eq!(value["violations"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["codeReview"]["hasCode"], false);
    }
}
