//! Turns raw model text into the response shapes the classroom client expects.

use serde_json::{Map, Number, Value};

use crate::error::AnalysisError;
use crate::models::{AnalysisMetadata, SessionSummaryRequest, Severity, SummaryStats};

/// Strip whitespace and every quote character from an activity label.
///
/// The label is not checked against the prompt's vocabulary.
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Locate the JSON object embedded in free text: first `{` through last `}`.
///
/// Prose and code fences around the object are ignored.
pub fn extract_json_object(raw: &str) -> Result<&str, AnalysisError> {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(AnalysisError::NoJsonObject {
            raw: raw.to_string(),
        }),
    }
}

/// Locate and parse the analysis object. Fields are passed through as the
/// model wrote them.
pub fn parse_analysis(raw: &str) -> Result<Map<String, Value>, AnalysisError> {
    let candidate = extract_json_object(raw)?;
    serde_json::from_str::<Map<String, Value>>(candidate).map_err(|source| {
        AnalysisError::InvalidJson {
            raw: raw.to_string(),
            source,
        }
    })
}

/// Add service metadata and the severity icon to a parsed analysis.
/// Metadata overwrites same-named fields from the model.
pub fn finalize_analysis(mut analysis: Map<String, Value>, metadata: &AnalysisMetadata) -> Value {
    let icon = Severity::icon_for(analysis.get("severity").and_then(Value::as_str));

    analysis.insert(
        "timestamp".to_string(),
        Value::String(metadata.timestamp.clone()),
    );
    analysis.insert(
        "studentName".to_string(),
        Value::String(metadata.student_name.clone()),
    );
    analysis.insert(
        "analysisTimeMs".to_string(),
        Value::from(metadata.analysis_time_ms),
    );
    analysis.insert("icon".to_string(), Value::String(icon.to_string()));

    Value::Object(analysis)
}

/// Session statistics computed from the request, never from the model.
pub fn report_stats(session: &SessionSummaryRequest) -> SummaryStats {
    let students = &session.students;
    let avg_engagement = if students.is_empty() {
        0.0
    } else {
        let total: f64 = students.iter().map(|s| s.engagement_score).sum();
        round_to_tenth(total / students.len() as f64)
    };

    SummaryStats {
        avg_engagement,
        total_students: Number::from(students.len()),
        duration: session.duration.clone().unwrap_or_else(|| Number::from(0)),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentSession;

    fn student(name: &str, score: f64) -> StudentSession {
        StudentSession {
            name: Some(name.to_string()),
            activities: Vec::new(),
            engagement_score: score,
        }
    }

    fn metadata() -> AnalysisMetadata {
        AnalysisMetadata {
            timestamp: "2026-02-12T10:00:00Z".to_string(),
            student_name: "Sarah Johnson".to_string(),
            analysis_time_ms: 1234,
        }
    }

    #[test]
    fn label_loses_quotes_and_padding() {
        assert_eq!(normalize_label("  'Coding Python' "), "Coding Python");
        assert_eq!(normalize_label("\"Watching YouTube\"\n"), "Watching YouTube");
    }

    #[test]
    fn label_outside_vocabulary_passes_through() {
        assert_eq!(normalize_label("Drawing in Krita"), "Drawing in Krita");
    }

    #[test]
    fn fenced_json_is_extracted_and_gets_icon() {
        let raw = "Here is the analysis:\n```json\n{\"severity\":\"critical\",\"violations\":[{\"type\":\"Gaming\",\"description\":\"Game open\",\"evidence\":\"Steam window\"}],\"confidence\":92}\n```";

        let parsed = parse_analysis(raw).expect("embedded object parses");
        assert_eq!(parsed["severity"], "critical");

        let result = finalize_analysis(parsed, &metadata());
        assert_eq!(result["icon"], "🚨");
        assert_eq!(result["violations"][0]["type"], "Gaming");
        assert_eq!(result["studentName"], "Sarah Johnson");
        assert_eq!(result["analysisTimeMs"], 1234);
        assert_eq!(result["timestamp"], "2026-02-12T10:00:00Z");
    }

    #[test]
    fn text_without_object_is_a_parse_error() {
        let err = parse_analysis("The screen shows a code editor.").unwrap_err();
        assert!(matches!(err, AnalysisError::NoJsonObject { .. }));
        assert_eq!(err.raw_response(), Some("The screen shows a code editor."));
    }

    #[test]
    fn reversed_braces_are_not_an_object() {
        assert!(matches!(
            extract_json_object("} nothing here {"),
            Err(AnalysisError::NoJsonObject { .. })
        ));
    }

    #[test]
    fn malformed_object_is_invalid_json() {
        let err = parse_analysis("{\"severity\": \"warning\", }").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidJson { .. }));
    }

    #[test]
    fn out_of_range_fields_pass_through_unchanged() {
        let parsed = parse_analysis(r#"{"severity":"apocalyptic","confidence":250}"#).unwrap();
        let result = finalize_analysis(parsed, &metadata());
        assert_eq!(result["confidence"], 250);
        assert_eq!(result["severity"], "apocalyptic");
        assert_eq!(result["icon"], "ℹ️");
    }

    #[test]
    fn stats_average_engagement_to_one_decimal() {
        let session = SessionSummaryRequest {
            duration: Some(Number::from(45)),
            students: vec![student("A", 80.0), student("B", 90.0), student("C", 70.0)],
            ..Default::default()
        };

        let stats = report_stats(&session);
        assert_eq!(stats.avg_engagement, 80.0);
        assert_eq!(stats.total_students, Number::from(3));
        assert_eq!(stats.duration, Number::from(45));
    }

    #[test]
    fn stats_round_fractional_averages() {
        let session = SessionSummaryRequest {
            students: vec![student("A", 82.0), student("B", 83.0), student("C", 83.0)],
            ..Default::default()
        };
        assert_eq!(report_stats(&session).avg_engagement, 82.7);
    }

    #[test]
    fn stats_for_empty_session_are_zero() {
        let stats = report_stats(&SessionSummaryRequest::default());
        assert_eq!(stats.avg_engagement, 0.0);
        assert_eq!(stats.total_students, Number::from(0));
        assert_eq!(stats.duration, Number::from(0));
    }
}
