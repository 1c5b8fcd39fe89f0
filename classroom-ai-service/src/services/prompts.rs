//! Prompt templates for the three classroom endpoints.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::{SessionSummaryRequest, StudentSession};

/// Labels the activity prompt allows the model to answer with.
pub const ACTIVITY_LABELS: &[&str] = &[
    "Coding Python",
    "Coding JavaScript",
    "Coding Java",
    "Reading Documentation",
    "Watching YouTube",
    "Playing Game",
    "Social Media",
    "Working on Task",
    "Idle Screen",
];

/// A label counts as on-task or off-task when it contains one of these.
/// The two sets are checked independently, so a label can be both.
const ON_TASK_KEYWORDS: &[&str] = &["Coding", "Working", "Reading"];
const OFF_TASK_KEYWORDS: &[&str] = &["YouTube", "Game", "Social"];

pub fn activity_prompt() -> String {
    let labels: String = ACTIVITY_LABELS
        .iter()
        .map(|label| format!("- \"{}\"\n", label))
        .collect();

    format!(
        r#"Analyze this student's computer screen.

Output EXACTLY ONE of these labels (nothing else):
{labels}
Rules:
- If you see code editor (VS Code, PyCharm, etc): "Coding [language]"
- If you see YouTube player: "Watching YouTube"
- If you see game graphics/Steam: "Playing Game"
- If you see Facebook/Instagram/Discord: "Social Media"
- If you see browser with technical content: "Reading Documentation"
- If working on assignment/project: "Working on Task"
- If screen is mostly blank/desktop: "Idle Screen"

Output ONLY the label, no explanation."#
    )
}

pub fn summary_prompt(session: &SessionSummaryRequest, today: NaiveDate) -> String {
    let duration = session
        .duration
        .as_ref()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let total_students = session
        .total_students
        .as_ref()
        .map(|n| n.to_string())
        .unwrap_or_else(|| "0".to_string());
    let date = session
        .date
        .clone()
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    let activities = format_student_activities(&session.students);

    format!(
        r#"Generate a professional lesson summary report.

SESSION INFORMATION:
- Duration: {duration} minutes
- Total Students: {total_students}
- Date: {date}

STUDENT ACTIVITIES:
{activities}

Create a report with these sections:

## 📊 Overall Performance
Write 2-3 sentences about overall class engagement and productivity.

## 🌟 Top Performers (Top 3)
List the 3 most engaged students and why they did well.

## ⚠️ Students Needing Support
List students who were off-task or struggling, with specific recommendations.

## 💡 Recommendations for Next Lesson
Provide 2-3 actionable suggestions for the teacher.

Keep it professional, specific, and under 400 words."#
    )
}

/// Per-student on/off-task breakdown fed to the summary prompt.
pub fn format_student_activities(students: &[StudentSession]) -> String {
    if students.is_empty() {
        return "No student data available".to_string();
    }

    students
        .iter()
        .map(format_student)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_student(student: &StudentSession) -> String {
    let total = student.activities.len();
    let on_task = count_matching(&student.activities, ON_TASK_KEYWORDS);
    let off_task = count_matching(&student.activities, OFF_TASK_KEYWORDS);
    let on_task_pct = if total == 0 {
        0
    } else {
        (on_task as f64 / total as f64 * 100.0).round_ties_even() as u32
    };

    format!(
        "\nStudent: {}\n- On-task activities: {}/{} ({}%)\n- Off-task activities: {}/{}\n- Most common activity: {}\n",
        student.name.as_deref().unwrap_or("Unknown"),
        on_task,
        total,
        on_task_pct,
        off_task,
        total,
        most_common(&student.activities).unwrap_or("None"),
    )
}

fn count_matching(activities: &[String], keywords: &[&str]) -> usize {
    activities
        .iter()
        .filter(|a| keywords.iter().any(|k| a.contains(k)))
        .count()
}

/// Most frequent entry; ties go to the one seen first.
fn most_common(activities: &[String]) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for activity in activities {
        *counts.entry(activity.as_str()).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for activity in activities {
        let count = counts[activity.as_str()];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((activity.as_str(), count));
        }
    }
    best.map(|(activity, _)| activity)
}

pub fn screenshot_prompt(student_name: &str) -> String {
    format!(
        r#"You are reviewing a screenshot of student "{student_name}"'s screen during a supervised programming class.

Check for two things:

1. VIOLATIONS - activities not allowed during class:
   - Games or game launchers (Steam, browser games)
   - Social media or messaging (Facebook, Instagram, Discord, WhatsApp)
   - Video streaming unrelated to the lesson (YouTube, Netflix, Twitch)
   - AI assistants or code generators (ChatGPT, Copilot chat) used without permission
   For each violation give its type, a short description and the visible evidence.

2. CODE REVIEW - if code is visible:
   - The programming language and the editor or IDE
   - Syntax errors, each with the line number if visible (otherwise null), error type, description and a suggested fix
   - Warnings about style, likely bugs or bad practice

Set "severity" to exactly one of:
- "critical": a clear violation is visible
- "warning": possible violation or serious code problems
- "info": nothing wrong but worth noting
- "success": student is on task with no problems

Respond with JSON only, no markdown, in exactly this shape:
{{
  "violations": [{{"type": "string", "description": "string", "evidence": "string"}}],
  "codeReview": {{
    "hasCode": true,
    "language": "string or null",
    "editor": "string or null",
    "syntaxErrors": [{{"line": 0, "type": "string", "description": "string", "suggestion": "string"}}],
    "warnings": ["string"]
  }},
  "overallStatus": "one sentence summary",
  "severity": "success | info | warning | critical",
  "confidence": 0,
  "recommendations": ["string"]
}}

"confidence" is an integer from 0 to 100."#
    )
}
