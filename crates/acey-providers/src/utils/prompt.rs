//! Prompt rendering and completion scoring

use crate::constants::{CONFIDENCE_COMPLETE, CONFIDENCE_TRUNCATED, CONFIDENCE_UNKNOWN};
use acey_domain::value_objects::SkillRequest;

/// Text prompt sent to a generation backend
///
/// A `prompt` string field or a bare string payload is sent as is; anything
/// else is rendered together with the skill name.
pub fn render_prompt(request: &SkillRequest) -> String {
    if let Some(prompt) = request
        .payload
        .get("prompt")
        .and_then(serde_json::Value::as_str)
    {
        return prompt.to_string();
    }
    match &request.payload {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => format!("Skill: {}", request.skill_name),
        other => format!("Skill: {}\nInput: {other}", request.skill_name),
    }
}

/// Confidence implied by a completion's finish reason
pub fn confidence_for_finish_reason(reason: Option<&str>) -> f64 {
    match reason {
        Some("stop") => CONFIDENCE_COMPLETE,
        Some("length") => CONFIDENCE_TRUNCATED,
        _ => CONFIDENCE_UNKNOWN,
    }
}
