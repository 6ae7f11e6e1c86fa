//! Turns model text into a JSON value. Models sometimes wrap the object in a
//! Markdown fence or surround it with prose even when asked for JSON only.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("model output contains no JSON object")]
    NoObject,
    #[error("model output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_model_output(raw: &str) -> Result<Value, RepairError> {
    let unfenced = strip_code_fence(raw);
    if let Ok(value) = serde_json::from_str::<Value>(unfenced) {
        return Ok(value);
    }
    let object = outermost_object(unfenced).ok_or(RepairError::NoObject)?;
    Ok(serde_json::from_str::<Value>(object)?)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line. A single-line fence
    // keeps any info string; the object scan skips past it.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
