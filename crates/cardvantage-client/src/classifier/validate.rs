//! Shape and invariant checks applied to every classifier response before it
//! can reach the cache.

use serde_json::Value;

use crate::contracts::types::{MAX_RECOMMENDATIONS, Recommendation, RecommendationResult};
use crate::error::ClassifierError;

/// Validates a raw classifier body against the names that were submitted.
///
/// Entries naming unknown cards are dropped, as are repeats of a card already
/// recommended. At most [`MAX_RECOMMENDATIONS`] entries survive, and zero
/// survivors is an invalid response.
pub fn validate_response(
    body: &Value,
    submitted_names: &[String],
) -> Result<RecommendationResult, ClassifierError> {
    let object = body
        .as_object()
        .ok_or_else(|| invalid("response body is not a JSON object"))?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| invalid("`category` is missing or not a non-empty string"))?;

    let entries = object
        .get("recommendations")
        .ok_or_else(|| invalid("`recommendations` is missing"))?
        .as_array()
        .ok_or_else(|| invalid("`recommendations` is not an array"))?;

    let mut recommendations: Vec<Recommendation> = Vec::new();
    for entry in entries {
        let Some(recommendation) = parse_entry(entry) else {
            continue;
        };
        if !submitted_names.contains(&recommendation.card_name) {
            continue;
        }
        if recommendations
            .iter()
            .any(|kept| kept.card_name == recommendation.card_name)
        {
            continue;
        }
        recommendations.push(recommendation);
        if recommendations.len() == MAX_RECOMMENDATIONS {
            break;
        }
    }

    if recommendations.is_empty() {
        return Err(invalid(
            "no recommendation names a submitted card after filtering",
        ));
    }

    Ok(RecommendationResult {
        category: category.to_string(),
        recommendations,
    })
}

fn parse_entry(entry: &Value) -> Option<Recommendation> {
    let object = entry.as_object()?;
    let card_name = object.get("cardName")?.as_str()?.to_string();
    let reason = text_field(object.get("reason"))?;
    let reward_rate = text_field(object.get("rewardRate"))?;
    Some(Recommendation {
        card_name,
        reason,
        reward_rate,
    })
}

/// Missing and null become empty text; numbers are rendered; anything else
/// rejects the entry.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(_) => None,
    }
}

fn invalid(detail: &str) -> ClassifierError {
    ClassifierError::InvalidResponse(detail.to_string())
}
