use std::io;

use serde_json::Value;

use super::format::{key_value_rows, string_field};

pub fn render_recommendation(data: &Value) -> io::Result<String> {
    let site = data
        .get("site")
        .ok_or_else(|| io::Error::other("recommend output requires site"))?;
    let result = data
        .get("result")
        .ok_or_else(|| io::Error::other("recommend output requires result"))?;
    let recommendations = result
        .get("recommendations")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("recommend output requires recommendations"))?;

    let mut entries = vec![("Site:", string_field(site, "domain"))];
    let title = string_field(site, "title");
    if !title.is_empty() {
        entries.push(("Page:", title));
    }
    entries.push(("Category:", string_field(result, "category")));
    entries.push(("Source:", source_label(&string_field(data, "source"))));

    let mut lines = vec!["Best card for this site:".to_string(), String::new()];
    lines.extend(key_value_rows(&entries));
    lines.push(String::new());

    for (index, recommendation) in recommendations.iter().enumerate() {
        lines.push(format!(
            "  {}. {} ({})",
            index + 1,
            string_field(recommendation, "cardName"),
            string_field(recommendation, "rewardRate"),
        ));
        let reason = string_field(recommendation, "reason");
        if !reason.is_empty() {
            lines.push(format!("     {reason}"));
        }
    }

    Ok(lines.join("\n"))
}

fn source_label(source: &str) -> String {
    match source {
        "classifier" => "remote classifier".to_string(),
        "cache" => "cached result".to_string(),
        "fallback" => "local rules (classifier unavailable)".to_string(),
        other => other.to_string(),
    }
}
