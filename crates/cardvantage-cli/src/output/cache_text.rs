use std::io;

use serde_json::Value;

use super::format::{plural, render_table, short_date, string_field};

pub fn render_cache_list(data: &Value) -> io::Result<String> {
    let entries = data
        .get("entries")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("cache list output requires entries"))?;

    if entries.is_empty() {
        return Ok([
            "No cached recommendations.",
            "",
            "Only remote classifier results are cached; adding or deleting a card clears the cache.",
        ]
        .join("\n"));
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            let result = entry.get("result").cloned().unwrap_or(Value::Null);
            let top_card = result
                .get("recommendations")
                .and_then(Value::as_array)
                .and_then(|recommendations| recommendations.first())
                .map(|first| string_field(first, "cardName"))
                .unwrap_or_default();
            let card_count = entry
                .get("card_names")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            vec![
                string_field(entry, "domain"),
                string_field(&result, "category"),
                top_card,
                plural(card_count as u64, "card", "cards"),
                short_date(&string_field(entry, "stored_at")),
            ]
        })
        .collect();

    let mut lines = vec![format!(
        "Cached recommendations ({}):",
        plural(entries.len() as u64, "entry", "entries")
    )];
    lines.push(String::new());
    lines.extend(render_table(
        &["Domain", "Category", "Top card", "Card set", "Stored"],
        &rows,
    ));
    Ok(lines.join("\n"))
}
