use std::io;

use serde_json::Value;

use super::format::{count_field, key_value_rows, plural, render_table, short_date, string_field};

pub fn render_card_list(data: &Value) -> io::Result<String> {
    let cards = data
        .get("cards")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("card list output requires cards"))?;

    if cards.is_empty() {
        return Ok([
            "No cards saved yet.",
            "",
            "Add your first card:",
            "  cardvantage card add \"Chase Sapphire Reserve\"",
        ]
        .join("\n"));
    }

    let rows: Vec<Vec<String>> = cards
        .iter()
        .map(|card| {
            vec![
                string_field(card, "id"),
                string_field(card, "name"),
                short_date(&string_field(card, "dateAdded")),
                reward_summary(card),
            ]
        })
        .collect();

    let mut lines = vec![format!(
        "Saved cards ({}):",
        plural(cards.len() as u64, "card", "cards")
    )];
    lines.push(String::new());
    lines.extend(render_table(&["Id", "Name", "Added", "Rewards"], &rows));
    Ok(lines.join("\n"))
}

pub fn render_card_added(data: &Value) -> io::Result<String> {
    render_card_change("Card saved.", data)
}

pub fn render_card_deleted(data: &Value) -> io::Result<String> {
    render_card_change("Card deleted.", data)
}

fn render_card_change(headline: &str, data: &Value) -> io::Result<String> {
    let card = data
        .get("card")
        .ok_or_else(|| io::Error::other("card output requires card"))?;

    let mut lines = vec![headline.to_string(), String::new()];
    lines.extend(key_value_rows(&[
        ("Id:", string_field(card, "id")),
        ("Name:", string_field(card, "name")),
        ("Rewards:", reward_summary(card)),
        (
            "Saved cards:",
            count_field(data, "card_count").to_string(),
        ),
        (
            "Cache cleared:",
            plural(
                count_field(data, "cache_entries_invalidated"),
                "entry",
                "entries",
            ),
        ),
    ]));
    Ok(lines.join("\n"))
}

/// `Dining 3.0x, Travel 3.0x, rotating Gas, base 1.0x`, or `catalog` for
/// name-only cards.
fn reward_summary(card: &Value) -> String {
    let Some(profile) = card.get("rewardProfile").filter(|value| value.is_object()) else {
        return "catalog".to_string();
    };

    let mut parts: Vec<String> = profile
        .get("categoryRates")
        .and_then(Value::as_object)
        .map(|rates| {
            rates
                .iter()
                .map(|(category, rate)| {
                    format!("{category} {:.1}x", rate.as_f64().unwrap_or(0.0))
                })
                .collect()
        })
        .unwrap_or_default();

    if let Some(rotating) = profile.get("rotatingCategories").and_then(Value::as_array) {
        parts.extend(
            rotating
                .iter()
                .filter_map(Value::as_str)
                .map(|category| format!("rotating {category}")),
        );
    }

    let base = profile.get("baseRate").and_then(Value::as_f64).unwrap_or(1.0);
    parts.push(format!("base {base:.1}x"));
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_card_added, render_card_list};

    #[test]
    fn empty_list_points_at_card_add() {
        let rendered = render_card_list(&json!({"cards": []}));
        assert!(matches!(rendered, Ok(ref text) if text.contains("cardvantage card add")));
    }

    #[test]
    fn list_shows_reward_summaries() {
        let rendered = render_card_list(&json!({
            "cards": [
                {"id": "card_1", "name": "Amex Gold", "dateAdded": "2025-03-01T12:30:00.000Z"},
                {
                    "id": "card_2",
                    "name": "Custom",
                    "dateAdded": "2025-03-02T12:30:00.000Z",
                    "rewardProfile": {
                        "baseRate": 1.5,
                        "categoryRates": {"Gas": 3.0},
                        "rotatingCategories": ["Groceries"]
                    }
                }
            ]
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Saved cards (2 cards):"));
            assert!(text.contains("2025-03-01"));
            assert!(text.contains("catalog"));
            assert!(text.contains("Gas 3.0x, rotating Groceries, base 1.5x"));
        }
    }

    #[test]
    fn added_card_reports_cache_invalidation() {
        let rendered = render_card_added(&json!({
            "card": {"id": "card_1", "name": "Amex Gold", "dateAdded": "2025-03-01T12:30:00.000Z"},
            "card_count": 1,
            "cache_entries_invalidated": 3
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Card saved."));
            assert!(text.contains("Cache cleared:  3 entries"));
        }
    }
}
