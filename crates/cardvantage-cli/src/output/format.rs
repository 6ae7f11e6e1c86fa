use serde_json::Value;

const INDENT: &str = "  ";
const COLUMN_GAP: &str = "  ";

pub fn key_value_rows(entries: &[(&str, String)]) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|(label, value)| format!("{INDENT}{label:<label_width$}  {value}"))
        .collect()
}

/// Left-aligned columns sized to their widest cell. The last column is not
/// padded so long values never leave trailing spaces.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|header| (*header).to_string()).collect();
    let mut lines = vec![format_row(&header_cells, &widths)];
    lines.extend(rows.iter().map(|row| format_row(row, &widths)));
    lines
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let last = widths.len().saturating_sub(1);
    let pieces: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let value = cells.get(index).map(String::as_str).unwrap_or("");
            if index == last {
                value.to_string()
            } else {
                let padding = width.saturating_sub(value.chars().count());
                format!("{value}{}", " ".repeat(padding))
            }
        })
        .collect();
    format!("{INDENT}{}", pieces.join(COLUMN_GAP))
}

pub fn string_field(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

pub fn count_field(row: &Value, key: &str) -> u64 {
    row.get(key).and_then(Value::as_u64).unwrap_or(0)
}

/// `2025-03-01T12:30:00.000Z` becomes `2025-03-01`; anything unparsable is
/// shown as stored.
pub fn short_date(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

pub fn plural(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
