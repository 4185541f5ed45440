//! Result rendering for prompts
//!
//! Renders a result set into the compact comma-joined table the answer
//! prompt embeds. Cell values containing the delimiter or newlines are NOT
//! escaped: the output is read by a language model, not a CSV parser, and
//! the occasional ambiguous cell is an accepted limitation.

use crate::db::types::{CellValue, QueryResults};

/// Marker returned for an empty result set
pub const NO_RESULTS: &str = "No results found.";

/// Render results as a header line of column names followed by one line per
/// row, fields joined with `", "` and NULL rendered as the literal `null`.
pub fn format_results(results: &QueryResults) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut out = String::new();
    let header: Vec<&str> = results.columns.iter().map(|c| c.name.as_str()).collect();
    out.push_str(&header.join(", "));
    out.push('\n');

    for row in &results.rows {
        let fields: Vec<String> = row.values.iter().map(cell_text).collect();
        out.push_str(&fields.join(", "));
        out.push('\n');
    }

    out
}

/// Stringify one cell for prompt injection
fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => "null".to_string(),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Float(f) => f.to_string(),
        CellValue::Text(s) => s.clone(),
        CellValue::Boolean(b) => b.to_string(),
        CellValue::Json(v) => v.to_string(),
        CellValue::Binary(b) => format!("<binary {} bytes>", b.len()),
    }
}
