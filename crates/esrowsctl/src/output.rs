//! Rendering of normalized rows.

use anyhow::{Context, Result};
use esrows_common::{FlatRecord, OutputFormat};
use serde_json::Value;

/// Render rows in the requested format. The result always ends with a newline
/// unless there is nothing to print.
pub fn render(records: &[FlatRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Jsonl => render_jsonl(records),
        OutputFormat::Json => {
            let mut out =
                serde_json::to_string_pretty(records).context("Failed to serialize rows")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Table => Ok(render_table(records)),
    }
}

fn render_jsonl(records: &[FlatRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record).context("Failed to serialize row")?);
        out.push('\n');
    }
    Ok(out)
}

/// Union of all field names, in order of first appearance.
pub fn union_columns(records: &[FlatRecord]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for name in record.names() {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
    }
    columns
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::Null) => "NULL".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_table(records: &[FlatRecord]) -> String {
    let columns = union_columns(records);
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| columns.iter().map(|c| cell(r.get(c))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    if !columns.is_empty() {
        let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &rows {
            push_line(&mut out, row, &widths);
        }
    }

    let noun = if records.len() == 1 { "row" } else { "rows" };
    out.push_str(&format!("({} {})\n", records.len(), noun));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
