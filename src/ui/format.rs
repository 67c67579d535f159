//! Output formats for tabular data.
//!
//! A command that prints records picks a formatter by the name given in its
//! `--format` flag. `json` and `raw` are strict-data formats: their consumer
//! is a program, so the command controller suppresses all human-readable
//! prose while one of them is active.

use serde_json::Value;

use super::table::Table;
use crate::error::Result;

/// Formats whose output is meant for machines.
pub const STRICT_DATA_FORMATS: &[&str] = &["json", "raw"];

/// Every format name a command may accept.
pub const FORMATS: &[&str] = &["plain", "json", "raw", "row", "table"];

/// Whether `format` selects a strict-data format. No format is human mode.
pub fn is_strict_data(format: Option<&str>) -> bool {
    format.is_some_and(|f| STRICT_DATA_FORMATS.contains(&f))
}

/// Renders records for one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// `Label: value` lines, one block per record.
    Plain,
    /// Pretty-printed JSON array of the records.
    Json,
    /// Compact JSON array of the records.
    Raw,
    /// One numbered vertical block per record.
    Row,
    /// Box-drawing table.
    Table,
}

impl Formatter {
    /// Look up a formatter by format name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "plain" => Some(Self::Plain),
            "json" => Some(Self::Json),
            "raw" => Some(Self::Raw),
            "row" => Some(Self::Row),
            "table" => Some(Self::Table),
            _ => None,
        }
    }

    /// Render `rows` using `headers` as `(label, key)` pairs.
    ///
    /// JSON formats emit the records whole; the others show only the
    /// header columns.
    pub fn render(&self, rows: &[Value], headers: &[(&str, &str)]) -> Result<String> {
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(rows)?),
            Self::Raw => Ok(serde_json::to_string(rows)?),
            Self::Table => {
                let labels: Vec<&str> = headers.iter().map(|(label, _)| *label).collect();
                let mut table = Table::new(&labels);
                for row in rows {
                    table.add_row(headers.iter().map(|(_, key)| cell(row, key)).collect());
                }
                Ok(table.render())
            }
            Self::Row => Ok(render_rows(rows, headers)),
            Self::Plain => Ok(rows
                .iter()
                .map(|row| {
                    headers
                        .iter()
                        .map(|(label, key)| format!("{}: {}", label, cell(row, key)))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect::<Vec<_>>()
                .join("\n\n")),
        }
    }
}

fn render_rows(rows: &[Value], headers: &[(&str, &str)]) -> String {
    let width = headers
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut block = vec![format!("== {} ==", i + 1)];
            for (label, key) in headers {
                block.push(format!("  {:<width$}  {}", label, cell(row, key), width = width));
            }
            block.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Display text for one field of a record.
fn cell(row: &Value, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
