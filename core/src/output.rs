//! Output formatting for parsed records and group lists.

use serde::Serialize;

use crate::types::{GroupIdentifier, ParsedDescribeOutput, PartitionLagRecord};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Serializes `value` as JSON or YAML. Returns `None` for [`OutputFormat::Table`].
pub fn format_serialized<T: Serialize>(
    value: &T,
    format: OutputFormat,
) -> Option<Result<String, String>> {
    match format {
        OutputFormat::Json => Some(
            serde_json::to_string_pretty(value)
                .map_err(|e| format!("JSON serialization failed: {e}")),
        ),
        OutputFormat::Yaml => Some(
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}")),
        ),
        OutputFormat::Table => None,
    }
}

/// Formats lag records in the requested output format.
pub fn format_records(records: &[PartitionLagRecord], format: OutputFormat) -> Result<String, String> {
    format_serialized(&records, format).unwrap_or_else(|| Ok(records_to_table(records)))
}

/// Formats a full describe result, including the matched format.
pub fn format_parsed(parsed: &ParsedDescribeOutput, format: OutputFormat) -> Result<String, String> {
    format_serialized(parsed, format).unwrap_or_else(|| {
        let mut out = format!(
            "Format: {}  Partitions: {}  Total lag: {}\n",
            parsed.format,
            parsed.records.len(),
            parsed.total_lag()
        );
        out.push_str(&records_to_table(&parsed.records));
        for degraded in &parsed.degraded_values {
            out.push_str(&format!(
                "warning: line {} {} {:?} is not an integer\n",
                degraded.line_number, degraded.field, degraded.raw
            ));
        }
        Ok(out)
    })
}

/// Formats a group list in the requested output format.
pub fn format_groups(groups: &[GroupIdentifier], format: OutputFormat) -> Result<String, String> {
    format_serialized(&groups, format).unwrap_or_else(|| {
        let mut out = String::new();
        for group in groups {
            out.push_str(group.as_str());
            out.push('\n');
        }
        Ok(out)
    })
}

/// Renders records as a left-aligned text table.
pub fn records_to_table(records: &[PartitionLagRecord]) -> String {
    let header = ["TOPIC", "PARTITION", "CURRENT-OFFSET", "LAG", "CLIENT-ID", "HOST"];
    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            [
                r.topic.clone(),
                r.partition_id.clone(),
                r.current_offset.to_string(),
                r.lag.to_string(),
                r.client_id.clone(),
                r.consumer_address.clone(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, header.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
