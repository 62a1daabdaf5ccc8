//! Parser for one version of the describe-group output format.

use std::fmt;

use regex::Regex;
use tracing::warn;

use crate::error::{FormatDefinitionError, ParseError, Result};
use crate::field::{FieldExtractor, RawFields};
use crate::parser::DescribeGroupParser;
use crate::types::{DegradedValue, LAG_SENTINEL, LagField, ParsedDescribeOutput, PartitionLagRecord};

/// Describe-group parser for a single tool version.
///
/// The `header` pattern fingerprints the first line of the output; the line
/// pattern is applied to every following line once the header matched.
#[derive(Debug, Clone)]
pub struct VersionedFormatParser {
    name: String,
    header: Regex,
    extractor: FieldExtractor,
}

impl VersionedFormatParser {
    /// Compiles `header` and `line` and validates the line's capture groups.
    ///
    /// # Errors
    ///
    /// Returns [`FormatDefinitionError::InvalidPattern`] if either pattern
    /// fails to compile, or [`FormatDefinitionError::MissingCaptureGroup`]
    /// if `line` lacks a required named group.
    pub fn new(
        name: impl Into<String>,
        header: &str,
        line: &str,
    ) -> std::result::Result<Self, FormatDefinitionError> {
        let name = name.into();
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| FormatDefinitionError::InvalidPattern {
                format: name.clone(),
                source,
            })
        };
        let header = compile(header)?;
        let line = compile(line)?;
        let extractor = FieldExtractor::new(&name, line)?;
        Ok(Self {
            name,
            header,
            extractor,
        })
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    /// Returns `true` if `line` carries this format's header fingerprint.
    pub fn matches_header(&self, line: &str) -> bool {
        self.header.is_match(line)
    }

    fn parse_line(
        &self,
        line_number: usize,
        fields: &RawFields<'_, '_>,
        degraded: &mut Vec<DegradedValue>,
    ) -> PartitionLagRecord {
        let mut numeric = |field: LagField| {
            let raw = fields.get(field);
            parse_long(raw).unwrap_or_else(|| {
                warn!(
                    format = %self.name,
                    line = line_number,
                    field = %field,
                    value = raw,
                    "unable to parse integer, using sentinel"
                );
                degraded.push(DegradedValue {
                    line_number,
                    field,
                    raw: raw.to_string(),
                });
                LAG_SENTINEL
            })
        };
        let current_offset = numeric(LagField::CurrentOffset);
        let lag = numeric(LagField::Lag);

        PartitionLagRecord {
            topic: fields.get(LagField::Topic).to_string(),
            partition_id: fields.get(LagField::PartitionId).to_string(),
            current_offset,
            lag,
            client_id: fields.get(LagField::ClientId).to_string(),
            consumer_address: fields.get(LagField::ConsumerAddress).to_string(),
        }
    }
}

impl DescribeGroupParser for VersionedFormatParser {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse_detailed(&self, output: &str) -> Result<ParsedDescribeOutput> {
        let mut lines = output.lines();
        let Some(header) = lines.next() else {
            return Err(ParseError::EmptyOutput);
        };

        if !self.matches_header(header) {
            return Err(ParseError::HeaderMismatch {
                format: self.name.clone(),
                header: header.to_string(),
            });
        }

        let mut records = Vec::new();
        let mut degraded_values = Vec::new();
        for (offset, line) in lines.enumerate() {
            // Header is line 1.
            let line_number = offset + 2;
            if line.trim().is_empty() {
                continue;
            }
            let Some(fields) = self.extractor.extract(line) else {
                return Err(ParseError::LineMismatch {
                    format: self.name.clone(),
                    line_number,
                    line: line.to_string(),
                });
            };
            records.push(self.parse_line(line_number, &fields, &mut degraded_values));
        }

        Ok(ParsedDescribeOutput {
            format: self.name.clone(),
            records,
            degraded_values,
        })
    }
}

impl fmt::Display for VersionedFormatParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VersionedFormatParser{{name: {}, header: `{}`, line: `{}`}}",
            self.name,
            self.header,
            self.extractor.pattern()
        )
    }
}

/// Base-10 `i64` conversion; `None` when `value` is not an integer.
fn parse_long(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}
