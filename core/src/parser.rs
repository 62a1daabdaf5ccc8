//! The describe-group parsing capability and the fallback dispatcher.
//!
//! [`DescribeGroupParser`] is implemented both by single-format parsers
//! ([`VersionedFormatParser`](crate::VersionedFormatParser)) and by
//! [`FallbackDispatcher`], which tries a list of parsers in order. A
//! dispatcher can therefore be used anywhere a single parser is expected,
//! including nested inside another dispatcher.

use std::fmt;

use tracing::debug;

use crate::error::{FormatRejection, ParseError, Result};
use crate::types::{ParsedDescribeOutput, PartitionLagRecord};

/// Parses describe-group output into lag records.
pub trait DescribeGroupParser: Send + Sync {
    /// Name used in diagnostics and in [`ParsedDescribeOutput::format`].
    fn name(&self) -> &str;

    /// Parses `output`, also reporting which format matched and which
    /// numeric values were replaced by the sentinel.
    fn parse_detailed(&self, output: &str) -> Result<ParsedDescribeOutput>;

    /// Parses `output` into records.
    fn parse(&self, output: &str) -> Result<Vec<PartitionLagRecord>> {
        self.parse_detailed(output).map(|parsed| parsed.records)
    }
}

/// Tries each parser in order and returns the first success.
///
/// Parsers are conventionally ordered oldest format first. Any error from a
/// parser counts as a rejection; when all parsers reject, the error is
/// [`ParseError::NoFormatMatched`] carrying every rejection in order.
pub struct FallbackDispatcher {
    name: String,
    parsers: Vec<Box<dyn DescribeGroupParser>>,
}

impl FallbackDispatcher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parsers: Vec::new(),
        }
    }

    /// Appends `parser` to the end of the fallback order.
    pub fn with_parser(mut self, parser: impl DescribeGroupParser + 'static) -> Self {
        self.push(parser);
        self
    }

    pub fn push(&mut self, parser: impl DescribeGroupParser + 'static) {
        self.parsers.push(Box::new(parser));
    }

    /// Names of the wrapped parsers, in fallback order.
    pub fn parser_names(&self) -> Vec<&str> {
        self.parsers.iter().map(|parser| parser.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl DescribeGroupParser for FallbackDispatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse_detailed(&self, output: &str) -> Result<ParsedDescribeOutput> {
        let mut rejections = Vec::with_capacity(self.parsers.len());

        for parser in &self.parsers {
            match parser.parse_detailed(output) {
                Ok(parsed) => return Ok(parsed),
                Err(reason) => {
                    debug!(parser = parser.name(), error = %reason, "parser rejected output");
                    rejections.push(FormatRejection {
                        format: parser.name().to_string(),
                        reason,
                    });
                }
            }
        }

        Err(ParseError::NoFormatMatched { rejections })
    }
}

impl fmt::Debug for FallbackDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackDispatcher")
            .field("name", &self.name)
            .field("parsers", &self.parser_names())
            .finish()
    }
}

impl fmt::Display for FallbackDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
