//! Error types for parsing consumer group tool output.
//!
//! [`ParseError`] covers failures of a single parse call. Format rejections
//! (`EmptyOutput`, `HeaderMismatch`, `LineMismatch`) are recovered by the
//! fallback dispatcher; only `ToolRuntimeError` and `NoFormatMatched` are
//! expected to reach callers. [`FormatDefinitionError`] is raised while
//! building a format parser and indicates a broken pattern.

use thiserror::Error;

use crate::types::LagField;

/// Errors returned by describe-group and list-groups parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The tool printed a Java runtime fault instead of its normal output.
    #[error("consumer groups tool reported a runtime error. Output: {output}")]
    ToolRuntimeError { output: String },

    /// The output contained no lines.
    #[error("empty output")]
    EmptyOutput,

    /// The first line is not the header of this format.
    #[error("incorrect header for format {format}: {header:?}")]
    HeaderMismatch { format: String, header: String },

    /// A detail line did not match the line pattern of a format whose header matched.
    #[error("line {line_number} does not match format {format}: {line:?}")]
    LineMismatch {
        format: String,
        line_number: usize,
        line: String,
    },

    /// Every known format rejected the output.
    #[error("no parser could parse the output ({} formats tried)", rejections.len())]
    NoFormatMatched { rejections: Vec<FormatRejection> },
}

impl ParseError {
    /// Returns `true` for errors meaning "wrong format, try the next one".
    pub fn is_format_rejection(&self) -> bool {
        matches!(
            self,
            ParseError::EmptyOutput
                | ParseError::HeaderMismatch { .. }
                | ParseError::LineMismatch { .. }
        )
    }

    /// Last per-format rejection recorded by the dispatcher, if any.
    pub fn last_rejection(&self) -> Option<&FormatRejection> {
        match self {
            ParseError::NoFormatMatched { rejections } => rejections.last(),
            _ => None,
        }
    }
}

/// Why one format rejected an output, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRejection {
    pub format: String,
    pub reason: ParseError,
}

/// Errors raised while building a format parser from its patterns.
#[derive(Debug, Clone, Error)]
pub enum FormatDefinitionError {
    /// A header or line pattern failed to compile.
    #[error("invalid pattern in format {format}: {source}")]
    InvalidPattern {
        format: String,
        #[source]
        source: regex::Error,
    },

    /// The line pattern does not define a required named capture group.
    #[error("line regexp of format {format} missing '{field}' capturing group")]
    MissingCaptureGroup { format: String, field: LagField },
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
