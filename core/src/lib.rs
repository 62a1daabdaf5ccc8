//! Format-resilient parsing of `kafka-consumer-groups` output.
//!
//! The admin tool has changed its describe-group output incompatibly across
//! releases. This crate extracts typed lag records from any known version:
//!
//! - [`FieldNameIndex`] / [`FieldExtractor`]: a line pattern whose named
//!   capture groups are validated when the format is built.
//! - [`VersionedFormatParser`]: accepts output whose first line matches a
//!   header fingerprint and parses each remaining line.
//! - [`FallbackDispatcher`]: tries several parsers in order and returns the
//!   first success, or [`ParseError::NoFormatMatched`].
//! - [`GroupListParser`]: parses the list-groups output.
//!
//! [`default_parser`] returns a dispatcher over every format in
//! [`KNOWN_FORMATS`], built once per process.
//!
//! # Example
//!
//! ```
//! use consumer_lag_core::{DescribeGroupParser, default_parser};
//!
//! let output = "\
//! TOPIC PARTITION CURRENT-OFFSET LOG-END-OFFSET LAG CONSUMER-ID HOST CLIENT-ID
//! orders 0 105 110 5 consumer-1-abc /10.0.0.5 app-client-1
//! ";
//!
//! let records = default_parser().parse(output).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].topic, "orders");
//! assert_eq!(records[0].lag, 5);
//! assert_eq!(records[0].consumer_address, "/10.0.0.5");
//! ```

pub mod catalog;
mod error;
mod field;
mod format;
mod groups;
pub mod output;
mod parser;
mod types;

pub use catalog::{FormatDefinition, KNOWN_FORMATS, build_dispatcher, default_parser};
pub use error::{FormatDefinitionError, FormatRejection, ParseError, Result};
pub use field::{FieldExtractor, FieldNameIndex, RawFields};
pub use format::VersionedFormatParser;
pub use groups::{GroupListParser, RUNTIME_ERROR_MARKER};
pub use parser::{DescribeGroupParser, FallbackDispatcher};
pub use types::*;
