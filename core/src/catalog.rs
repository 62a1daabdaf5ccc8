//! Built-in describe-group formats of `kafka-consumer-groups`.
//!
//! Column widths are not guaranteed to be stable across releases, so every
//! whitespace-delimited format uses `\s+` between columns. Line patterns are
//! unanchored, except for Kafka 2.0.0 whose leading GROUP column must be
//! consumed before the topic. The 0.10.2.1 header is anchored because it is
//! a suffix of the 2.0.0 header. Numeric columns capture any token so
//! placeholders like `-` are degraded to the sentinel instead of rejecting
//! the line.

use std::sync::LazyLock;

use crate::error::FormatDefinitionError;
use crate::format::VersionedFormatParser;
use crate::parser::FallbackDispatcher;

/// Header and line patterns of one tool version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDefinition {
    pub name: &'static str,
    /// Pattern matched against the first line of the output.
    pub header: &'static str,
    /// Pattern applied to every detail line; must define all six required
    /// capture groups.
    pub line: &'static str,
}

impl FormatDefinition {
    pub fn build(&self) -> Result<VersionedFormatParser, FormatDefinitionError> {
        VersionedFormatParser::new(self.name, self.header, self.line)
    }
}

/// Kafka 0.9.0.1: comma separated, owner column is `clientId_/address`.
pub const KAFKA_0_9_0_1: FormatDefinition = FormatDefinition {
    name: "kafka-0.9.0.1",
    header: r"GROUP, TOPIC, PARTITION, CURRENT OFFSET, LOG END OFFSET, LAG, OWNER",
    line: r"[^,]+, (?P<topic>[a-zA-Z0-9._\-]+), (?P<partitionId>\d+), (?P<currentOffset>[^,]+), [^,]+, (?P<lag>[^,]+), (?:(?P<clientId>.+)_/(?P<consumerAddress>.+)|none)",
};

/// Kafka 0.10.0.1: whitespace separated, leading group column.
pub const KAFKA_0_10_0_1: FormatDefinition = FormatDefinition {
    name: "kafka-0.10.0.1",
    header: r"GROUP\s+TOPIC\s+PARTITION\s+CURRENT-OFFSET\s+LOG-END-OFFSET\s+LAG\s+OWNER",
    line: r".+\s+(?P<topic>[a-zA-Z0-9._\-]+)\s+(?P<partitionId>\d+)\s+(?P<currentOffset>\S+)\s+\S+\s+(?P<lag>\S+)\s+(?:(?P<clientId>\S+)_/(?P<consumerAddress>\S+)|none)",
};

/// Kafka 0.10.2.1: whitespace separated, separate consumer, host and client columns.
pub const KAFKA_0_10_2_1: FormatDefinition = FormatDefinition {
    name: "kafka-0.10.2.1",
    header: r"^TOPIC\s+PARTITION\s+CURRENT-OFFSET\s+LOG-END-OFFSET\s+LAG\s+CONSUMER-ID\s+HOST\s+CLIENT-ID",
    line: r"(?P<topic>[a-zA-Z0-9._\-]+)\s+(?P<partitionId>\d+)\s+(?P<currentOffset>\S+)\s+\S+\s+(?P<lag>\S+)\s+(?P<consumerId>\S+)\s+(?P<consumerAddress>\S+)\s+(?P<clientId>\S+)",
};

/// Kafka 2.0.0 and later: the 0.10.2.1 columns preceded by the group.
pub const KAFKA_2_0_0: FormatDefinition = FormatDefinition {
    name: "kafka-2.0.0",
    header: r"^GROUP\s+TOPIC\s+PARTITION\s+CURRENT-OFFSET\s+LOG-END-OFFSET\s+LAG\s+CONSUMER-ID\s+HOST\s+CLIENT-ID",
    line: r"^\S+\s+(?P<topic>[a-zA-Z0-9._\-]+)\s+(?P<partitionId>\d+)\s+(?P<currentOffset>\S+)\s+\S+\s+(?P<lag>\S+)\s+(?P<consumerId>\S+)\s+(?P<consumerAddress>\S+)\s+(?P<clientId>\S+)",
};

/// All known formats, oldest first.
pub const KNOWN_FORMATS: &[FormatDefinition] =
    &[KAFKA_0_9_0_1, KAFKA_0_10_0_1, KAFKA_0_10_2_1, KAFKA_2_0_0];

/// Name of the dispatcher returned by [`default_parser`].
pub const DEFAULT_PARSER_NAME: &str = "default";

static DEFAULT_PARSER: LazyLock<FallbackDispatcher> = LazyLock::new(|| {
    // The catalog is compile-time constant; a failure here is a bug in a
    // pattern above, not a runtime condition.
    build_dispatcher(DEFAULT_PARSER_NAME, KNOWN_FORMATS)
        .expect("built-in describe-group formats must be valid")
});

/// Dispatcher over every [`KNOWN_FORMATS`] entry, built on first use.
pub fn default_parser() -> &'static FallbackDispatcher {
    &DEFAULT_PARSER
}

/// Builds a dispatcher trying `formats` in the given order.
///
/// # Errors
///
/// Returns the first [`FormatDefinitionError`] encountered.
pub fn build_dispatcher(
    name: &str,
    formats: &[FormatDefinition],
) -> Result<FallbackDispatcher, FormatDefinitionError> {
    formats
        .iter()
        .try_fold(FallbackDispatcher::new(name), |dispatcher, definition| {
            Ok(dispatcher.with_parser(definition.build()?))
        })
}
