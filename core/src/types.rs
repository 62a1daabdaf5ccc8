//! Record types produced by the describe-group and list-groups parsers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value substituted for `current_offset` or `lag` when the tool printed
/// something that is not a base-10 integer.
pub const LAG_SENTINEL: i64 = -1;

/// The six fields every describe-group line format must capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LagField {
    Topic,
    PartitionId,
    CurrentOffset,
    Lag,
    ClientId,
    ConsumerAddress,
}

impl LagField {
    /// All required fields, in record order.
    pub const ALL: [LagField; 6] = [
        LagField::Topic,
        LagField::PartitionId,
        LagField::CurrentOffset,
        LagField::Lag,
        LagField::ClientId,
        LagField::ConsumerAddress,
    ];

    /// Capture group name a line pattern must define for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            LagField::Topic => "topic",
            LagField::PartitionId => "partitionId",
            LagField::CurrentOffset => "currentOffset",
            LagField::Lag => "lag",
            LagField::ClientId => "clientId",
            LagField::ConsumerAddress => "consumerAddress",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, LagField::CurrentOffset | LagField::Lag)
    }
}

impl fmt::Display for LagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lag of one consumer on one topic partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionLagRecord {
    pub topic: String,
    /// Kept as text; formats differ in how they print partition numbers.
    pub partition_id: String,
    /// Committed offset, or [`LAG_SENTINEL`] when unparsable.
    pub current_offset: i64,
    /// Log-end offset minus committed offset, or [`LAG_SENTINEL`] when unparsable.
    pub lag: i64,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub consumer_address: String,
}

impl PartitionLagRecord {
    /// Returns `true` if either numeric field holds the sentinel.
    pub fn has_degraded_values(&self) -> bool {
        self.current_offset == LAG_SENTINEL || self.lag == LAG_SENTINEL
    }
}

/// Name of one consumer group as printed by the list-groups command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupIdentifier(String);

impl GroupIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for GroupIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupIdentifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for GroupIdentifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for GroupIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A numeric column that could not be converted and was replaced by
/// [`LAG_SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedValue {
    /// 1-based line number within the parsed output.
    pub line_number: usize,
    pub field: LagField,
    /// The captured text that failed to parse.
    pub raw: String,
}

/// Result of a successful describe-group parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDescribeOutput {
    /// Name of the format whose header matched.
    pub format: String,
    pub records: Vec<PartitionLagRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_values: Vec<DegradedValue>,
}

impl ParsedDescribeOutput {
    /// Sum of all measurable lag values; sentinel lags are ignored.
    pub fn total_lag(&self) -> i64 {
        self.records
            .iter()
            .filter(|record| record.lag != LAG_SENTINEL)
            .map(|record| record.lag)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lag: i64, current_offset: i64) -> PartitionLagRecord {
        PartitionLagRecord {
            topic: "orders".to_string(),
            partition_id: "0".to_string(),
            current_offset,
            lag,
            client_id: String::new(),
            consumer_address: String::new(),
        }
    }

    #[test]
    fn test_field_names_match_capture_groups() {
        let names: Vec<&str> = LagField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "topic",
                "partitionId",
                "currentOffset",
                "lag",
                "clientId",
                "consumerAddress"
            ]
        );
        assert!(LagField::Lag.is_numeric());
        assert!(!LagField::Topic.is_numeric());
    }

    #[test]
    fn test_total_lag_skips_sentinel() {
        let output = ParsedDescribeOutput {
            format: "test".to_string(),
            records: vec![record(5, 10), record(LAG_SENTINEL, 3), record(7, LAG_SENTINEL)],
            degraded_values: Vec::new(),
        };
        assert_eq!(output.total_lag(), 12);
        assert!(!output.records[0].has_degraded_values());
        assert!(output.records[1].has_degraded_values());
        assert!(output.records[2].has_degraded_values());
    }

    #[test]
    fn test_group_identifier_serializes_as_string() {
        let group = GroupIdentifier::from("billing");
        assert_eq!(serde_json::to_string(&group).unwrap(), "\"billing\"");
        assert_eq!(group.to_string(), "billing");
    }
}
