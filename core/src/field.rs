//! Named-field extraction from a single detail line.

use regex::{Captures, Regex};

use crate::error::FormatDefinitionError;
use crate::types::LagField;

const FIELD_COUNT: usize = LagField::ALL.len();

/// Capture group position of every required [`LagField`] in a line pattern.
///
/// Built once from the pattern's named groups. Construction fails when any
/// required name is absent, so a built index always resolves every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNameIndex {
    positions: [usize; FIELD_COUNT],
}

impl FieldNameIndex {
    /// Scans the named capture groups of `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatDefinitionError::MissingCaptureGroup`] naming the
    /// first required field without a capture group.
    pub fn build(format: &str, pattern: &Regex) -> Result<Self, FormatDefinitionError> {
        let mut positions = [0; FIELD_COUNT];
        for (slot, field) in LagField::ALL.iter().enumerate() {
            let position = pattern
                .capture_names()
                .position(|name| name == Some(field.as_str()))
                .ok_or_else(|| FormatDefinitionError::MissingCaptureGroup {
                    format: format.to_string(),
                    field: *field,
                })?;
            positions[slot] = position;
        }
        Ok(Self { positions })
    }

    /// Capture group position of `field`.
    pub fn position(&self, field: LagField) -> usize {
        self.positions[slot(field)]
    }

    /// Iterates `(field, position)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (LagField, usize)> + '_ {
        LagField::ALL
            .iter()
            .copied()
            .zip(self.positions.iter().copied())
    }
}

fn slot(field: LagField) -> usize {
    match field {
        LagField::Topic => 0,
        LagField::PartitionId => 1,
        LagField::CurrentOffset => 2,
        LagField::Lag => 3,
        LagField::ClientId => 4,
        LagField::ConsumerAddress => 5,
    }
}

/// A line pattern together with its validated [`FieldNameIndex`].
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    line: Regex,
    index: FieldNameIndex,
}

impl FieldExtractor {
    /// Wraps `line` after checking it captures every required field.
    pub fn new(format: &str, line: Regex) -> Result<Self, FormatDefinitionError> {
        let index = FieldNameIndex::build(format, &line)?;
        Ok(Self { line, index })
    }

    pub fn index(&self) -> &FieldNameIndex {
        &self.index
    }

    pub fn pattern(&self) -> &Regex {
        &self.line
    }

    /// Name of the capture group the index resolves `field` to.
    pub fn group_name(&self, field: LagField) -> Option<&str> {
        self.line
            .capture_names()
            .nth(self.index.position(field))
            .flatten()
    }

    /// Matches `line`, returning `None` when the pattern does not apply.
    pub fn extract<'t>(&self, line: &'t str) -> Option<RawFields<'_, 't>> {
        self.line.captures(line).map(|captures| RawFields {
            captures,
            index: &self.index,
        })
    }
}

/// Captured text of one matched line, addressed by [`LagField`].
pub struct RawFields<'i, 't> {
    captures: Captures<'t>,
    index: &'i FieldNameIndex,
}

impl<'t> RawFields<'_, 't> {
    /// Captured text for `field`, verbatim. Empty if the group did not
    /// participate in the match.
    pub fn get(&self, field: LagField) -> &'t str {
        self.captures
            .get(self.index.position(field))
            .map_or("", |m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r"(?P<topic>\S+) (?P<partitionId>\d+) (?P<currentOffset>\S+) (?P<lag>\S+) (?P<clientId>\S+) (?P<consumerAddress>\S+)";

    #[test]
    fn test_index_resolves_every_field() {
        let re = Regex::new(FULL).unwrap();
        let index = FieldNameIndex::build("test", &re).unwrap();
        let positions: Vec<usize> = index.iter().map(|(_, pos)| pos).collect();
        assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_positions_point_at_named_groups() {
        let re = Regex::new(
            r"(?P<consumerId>\S+) (\S+) (?P<consumerAddress>\S+) (?P<clientId>\S+) (?P<lag>\d+) (?P<currentOffset>\d+) (?P<partitionId>\d+) (?P<topic>\S+)",
        )
        .unwrap();
        let extractor = FieldExtractor::new("test", re).unwrap();
        for field in LagField::ALL {
            assert_eq!(extractor.group_name(field), Some(field.as_str()));
        }
        assert_eq!(extractor.index().position(LagField::ConsumerAddress), 3);
    }

    #[test]
    fn test_index_ignores_unrequired_groups() {
        let re = Regex::new(
            r"(?P<consumerId>\S+) (?P<consumerAddress>\S+) (?P<clientId>\S+) (?P<lag>\d+) (?P<currentOffset>\d+) (?P<partitionId>\d+) (?P<topic>\S+)",
        )
        .unwrap();
        let index = FieldNameIndex::build("test", &re).unwrap();
        assert_eq!(index.position(LagField::Topic), 7);
        assert_eq!(index.position(LagField::ConsumerAddress), 2);
    }

    #[test]
    fn test_missing_group_names_the_field() {
        let re = Regex::new(
            r"(?P<topic>\S+) (?P<partitionId>\d+) (?P<currentOffset>\d+) (?P<clientId>\S+) (?P<consumerAddress>\S+)",
        )
        .unwrap();
        let err = FieldNameIndex::build("broken", &re).unwrap_err();
        match err {
            FormatDefinitionError::MissingCaptureGroup { format, field } => {
                assert_eq!(format, "broken");
                assert_eq!(field, LagField::Lag);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extract_returns_verbatim_text() {
        let extractor = FieldExtractor::new("test", Regex::new(FULL).unwrap()).unwrap();
        let fields = extractor.extract("orders 3 0042 x app /10.0.0.1").unwrap();
        assert_eq!(fields.get(LagField::Topic), "orders");
        assert_eq!(fields.get(LagField::PartitionId), "3");
        assert_eq!(fields.get(LagField::CurrentOffset), "0042");
        assert_eq!(fields.get(LagField::Lag), "x");
        assert_eq!(fields.get(LagField::ClientId), "app");
        assert_eq!(fields.get(LagField::ConsumerAddress), "/10.0.0.1");
        assert!(extractor.extract("nope").is_none());
    }
}
