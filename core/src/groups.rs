//! Parser for list-groups output.

use crate::error::{ParseError, Result};
use crate::types::GroupIdentifier;

/// Substring the tool prints when it dies with an uncaught Java exception.
pub const RUNTIME_ERROR_MARKER: &str = "java.lang.RuntimeException";

/// Parses the bare list of group names printed by `--list`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupListParser;

impl GroupListParser {
    pub fn new() -> Self {
        Self
    }

    /// Returns every non-empty line as a group, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ToolRuntimeError`] carrying the full output if
    /// it contains [`RUNTIME_ERROR_MARKER`] anywhere.
    pub fn parse(&self, output: &str) -> Result<Vec<GroupIdentifier>> {
        if output.contains(RUNTIME_ERROR_MARKER) {
            return Err(ParseError::ToolRuntimeError {
                output: output.to_string(),
            });
        }

        Ok(output
            .lines()
            .filter(|line| !line.is_empty())
            .map(GroupIdentifier::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(groups: &[GroupIdentifier]) -> Vec<&str> {
        groups.iter().map(|g| g.as_str()).collect()
    }

    #[test]
    fn test_blank_lines_are_skipped_in_order() {
        let groups = GroupListParser::new()
            .parse("billing\n\nanalytics\n\n\nconsole-consumer-123\n")
            .unwrap();
        assert_eq!(names(&groups), vec!["billing", "analytics", "console-consumer-123"]);
    }

    #[test]
    fn test_runtime_exception_fails_with_output() {
        let output = "billing\nException in thread \"main\" java.lang.RuntimeException: Request METADATA failed\n";
        let err = GroupListParser::new().parse(output).unwrap_err();
        assert_eq!(
            err,
            ParseError::ToolRuntimeError {
                output: output.to_string()
            }
        );
        assert!(!err.is_format_rejection());
    }

    #[test]
    fn test_empty_output_has_no_groups() {
        assert!(GroupListParser::new().parse("").unwrap().is_empty());
        assert!(GroupListParser::new().parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_group_names_are_verbatim() {
        let groups = GroupListParser::new().parse("  spaced group \r\nx").unwrap();
        assert_eq!(names(&groups), vec!["  spaced group ", "x"]);
    }
}
