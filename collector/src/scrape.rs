//! One scrape cycle: list groups, then describe each allowed group.
//!
//! A failure to list groups fails the whole cycle. A failure to describe
//! or parse a single group is recorded in that group's report and does not
//! affect the others.

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use consumer_lag_core::{
    DescribeGroupParser, GroupIdentifier, GroupListParser, ParsedDescribeOutput,
    PartitionLagRecord, default_parser,
};

use crate::config::CollectorConfig;
use crate::error::Result;
use crate::runner::{ToolRunner, describe_group_args, list_groups_args};

/// Lag of one consumer group within a scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLagReport {
    pub group: String,
    /// Format that parsed the describe output; `None` when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub partitions: Vec<PartitionLagRecord>,
    pub total_lag: i64,
    /// Number of numeric values replaced by the sentinel.
    pub degraded_values: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GroupLagReport {
    fn parsed(group: &GroupIdentifier, parsed: ParsedDescribeOutput) -> Self {
        Self {
            group: group.to_string(),
            total_lag: parsed.total_lag(),
            degraded_values: parsed.degraded_values.len(),
            format: Some(parsed.format),
            partitions: parsed.records,
            error: None,
        }
    }

    fn failed(group: &GroupIdentifier, error: String) -> Self {
        Self {
            group: group.to_string(),
            format: None,
            partitions: Vec::new(),
            total_lag: 0,
            degraded_values: 0,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of one scrape cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// RFC 3339 timestamp of when the cycle finished.
    pub generated_at: String,
    pub bootstrap_server: String,
    /// Reports sorted by group name.
    pub groups: Vec<GroupLagReport>,
    /// Listed groups filtered out by the allowlist or exclusions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    pub failures: usize,
}

impl ScrapeReport {
    pub fn total_lag(&self) -> i64 {
        self.groups.iter().map(|group| group.total_lag).sum()
    }

    pub fn find_group(&self, group: &str) -> Option<&GroupLagReport> {
        self.groups.iter().find(|report| report.group == group)
    }
}

/// Drives the tool through a [`ToolRunner`] and parses its output.
pub struct Collector<R> {
    config: CollectorConfig,
    runner: R,
    groups_parser: GroupListParser,
}

impl<R: ToolRunner> Collector<R> {
    pub fn new(config: CollectorConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            groups_parser: GroupListParser::new(),
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs `--list` and parses the group names.
    pub fn list_groups(&self) -> Result<Vec<GroupIdentifier>> {
        let output = self.runner.run(&list_groups_args(&self.config.tool))?;
        Ok(self.groups_parser.parse(&output)?)
    }

    /// Runs `--describe` for `group` and parses it with every known format.
    pub fn describe_group(&self, group: &GroupIdentifier) -> Result<ParsedDescribeOutput> {
        let output = self
            .runner
            .run(&describe_group_args(&self.config.tool, group.as_str()))?;
        let parsed = default_parser().parse_detailed(&output)?;
        if !parsed.degraded_values.is_empty() {
            debug!(
                group = %group,
                degraded = parsed.degraded_values.len(),
                "group has values replaced by sentinel"
            );
        }
        Ok(parsed)
    }

    /// Runs one full scrape cycle.
    ///
    /// # Errors
    ///
    /// Returns an error only if listing groups fails or the worker pool
    /// cannot be built. Per-group failures are reported in
    /// [`GroupLagReport::error`].
    pub fn scrape(&self) -> Result<ScrapeReport> {
        let (groups, skipped): (Vec<GroupIdentifier>, Vec<GroupIdentifier>) = self
            .list_groups()?
            .into_iter()
            .partition(|group| self.config.groups.is_allowed(group.as_str()));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs.max(1))
            .build()?;

        let mut reports: Vec<GroupLagReport> = pool.install(|| {
            groups
                .par_iter()
                .map(|group| match self.describe_group(group) {
                    Ok(parsed) => GroupLagReport::parsed(group, parsed),
                    Err(err) => {
                        warn!(group = %group, error = %err, "failed to describe group");
                        GroupLagReport::failed(group, err.to_string())
                    }
                })
                .collect()
        });
        reports.sort_by(|a, b| a.group.cmp(&b.group));

        let failures = reports.iter().filter(|report| !report.is_success()).count();
        info!(
            groups = reports.len(),
            skipped = skipped.len(),
            failures,
            "scrape finished"
        );

        Ok(ScrapeReport {
            generated_at: Utc::now().to_rfc3339(),
            bootstrap_server: self.config.tool.bootstrap_server.clone(),
            groups: reports,
            skipped: skipped.into_iter().map(GroupIdentifier::into_inner).collect(),
            failures,
        })
    }
}
