//! Collector configuration.
//!
//! Controls how the consumer groups tool is invoked and which groups are
//! described on each scrape.
//!
//! # Example YAML
//!
//! ```yaml
//! tool:
//!   command: /opt/kafka/bin/kafka-consumer-groups.sh
//!   bootstrap_server: kafka-1:9092
//!   extra_args:
//!     - --new-consumer
//!   timeout_ms: 30000
//! groups:
//!   allowlist: []
//!   exclude:
//!     - console-consumer-1234
//! jobs: 4
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CollectorError, Result};

/// Default tool executable, resolved through `PATH`.
pub const DEFAULT_COMMAND: &str = "kafka-consumer-groups.sh";

/// Default broker address passed as `--bootstrap-server`.
pub const DEFAULT_BOOTSTRAP_SERVER: &str = "localhost:9092";

/// Default per-invocation timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default number of concurrent describe calls.
pub const DEFAULT_JOBS: usize = 4;

/// How to invoke the consumer groups tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Path or name of the tool executable.
    pub command: String,
    pub bootstrap_server: String,
    /// Extra arguments placed before the subcommand flags.
    pub extra_args: Vec<String>,
    /// Kill the tool if it runs longer than this.
    pub timeout_ms: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            bootstrap_server: DEFAULT_BOOTSTRAP_SERVER.to_string(),
            extra_args: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Which groups to describe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupFilter {
    /// Groups to describe (empty = every listed group).
    pub allowlist: Vec<String>,
    /// Groups to always skip.
    pub exclude: Vec<String>,
}

impl GroupFilter {
    /// Returns `true` if `group` is in the exclusion list.
    pub fn is_excluded(&self, group: &str) -> bool {
        self.exclude.iter().any(|g| g == group)
    }

    /// Returns `true` if `group` should be described.
    ///
    /// An empty allowlist allows every non-excluded group. Exclusions are
    /// always honored.
    pub fn is_allowed(&self, group: &str) -> bool {
        if self.is_excluded(group) {
            return false;
        }
        if self.allowlist.is_empty() {
            return true;
        }
        self.allowlist.iter().any(|g| g == group)
    }
}

/// Top-level collector configuration.
///
/// # Examples
///
/// ```
/// use consumer_lag_collector::CollectorConfig;
///
/// let config: CollectorConfig = serde_yaml::from_str("jobs: 2\n").unwrap();
/// assert_eq!(config.jobs, 2);
/// assert_eq!(config.tool.command, "kafka-consumer-groups.sh");
/// assert!(config.groups.is_allowed("billing"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub tool: ToolConfig,
    pub groups: GroupFilter,
    /// Number of groups described concurrently.
    pub jobs: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            tool: ToolConfig::default(),
            groups: GroupFilter::default(),
            jobs: DEFAULT_JOBS,
        }
    }
}

impl CollectorConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](CollectorError::Io) if the file cannot be read,
    /// [`Yaml`](CollectorError::Yaml) if parsing fails, or
    /// [`InvalidConfig`](CollectorError::InvalidConfig) if validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Rejects values that would make every scrape fail.
    pub fn validate(&self) -> Result<()> {
        if self.tool.command.trim().is_empty() {
            return Err(CollectorError::InvalidConfig(
                "tool.command must not be empty".to_string(),
            ));
        }
        if self.tool.timeout_ms == 0 {
            return Err(CollectorError::InvalidConfig(
                "tool.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.jobs == 0 {
            return Err(CollectorError::InvalidConfig(
                "jobs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
