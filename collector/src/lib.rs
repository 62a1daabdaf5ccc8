//! Collection of consumer group lag from `kafka-consumer-groups`.
//!
//! Runs the tool as a subprocess, parses its output with
//! [`consumer_lag_core`], and assembles a [`ScrapeReport`] covering every
//! allowed consumer group.
//!
//! - [`CollectorConfig`]: YAML configuration (tool path, broker, groups).
//! - [`ProcessRunner`]: spawns the tool with a timeout.
//! - [`Collector`]: lists groups and describes them in parallel.
//!
//! # Example
//!
//! ```no_run
//! use consumer_lag_collector::{Collector, CollectorConfig, ProcessRunner};
//!
//! let config = CollectorConfig::load("collector.yml").unwrap();
//! let runner = ProcessRunner::from_config(&config.tool);
//! let report = Collector::new(config, runner).scrape().unwrap();
//! println!("total lag: {}", report.total_lag());
//! ```

pub mod config;
pub mod error;
pub mod runner;
pub mod scrape;

pub use config::{CollectorConfig, GroupFilter, ToolConfig};
pub use error::{CollectorError, Result};
pub use runner::{ProcessRunner, ToolRunner};
pub use scrape::{Collector, GroupLagReport, ScrapeReport};
