use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use consumer_lag_collector::{Collector, CollectorConfig, ProcessRunner, ScrapeReport};
use consumer_lag_core::output::{
    OutputFormat, format_groups, format_parsed, format_serialized, records_to_table,
};
use consumer_lag_core::{DescribeGroupParser, GroupListParser, KNOWN_FORMATS, default_parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "consumer-lag")]
#[command(version)]
#[command(about = "Parse and collect consumer group lag from kafka-consumer-groups output")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse captured describe-group output from a file or stdin.
    Describe(ParseArgs),
    /// Parse captured list-groups output from a file or stdin.
    Groups(ParseArgs),
    /// List the built-in describe-group formats in fallback order.
    Formats,
    /// Run the tool for every consumer group and print a lag report.
    Scrape(ScrapeArgs),
    /// Write a default collector configuration file.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// File containing the captured output (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ScrapeArgs {
    /// YAML collector configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Path or name of kafka-consumer-groups.
    #[arg(long)]
    command: Option<String>,
    /// Broker address passed as --bootstrap-server.
    #[arg(long)]
    bootstrap_server: Option<String>,
    /// Number of groups described concurrently.
    #[arg(long)]
    jobs: Option<usize>,
    /// Tool timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Path of the configuration file to create.
    #[arg(long)]
    output: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Describe(args) => run_describe(args),
        Command::Groups(args) => run_groups(args),
        Command::Formats => run_formats(),
        Command::Scrape(args) => run_scrape(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(input: Option<&Path>) -> Result<String, String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            Ok(text)
        }
    }
}

fn run_describe(args: ParseArgs) -> Result<(), String> {
    let output = read_input(args.input.as_deref())?;
    let parsed = default_parser().parse_detailed(&output).map_err(|err| {
        match err.last_rejection() {
            Some(last) => format!("{err}; last rejection from {}: {}", last.format, last.reason),
            None => err.to_string(),
        }
    })?;
    print!("{}", ensure_newline(format_parsed(&parsed, args.format)?));
    Ok(())
}

fn run_groups(args: ParseArgs) -> Result<(), String> {
    let output = read_input(args.input.as_deref())?;
    let groups = GroupListParser::new()
        .parse(&output)
        .map_err(|err| err.to_string())?;
    print!("{}", ensure_newline(format_groups(&groups, args.format)?));
    Ok(())
}

fn run_formats() -> Result<(), String> {
    for definition in KNOWN_FORMATS {
        println!("{}\t{}", definition.name, definition.header);
    }
    Ok(())
}

fn run_scrape(args: ScrapeArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => CollectorConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => CollectorConfig::default(),
    };
    if let Some(command) = args.command {
        config.tool.command = command;
    }
    if let Some(bootstrap_server) = args.bootstrap_server {
        config.tool.bootstrap_server = bootstrap_server;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.tool.timeout_ms = timeout_ms;
    }
    config.validate().map_err(|err| err.to_string())?;
    debug!(
        command = %config.tool.command,
        bootstrap_server = %config.tool.bootstrap_server,
        jobs = config.jobs,
        "starting scrape"
    );

    let runner = ProcessRunner::from_config(&config.tool);
    let report = Collector::new(config, runner)
        .scrape()
        .map_err(|err| format!("Scrape failed: {err}"))?;

    let rendered = match format_serialized(&report, args.format) {
        Some(result) => result?,
        None => scrape_report_to_table(&report),
    };
    print!("{}", ensure_newline(rendered));
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            args.output.display()
        ));
    }
    CollectorConfig::default()
        .save(&args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;
    eprintln!("Wrote {}", args.output.display());
    Ok(())
}

fn scrape_report_to_table(report: &ScrapeReport) -> String {
    let mut out = format!(
        "Generated: {}  Bootstrap server: {}  Total lag: {}  Failures: {}\n",
        report.generated_at,
        report.bootstrap_server,
        report.total_lag(),
        report.failures
    );
    for group in &report.groups {
        out.push('\n');
        match &group.error {
            Some(error) => out.push_str(&format!("Group: {}  FAILED: {error}\n", group.group)),
            None => {
                out.push_str(&format!(
                    "Group: {}  Format: {}  Total lag: {}\n",
                    group.group,
                    group.format.as_deref().unwrap_or("?"),
                    group.total_lag
                ));
                out.push_str(&records_to_table(&group.partitions));
            }
        }
    }
    if !report.skipped.is_empty() {
        out.push_str(&format!("\nSkipped: {}\n", report.skipped.join(", ")));
    }
    out
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
