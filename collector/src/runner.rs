//! Invocation of the consumer groups tool.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

use crate::config::ToolConfig;
use crate::error::{CollectorError, Result};

/// Runs the tool with the given arguments and returns its stdout.
///
/// Implemented by [`ProcessRunner`]; tests substitute canned output.
pub trait ToolRunner: Send + Sync {
    fn run(&self, args: &[String]) -> Result<String>;
}

/// Spawns the tool as a child process with a timeout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    command: String,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn from_config(tool: &ToolConfig) -> Self {
        Self::new(tool.command.clone(), Duration::from_millis(tool.timeout_ms))
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, args: &[String]) -> Result<String> {
        let mut child = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CollectorError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        // Drain both pipes concurrently so a full pipe buffer cannot block
        // the child before it exits.
        let stdout_thread = drain(child.stdout.take());
        let stderr_thread = drain(child.stderr.take());

        let Some(status) = child.wait_timeout(self.timeout)? else {
            debug!(command = %self.command, ?args, "tool timed out, killing process");
            let _ = child.kill();
            let _ = child.wait();
            return Err(CollectorError::Timeout {
                command: self.command.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            });
        };

        let stdout = collect(stdout_thread);
        let stderr = collect(stderr_thread);

        if !status.success() {
            debug!(
                command = %self.command,
                ?args,
                %status,
                stderr = %stderr.trim(),
                "tool exited unsuccessfully"
            );
            // The runtime-fault sentinel is printed to stdout; let the
            // parsers see it.
            if stdout.trim().is_empty() {
                return Err(CollectorError::ToolFailed {
                    command: self.command.clone(),
                    status: status.to_string(),
                    stderr: stderr.trim().to_string(),
                });
            }
        }

        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                debug!(error = %e, "failed to read tool output");
            }
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    let buf = handle
        .and_then(|thread| thread.join().ok())
        .unwrap_or_default();
    String::from_utf8_lossy(&buf).into_owned()
}

/// Arguments for `--list`.
pub fn list_groups_args(tool: &ToolConfig) -> Vec<String> {
    let mut args = base_args(tool);
    args.push("--list".to_string());
    args
}

/// Arguments for `--describe --group <group>`.
pub fn describe_group_args(tool: &ToolConfig, group: &str) -> Vec<String> {
    let mut args = base_args(tool);
    args.extend(["--describe", "--group", group].map(String::from));
    args
}

fn base_args(tool: &ToolConfig) -> Vec<String> {
    let mut args = vec![
        "--bootstrap-server".to_string(),
        tool.bootstrap_server.clone(),
    ];
    args.extend(tool.extra_args.iter().cloned());
    args
}
