use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_consumer-lag");

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../core/tests/fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run consumer-lag")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn consumer-lag");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().expect("failed to wait for consumer-lag")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// describe
// ---------------------------------------------------------------------------

#[test]
fn describe_file_prints_json() {
    let path = fixture("describe-0.10.2.1.txt");
    let out = run(&["describe", "--input", path.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["format"], "kafka-0.10.2.1");
    let records = value["records"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["topic"], "orders");
    assert_eq!(records[0]["lag"], 5);
    assert_eq!(records[2]["lag"], -1);
    assert_eq!(value["degraded_values"].as_array().unwrap().len(), 2);
}

#[test]
fn describe_reads_stdin_as_table() {
    let input = "\
TOPIC PARTITION CURRENT-OFFSET LOG-END-OFFSET LAG CONSUMER-ID HOST CLIENT-ID
orders 0 105 110 5 consumer-1-abc /10.0.0.5 app-client-1
";
    let out = run_with_stdin(&["describe", "--format", "table"], input);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.starts_with("Format: kafka-0.10.2.1  Partitions: 1  Total lag: 5"));
    assert!(text.contains("TOPIC"));
    assert!(text.contains("app-client-1"));
}

#[test]
fn describe_unrecognized_output_fails() {
    let path = fixture("describe-unknown-group.txt");
    let out = run(&["describe", "--input", path.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let err = stderr(&out);
    assert!(
        err.contains("error: no parser could parse the output (4 formats tried)"),
        "stderr: {err}"
    );
    assert!(err.contains("last rejection from kafka-2.0.0"), "stderr: {err}");
}

#[test]
fn describe_empty_stdin_fails() {
    let out = run_with_stdin(&["describe"], "");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("error: "));
}

#[test]
fn describe_missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let out = run(&["describe", "--input", path.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Failed to read"));
}

// ---------------------------------------------------------------------------
// groups
// ---------------------------------------------------------------------------

#[test]
fn groups_prints_yaml_list() {
    let path = fixture("list-groups.txt");
    let out = run(&["groups", "--input", path.to_str().unwrap(), "--format", "yaml"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let groups: Vec<String> = serde_yaml::from_str(&stdout(&out)).unwrap();
    assert_eq!(groups, vec!["billing", "analytics", "console-consumer-48213"]);
}

#[test]
fn groups_runtime_error_fails() {
    let path = fixture("list-groups-runtime-error.txt");
    let out = run(&["groups", "--input", path.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("java.lang.RuntimeException"));
}

// ---------------------------------------------------------------------------
// formats / init-config
// ---------------------------------------------------------------------------

#[test]
fn formats_lists_oldest_first() {
    let out = run(&["formats"]);
    assert!(out.status.success());

    let names: Vec<String> = stdout(&out)
        .lines()
        .map(|line| line.split('\t').next().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["kafka-0.9.0.1", "kafka-0.10.0.1", "kafka-0.10.2.1", "kafka-2.0.0"]
    );
}

#[test]
fn init_config_writes_default_and_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collector.yml");
    let path_arg = path.to_str().unwrap();

    let out = run(&["init-config", "--output", path_arg]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let yaml: serde_yaml::Value = serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(yaml["tool"]["command"].as_str(), Some("kafka-consumer-groups.sh"));
    assert_eq!(yaml["jobs"].as_u64(), Some(4));

    let again = run(&["init-config", "--output", path_arg]);
    assert_eq!(again.status.code(), Some(1));
    assert!(stderr(&again).contains("already exists"));

    let forced = run(&["init-config", "--output", path_arg, "--force"]);
    assert!(forced.status.success());
}

// ---------------------------------------------------------------------------
// scrape
// ---------------------------------------------------------------------------

#[test]
fn scrape_rejects_zero_jobs() {
    let out = run(&["scrape", "--jobs", "0"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("jobs must be greater than 0"));
}

#[test]
fn scrape_missing_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("kafka-consumer-groups.sh");
    let out = run(&["scrape", "--command", missing.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Scrape failed"));
}

#[cfg(unix)]
#[test]
fn scrape_runs_tool_and_prints_report() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("kafka-consumer-groups.sh");
    let describe = fixture("describe-0.10.2.1.txt");
    let body = format!(
        "#!/bin/sh\n\
         case \"$*\" in\n\
         *--list*) printf 'billing\\nconsole-consumer-1\\n' ;;\n\
         *) cat '{}' ;;\n\
         esac\n",
        describe.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let config = dir.path().join("collector.yml");
    std::fs::write(
        &config,
        "tool:\n  bootstrap_server: kafka-1:9092\ngroups:\n  exclude:\n    - console-consumer-1\n",
    )
    .unwrap();

    let out = run(&[
        "scrape",
        "--config",
        config.to_str().unwrap(),
        "--command",
        script.to_str().unwrap(),
        "--jobs",
        "1",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["bootstrap_server"], "kafka-1:9092");
    assert_eq!(report["failures"], 0);
    assert_eq!(report["skipped"][0], "console-consumer-1");
    let groups = report["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["group"], "billing");
    assert_eq!(groups[0]["total_lag"], 5);
    assert_eq!(groups[0]["format"], "kafka-0.10.2.1");
}
