//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_ecoshake"))
        .args(args)
        .env("ECOSHAKE_HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

/// Split pretty-printed JSON documents printed back to back.
fn json_documents(stdout: &str) -> Vec<serde_json::Value> {
    serde_json::Deserializer::from_str(stdout)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .expect("stdout is not a JSON stream")
}

fn types(docs: &[serde_json::Value]) -> Vec<&str> {
    docs.iter().filter_map(|d| d["type"].as_str()).collect()
}

#[test]
fn test_status_starts_idle() {
    let home = tempfile::tempdir().unwrap();
    let docs = json_documents(&run_cli_success(home.path(), &["challenge", "status"]));
    assert_eq!(docs[0]["type"], "StateSnapshot");
    assert_eq!(docs[0]["state"], "idle");
    assert_eq!(docs[0]["total"], 0);
}

#[test]
fn test_trigger_tick_complete() {
    let home = tempfile::tempdir().unwrap();
    let docs = json_documents(&run_cli_success(home.path(), &["challenge", "trigger"]));
    assert_eq!(types(&docs), vec!["ChallengeTriggered"]);
    assert_eq!(docs[0]["source"], "manual");

    let docs = json_documents(&run_cli_success(
        home.path(),
        &["challenge", "tick", "--count", "3"],
    ));
    assert_eq!(docs.last().unwrap()["remaining_secs"], 57);

    let docs = json_documents(&run_cli_success(home.path(), &["challenge", "complete"]));
    assert_eq!(types(&docs), vec!["ChallengeCompleted"]);
    assert_eq!(docs[0]["entry"]["completed"], true);

    let docs = json_documents(&run_cli_success(home.path(), &["history", "summary"]));
    assert_eq!(docs[0]["completed"], 1);
    assert_eq!(docs[0]["total"], 1);
}

#[test]
fn test_second_trigger_is_ignored() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["challenge", "trigger"]);
    let (stdout, stderr, code) = run_cli(home.path(), &["challenge", "trigger"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("already in progress"));
    assert_eq!(types(&json_documents(&stdout)), vec!["StateSnapshot"]);
}

#[test]
fn test_cancel_leaves_no_history() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["challenge", "trigger"]);
    run_cli_success(home.path(), &["challenge", "cancel"]);
    let stdout = run_cli_success(home.path(), &["history", "list", "--json"]);
    assert_eq!(json_documents(&stdout)[0], serde_json::json!([]));
    let stdout = run_cli_success(home.path(), &["history", "list"]);
    assert!(stdout.contains("No challenges yet"));
}

#[test]
fn test_motion_sample_triggers_and_cooldown_holds() {
    let home = tempfile::tempdir().unwrap();
    let shake = |at: &str| {
        run_cli_success(
            home.path(),
            &["motion", "sample", "--x", "25", "--y", "0", "--z", "0", "--at-ms", at],
        )
    };

    let docs = json_documents(&shake("0"));
    assert_eq!(types(&docs), vec!["ShakeDetected", "ChallengeTriggered"]);
    run_cli_success(home.path(), &["challenge", "skip"]);

    assert!(json_documents(&shake("500")).is_empty());
    assert!(json_documents(&shake("1000")).is_empty());
    assert_eq!(types(&json_documents(&shake("1001")))[0], "ShakeDetected");
}

#[test]
fn test_motion_sample_with_denied_permission() {
    let home = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(
        home.path(),
        &["motion", "sample", "--x", "40", "--permission", "denied"],
    );
    let docs = json_documents(&stdout);
    assert!(types(&docs).contains(&"SensorRefused"));
    assert!(!types(&docs).contains(&"ChallengeTriggered"));
}

#[test]
fn test_motion_replay() {
    let home = tempfile::tempdir().unwrap();
    let recording = home.path().join("walk.txt");
    std::fs::write(
        &recording,
        "# t x y z\n0 25 0 0\n500 25 0 0\n1001 25 0 0\n1500 1 - 9.8\n",
    )
    .unwrap();
    let stdout = run_cli_success(home.path(), &["motion", "replay", recording.to_str().unwrap()]);
    let shakes = json_documents(&stdout)[0].clone();
    let at: Vec<u64> = shakes
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["at_ms"].as_u64().unwrap())
        .collect();
    assert_eq!(at, vec![0, 1001]);
}

#[test]
fn test_tree_reports_seed_stage() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(home.path(), &["tree"]);
    assert_eq!(code, 0);
    let docs = json_documents(&stdout);
    assert_eq!(docs[0]["stage"]["name"], "Seed");
    assert_eq!(docs[0]["remaining_to_next"], 3);
    assert!(stderr.contains("3 more to Seedling"));
}

#[test]
fn test_run_without_feedback() {
    let home = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_ecoshake"))
        .args(["run", "--seed", "7", "--no-feedback"])
        .env("ECOSHAKE_HOME", home.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"shake\ncomplete\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let kinds: Vec<String> = json_documents(&String::from_utf8_lossy(&output.stdout))
        .iter()
        .filter_map(|d| d["type"].as_str().map(str::to_string))
        .collect();
    assert!(kinds.iter().any(|k| k == "ChallengeCompleted"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("bzz"));
    assert!(!stderr.contains("watering the tree"));
}

#[test]
fn test_catalog_list_and_show() {
    let home = tempfile::tempdir().unwrap();
    let docs = json_documents(&run_cli_success(home.path(), &["catalog", "list"]));
    assert_eq!(docs[0].as_array().unwrap().len(), 10);

    let docs = json_documents(&run_cli_success(home.path(), &["catalog", "show", "1"]));
    assert_eq!(docs[0]["duration"], 60);

    let (_, stderr, code) = run_cli(home.path(), &["catalog", "show", "99"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(
        run_cli_success(home.path(), &["config", "get", "motion.threshold"]).trim(),
        "25.0"
    );
    assert_eq!(
        run_cli_success(home.path(), &["config", "set", "motion.threshold", "18"]).trim(),
        "motion.threshold = 18.0"
    );
    assert_eq!(
        run_cli_success(home.path(), &["config", "get", "motion.threshold"]).trim(),
        "18.0"
    );

    let (_, _, code) = run_cli(home.path(), &["config", "get", "motion.nope"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(home.path(), &["config", "set", "feedback.sound", "loud"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(home.path(), &["config", "set", "motion.threshold", "-1"]);
    assert_eq!(code, 1);

    run_cli_success(home.path(), &["config", "reset"]);
    assert_eq!(
        run_cli_success(home.path(), &["config", "get", "motion.threshold"]).trim(),
        "25.0"
    );
}

#[test]
fn test_run_session_from_stdin() {
    let home = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_ecoshake"))
        .args(["run", "--seed", "42"])
        .env("ECOSHAKE_HOME", home.path())
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"shake\nshake\ncomplete\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let docs = json_documents(&stdout);
    let kinds = types(&docs);
    assert_eq!(kinds.iter().filter(|k| **k == "ChallengeTriggered").count(), 1);
    assert!(kinds.contains(&"ChallengeCompleted"));

    let docs = json_documents(&run_cli_success(home.path(), &["history", "summary"]));
    assert_eq!(docs[0]["completed"], 1);
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(home.path(), &["completions", "bash"]);
    assert!(stdout.contains("ecoshake"));
}
