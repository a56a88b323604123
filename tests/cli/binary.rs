//! End-to-end runs of the compiled executable

use std::process::Command;

fn prioflow() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_prioflow"));
    // Keep the user's configuration file out of the tests
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"))
        .env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd
}

#[test]
fn test_invalid_arguments_exit_with_failure() {
    let output = prioflow()
        .args(["0", "1", "1", "1", "-g", "false"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let expected = "Number of producers must be between 1 and 10 (got 0)";
    assert!(stderr.contains(expected));
}

#[test]
fn test_missing_arguments_print_usage() {
    let output = prioflow().output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_short_run_prints_json_summary() {
    let output = prioflow()
        .args([
            "2",
            "2",
            "4",
            "1",
            "--producer-wait",
            "0",
            "--consumer-wait",
            "0",
            "--summary-format",
            "json",
            "-l",
            "off",
            "-g",
            "false",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["stopped_by"], "deadline");

    let metrics = &summary["metrics"];
    let produced = metrics["produced"].as_u64().unwrap();
    let consumed = metrics["consumed"].as_u64().unwrap();
    assert!(produced > 0);
    assert_eq!(metrics["in_flight"].as_u64().unwrap(), produced - consumed);
    assert!(produced - consumed <= 4);
}
