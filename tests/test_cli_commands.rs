mod common;

use common::ParlorProcess;

// ============================================================================
// version / help
// ============================================================================

#[test]
fn version_human() {
    let output = ParlorProcess::spawn_command(&["version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("parlor "), "unexpected version output: {stdout}");
    assert!(stdout.contains('.'));
}

#[test]
fn version_json() {
    let output = ParlorProcess::spawn_command(&["version", "--format", "json"]);
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("version JSON should be valid");
    assert_eq!(parsed["name"], "parlor");
    assert!(parsed["version"].is_string());
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = ParlorProcess::spawn_command(&["roulette"]);
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// completions
// ============================================================================

#[test]
fn completions_bash() {
    let output = ParlorProcess::spawn_command(&["completions", "bash"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("parlor"));
    assert!(stdout.contains("hat-trick"));
}

#[test]
fn completions_zsh_and_fish() {
    for shell in ["zsh", "fish"] {
        let output = ParlorProcess::spawn_command(&["completions", shell]);
        assert!(output.status.success(), "completions {shell} failed");
        assert!(!output.stdout.is_empty());
    }
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_valid_config() {
    let config = ParlorProcess::fixture_path("valid.yaml");
    let output = ParlorProcess::spawn_command(&["validate", config.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "validate should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains(": ok"));
}

#[test]
fn validate_invalid_config() {
    let config = ParlorProcess::fixture_path("invalid_slots.yaml");
    let output = ParlorProcess::spawn_command(&["validate", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("invalid"));
    assert!(stdout.contains("hat_trick.slots"));
}

#[test]
fn validate_unknown_field() {
    let config = ParlorProcess::fixture_path("unknown_field.yaml");
    let output = ParlorProcess::spawn_command(&["validate", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn validate_missing_file() {
    let output = ParlorProcess::spawn_command(&["validate", "/tmp/nonexistent_parlor_config.yaml"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));
}

#[test]
fn validate_json_output() {
    let good = ParlorProcess::fixture_path("valid.yaml");
    let bad = ParlorProcess::fixture_path("invalid_slots.yaml");
    let output = ParlorProcess::spawn_command(&[
        "validate",
        "--format",
        "json",
        good.to_str().unwrap(),
        bad.to_str().unwrap(),
    ]);
    assert!(!output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    let reports = parsed.as_array().expect("one report per file");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[1]["valid"], false);
    assert!(!reports[1]["errors"].as_array().unwrap().is_empty());
}

#[test]
fn validate_strict_rejects_warnings() {
    let config = ParlorProcess::fixture_path("warnings.yaml");
    let path = config.to_str().unwrap();

    let lenient = ParlorProcess::spawn_command(&["validate", path]);
    assert!(lenient.status.success());

    let strict = ParlorProcess::spawn_command(&["validate", "--strict", path]);
    assert_eq!(strict.status.code(), Some(2));
}
