use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the workspace root (two levels up from CARGO_MANIFEST_DIR of prisma-mock-cli)
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent() // crates/
        .unwrap()
        .parent() // workspace root
        .unwrap()
        .to_path_buf()
}

fn prisma_mock_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_prisma-mock"));
    cmd.current_dir(workspace_root());
    cmd
}

#[test]
fn cli_help() {
    let output = prisma_mock_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Prisma schema parser"));
}

#[test]
fn cli_version() {
    let output = prisma_mock_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.1.0"));
}

#[test]
fn cli_parse_single_file() {
    let output = prisma_mock_bin()
        .args(["parse", "samples/blog.prisma"])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    let doc: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    assert_eq!(doc["parserVersion"], "0.1.0");

    let models = doc["models"].as_object().expect("models should be an object");
    assert_eq!(models.keys().collect::<Vec<_>>(), vec!["Post", "User"]);

    let user = doc["models"]["User"].as_array().unwrap();
    assert_eq!(user.len(), 5);
    assert_eq!(user[0]["name"], "id");
    assert_eq!(user[0]["default"]["kind"], "uuid");
    assert_eq!(user[2]["type"], "String?");
    assert_eq!(user[2]["nullable"], true);
    assert_eq!(user[4]["default"]["kind"], "now");

    let post = doc["models"]["Post"].as_array().unwrap();
    assert_eq!(post[1]["default"]["kind"], "literal");
    assert_eq!(post[1]["default"]["value"], "Untitled");
    assert_eq!(post[2]["default"]["value"], false);
    assert_eq!(post[4]["type"], "[String]");
}

#[test]
fn cli_parse_directory_uses_config_sources() {
    let output = prisma_mock_bin()
        .args(["parse", "samples/multi/"])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    let doc: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    let models = doc["models"].as_object().unwrap();
    // archive/ is not listed in the config, so its duplicate Account is never read
    assert_eq!(models.keys().collect::<Vec<_>>(), vec!["Account", "Entry"]);
    assert_eq!(doc["models"]["Account"][1]["type"], "BigInt");
}

#[test]
fn cli_parse_yaml_format() {
    let output = prisma_mock_bin()
        .args(["parse", "samples/blog.prisma", "--format", "yaml"])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("parserVersion: 0.1.0"), "stdout: {stdout}");
    assert!(stdout.contains("sourceType: DateTime"), "stdout: {stdout}");
}

#[test]
fn cli_parse_unknown_format() {
    let output = prisma_mock_bin()
        .args(["parse", "samples/blog.prisma", "--format", "toml"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown format: toml"));
}

#[test]
fn cli_parse_invalid_schema() {
    let output = prisma_mock_bin()
        .args(["parse", "samples/invalid.prisma"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("cuid"), "stderr: {stderr}");
}

#[test]
fn cli_parse_nonexistent() {
    let output = prisma_mock_bin()
        .args(["parse", "nonexistent/path"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn cli_parse_output_file() {
    let tmp = std::env::temp_dir().join("prisma-mock-cli-test-output.json");
    let output = prisma_mock_bin()
        .args(["parse", "samples/blog.prisma", "-o", tmp.to_str().unwrap()])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Written to"), "stdout: {stdout}");
    assert!(!stdout.contains("parserVersion"), "stdout: {stdout}");

    let content = std::fs::read_to_string(&tmp).expect("output file should exist");
    let doc: serde_json::Value = serde_json::from_str(&content).expect("invalid JSON in file");
    assert_eq!(doc["parserVersion"], "0.1.0");

    std::fs::remove_file(&tmp).ok();
}

// ── Check tests ──────────────────────────────────────────────

#[test]
fn cli_check_clean() {
    let output = prisma_mock_bin()
        .args(["check", "samples/blog.prisma"])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("model User (5 fields)"), "stdout: {stdout}");
    assert!(stdout.contains("0 errors, 2 models in 1 file."), "stdout: {stdout}");
}

#[test]
fn cli_check_json_format() {
    let output = prisma_mock_bin()
        .args(["check", "samples/multi", "--format", "json"])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    let result: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    assert_eq!(result["summary"]["errors"], 0);
    assert_eq!(result["summary"]["files"], 2);
    assert_eq!(result["summary"]["models"], 2);
    assert_eq!(result["summary"]["fields"], 6);
    assert_eq!(result["files"][1]["models"]["Entry"], 4);
}

#[test]
fn cli_check_reports_errors() {
    let output = prisma_mock_bin()
        .args(["check", "samples/invalid.prisma"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("error: default generator `cuid()`"), "stdout: {stdout}");
    assert!(stdout.contains("1 error, 0 models in 1 file."), "stdout: {stdout}");
}

#[test]
fn cli_check_duplicate_models_across_files() {
    // Without a config at samples/, every .prisma file is read and
    // multi/archive redeclares Account.
    let output = prisma_mock_bin()
        .args(["check", "samples/", "--format", "json"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    let result: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    let errors: Vec<&str> = result["files"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["error"].as_str())
        .collect();
    assert!(
        errors.iter().any(|e| e.contains("declared more than once")),
        "errors: {errors:?}"
    );
}
