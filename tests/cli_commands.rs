//! Integration tests for the repoglance binary
//!
//! These tests execute the compiled binary with `assert_cmd` against
//! repositories laid out in temp dirs. No API keys are needed: analysis
//! runs offline unless a test asks for a misconfigured provider.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn sample_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "README.md", "# Sample\n\nDemo project.\n");
    write(
        root,
        "Cargo.toml",
        "[package]\nname = \"sample\"\n\n[dependencies]\ntokio = \"1\"\n",
    );
    write(root, "src/main.rs", "fn main() {}\n");
    write(root, "src/lib.rs", "pub fn answer() -> u32 { 42 }\n");
    write(root, "tests/it.rs", "#[test]\nfn it() {}\n");
    dir
}

/// Command running in its own temp dir so no stray config file is discovered.
fn repoglance(work_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repoglance"));
    cmd.current_dir(work_dir);
    cmd.env_remove("ANTHROPIC_API_KEY");
    cmd
}

#[test]
fn version_output() {
    let work = TempDir::new().unwrap();
    repoglance(work.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repoglance"));
}

#[test]
fn select_lists_key_files() {
    let repo = sample_repo();
    repoglance(repo.path())
        .args(["select", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected 5 key files"))
        .stdout(predicate::str::contains("README.md"))
        .stdout(predicate::str::contains("src/main.rs"));
}

#[test]
fn select_json_is_canonical() {
    let repo = sample_repo();
    let output = repoglance(repo.path())
        .args(["select", ".", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let key_files = json["key_files"].as_array().unwrap();
    assert_eq!(key_files[0]["path"], "README.md");
    assert_eq!(key_files[0]["tier"], "documentation");
    assert_eq!(json["halted"], false);
}

#[test]
fn chunk_reports_over_budget_chunks() {
    let repo = sample_repo();
    write(repo.path(), "src/big.rs", &"// filler\n".repeat(200));

    repoglance(repo.path())
        .args(["chunk", ".", "--chunk-tokens", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ceiling 400 B"))
        .stdout(predicate::str::contains("(over budget)"));
}

#[test]
fn analyze_offline_json() {
    let repo = sample_repo();
    let output = repoglance(repo.path())
        .args(["analyze", ".", "--offline", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["frameworks"][0], "Tokio");
    assert_eq!(json["quality"]["has_readme"], true);
    assert!(json.get("provider").is_none());
    assert!(json["analyses"].as_array().unwrap().is_empty());
}

#[test]
fn analyze_uses_cli_budget_overrides() {
    let repo = sample_repo();
    repoglance(repo.path())
        .args(["analyze", ".", "--max-total-bytes", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# "))
        .stdout(predicate::str::contains("Selection stopped"));
}

#[test]
fn missing_repository_exits_with_source_error() {
    let work = TempDir::new().unwrap();
    repoglance(work.path())
        .args(["select", "does-not-exist"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn invalid_budget_exits_with_config_error() {
    let repo = sample_repo();
    repoglance(repo.path())
        .args(["select", ".", "--max-total-bytes", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_total_bytes"));
}

#[test]
fn explicit_missing_config_file_exits_with_config_error() {
    let repo = sample_repo();
    repoglance(repo.path())
        .args(["--config", "nope.toml", "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn anthropic_without_api_key_is_a_misconfiguration() {
    let repo = sample_repo();
    repoglance(repo.path())
        .args(["analyze", ".", "--llm-provider", "anthropic", "--model", "m"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("LLM configuration error"))
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn config_command_shows_sources() {
    let repo = sample_repo();
    write(
        repo.path(),
        ".repoglance/config.toml",
        "[chunking]\nmax_tokens = 2000\n",
    );

    repoglance(repo.path())
        .args(["config", "--max-file-bytes", "2048"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"chunking\.max_tokens\s+2000\s+\[config\]").unwrap())
        .stdout(
            predicate::str::is_match(r"selection\.max_file_bytes\s+2048\s+\[cli\]").unwrap(),
        )
        .stdout(predicate::str::is_match(r"llm\.provider\s+none\s+\[default\]").unwrap());
}
