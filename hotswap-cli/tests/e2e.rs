//! End-to-end integration tests for hotswap-cli
//!
//! These shell out to `cargo run` and are gated behind the `integration`
//! feature flag. Run with:
//!
//! ```sh
//! cargo test -p hotswap-cli --features integration
//! ```

#![cfg(feature = "integration")]

use std::process::Command;
use tempfile::TempDir;

fn hotswap(args: &[&str], config: &std::path::Path) -> std::process::Output {
    let config = config.to_string_lossy().into_owned();
    let mut full = vec!["run", "-q", "-p", "hotswap-cli", "--", "--config", config.as_str()];
    full.extend_from_slice(args);
    Command::new("cargo")
        .args(&full)
        .env("HOTSWAP_PROJECT_CONFIG_DIR", "/nonexistent-hotswap-project")
        .output()
        .expect("Failed to run hotswap")
}

/// Test that hotswap --help lists the commands
#[test]
fn hotswap_help_works() {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "hotswap-cli", "--", "--help"])
        .output()
        .expect("Failed to run hotswap --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reload view modules into a live display"));
    assert!(stdout.contains("reload"));
    assert!(stdout.contains("inspect"));
    assert!(stdout.contains("config"));
}

/// Test that config init writes a default file that config show can read
#[test]
fn config_init_then_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hotswap.toml");

    let output = hotswap(&["config", "init"], &path);
    assert!(output.status.success());
    assert!(path.exists());

    let output = hotswap(&["config", "show"], &path);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("match_policy = \"exact\""));
}

/// Test that a missing module fails the reload with the module path
#[test]
fn reload_missing_module_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hotswap.toml");
    std::fs::write(
        &path,
        format!(
            r#"
[application]
name = "hotswap-e2e"
module_dir = "{}"

[[targets]]
module = "missing.so"
namespace = "Demo.Views"
type_name = "HelloView"
"#,
            dir.path().display()
        ),
    )
    .unwrap();

    let output = hotswap(&["reload"], &path);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hot reload error"));
    assert!(stdout.contains("missing.so"));
    assert!(stdout.contains("(display is empty)"));
}

/// Test that the "no targets" hint names the file passed with --config
#[test]
fn reload_without_targets_points_at_explicit_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[application]\nname = \"hotswap-e2e\"\n").unwrap();

    let output = hotswap(&["reload"], &path);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No reload targets configured"));
    assert!(stdout.contains(&format!("Add one to {}:", path.display())));
}
