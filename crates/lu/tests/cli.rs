//! CLI smoke tests.

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

fn lu() -> Command {
    Command::cargo_bin("lu").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn compile_prints_lua() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.lu", "local x = 1\nx += 2");
    let output = lu().arg("compile").arg(dir.path().join("a.lu")).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "local x = 1\nx = (x + 2)\n");
}

#[test]
fn verbose_flag_enables_info_logs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.lu", "return 1");
    let quiet = lu()
        .env_remove("RUST_LOG")
        .arg("compile")
        .arg(dir.path().join("a.lu"))
        .output()
        .unwrap();
    assert!(!stderr(&quiet).contains("compiled script"), "{}", stderr(&quiet));

    let verbose = lu()
        .env_remove("RUST_LOG")
        .args(["-v", "compile"])
        .arg(dir.path().join("a.lu"))
        .output()
        .unwrap();
    assert!(verbose.status.success(), "{}", stderr(&verbose));
    assert!(stderr(&verbose).contains("compiled script"), "{}", stderr(&verbose));
    assert_eq!(stdout(&verbose), "return 1\n");
}

#[test]
fn compile_minified() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.lu", "local x = 1\nx += 2");
    let output = lu()
        .args(["compile", "--minify"])
        .arg(dir.path().join("a.lu"))
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "local x=1 x=(x+2)\n");
}

#[test]
fn compile_emits_ast_json() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.lu", "return 1");
    let output = lu()
        .args(["compile", "--emit", "ast"])
        .arg(dir.path().join("a.lu"))
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["body"].is_array());
    assert!(json["arena"].is_object());
}

#[test]
fn compile_bundle_to_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.lu", "print(require(\"dep\"))");
    write(dir.path(), "dep.lu", "return 1");
    let output = lu()
        .current_dir(dir.path())
        .args(["compile", "main.lu", "-o", "out.lua", "--bundle"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Complete!\n");
    let bundle = std::fs::read_to_string(dir.path().join("out.lua")).unwrap();
    assert!(bundle.contains("__LU_IMPORT_TABLE"));
}

#[test]
fn bundle_requires_output() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.lu", "return 1");
    let output = lu()
        .args(["compile", "--bundle"])
        .arg(dir.path().join("a.lu"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn compile_error_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bad.lu", "local x = 1\nlocal y = \"\\xZZ\"");
    let output = lu().arg("compile").arg(dir.path().join("bad.lu")).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("script:2"), "{}", stderr(&output));
}

#[test]
fn init_then_build() {
    let dir = TempDir::new().unwrap();
    let output = lu().current_dir(dir.path()).args(["init", "demo"]).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let config = std::fs::read_to_string(dir.path().join("luconfig.json")).unwrap();
    assert!(config.contains("\"demo\""));

    let output = lu().arg("build").arg(dir.path()).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Complete!\n");
    let out = std::fs::read_to_string(dir.path().join("out.lua")).unwrap();
    assert_eq!(out, "print(\"Hello world!\")\n");

    let again = lu().current_dir(dir.path()).args(["init", "demo"]).output().unwrap();
    assert_eq!(again.status.code(), Some(1));
    assert!(stderr(&again).contains("already exists"));
}

#[test]
fn build_reports_notices() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "luconfig.json",
        r#"{ "name": "n", "entrypoint": "init.lu", "outDir": "out" }"#,
    );
    write(dir.path(), "init.lu", "local m = require(\"missing\")");
    let output = lu().arg("build").arg(dir.path()).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Complete, with 1 notice:\n");
    assert!(stderr(&output).contains("Unresolved module \"missing\""));
}
