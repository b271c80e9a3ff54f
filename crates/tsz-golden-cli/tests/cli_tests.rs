//! End-to-end runs of the tsz-golden binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn tsz_golden(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tsz-golden"))
        .current_dir(cwd)
        .args(args)
        .env_remove("TSZ_GOLDEN_UPDATE")
        .env_remove("TSZ_GOLDEN_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tsz-golden")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A suite where `cat` is a faithful emitter: each baseline holds its source verbatim.
fn suite(baseline: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixtures = dir.path().join("baselines");
    std::fs::create_dir_all(&fixtures).expect("create baselines");
    std::fs::write(fixtures.join("echo.ts"), "let a = 1;\nconsole.log(a);\n").expect("write source");
    std::fs::write(fixtures.join("echo(target=es5).1.normal.js"), baseline).expect("write baseline");
    dir
}

#[cfg(unix)]
#[test]
fn check_passes_when_output_matches() {
    let dir = suite("//// [echo.ts]\nlet a = 1;\nconsole.log(a);\n");
    let output = tsz_golden(dir.path(), &["check", "-f", "baselines", "--", "cat", "{input}"]);

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
    assert!(stdout(&output).contains("ok: 1 baselines; 1 passed"));
}

#[cfg(unix)]
#[test]
fn check_fails_with_diff_on_mismatch() {
    let dir = suite("let a = 2;\nconsole.log(a);\n");
    let output = tsz_golden(dir.path(), &["check", "-f", "baselines", "--", "cat", "{input}"]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("FAIL"));
    assert!(out.contains("-let a = 2;"));
    assert!(out.contains("+let a = 1;"));
}

#[cfg(unix)]
#[test]
fn update_rewrites_baseline_and_keeps_marker() {
    let dir = suite("//// [echo.ts]\nlet a = 2;\n");
    let output = tsz_golden(
        dir.path(),
        &["check", "-f", "baselines", "--update", "--", "cat", "{input}"],
    );
    assert_eq!(output.status.code(), Some(0));

    let rewritten = std::fs::read_to_string(dir.path().join("baselines/echo(target=es5).1.normal.js"))
        .expect("read baseline");
    assert_eq!(rewritten, "//// [echo.ts]\nlet a = 1;\nconsole.log(a);\n");
}

#[cfg(unix)]
#[test]
fn config_file_supplies_fixtures_and_emitter() {
    let dir = suite("let a = 1;\nconsole.log(a);\n");
    std::fs::write(
        dir.path().join("tsz-golden.json"),
        r#"{ "fixturesDir": "baselines", "determinismRuns": 2, "emitter": { "command": "cat" } }"#,
    )
    .expect("write config");

    let output = tsz_golden(dir.path(), &["check", "--json", "report.json"]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));

    let report: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("report.json")).expect("read report"),
    )
    .expect("report is json");
    assert_eq!(report["summary"]["passed"], 1);
    assert_eq!(report["cases"][0]["status"], "pass");
}

#[test]
fn missing_fixtures_directory_exits_with_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = tsz_golden(dir.path(), &["check", "--", "cat"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no fixtures directory"));
}

#[test]
fn compare_reports_normalized_match() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("x(target=es2022).2.minified.js"), "let a=1;\n").expect("write");
    std::fs::write(dir.path().join("actual.js"), "let a = 1; // emitted\n").expect("write");

    let exact = tsz_golden(dir.path(), &["compare", "x(target=es2022).2.minified.js", "actual.js"]);
    assert_eq!(exact.status.code(), Some(1));

    let normalized = tsz_golden(
        dir.path(),
        &["compare", "x(target=es2022).2.minified.js", "actual.js", "-m", "normalized"],
    );
    assert_eq!(normalized.status.code(), Some(0));
    assert!(stdout(&normalized).contains("identical (normalized comparison)"));
}

#[test]
fn inspect_prints_json_identity() {
    let dir = tempfile::tempdir().expect("temp dir");
    let name = "typeOfThisInStaticMembers8(target=es2022).2.minified.js";
    std::fs::write(dir.path().join(name), "//// [typeOfThisInStaticMembers8.ts]\nclass C {}\n")
        .expect("write");

    let output = tsz_golden(dir.path(), &["inspect", name, "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["name"]["test_name"], "typeOfThisInStaticMembers8");
    assert_eq!(value["name"]["variant"], 2);
    assert_eq!(value["stage"], "minified");
    assert_eq!(value["target"], "es2022");
    assert_eq!(value["file"]["sections"][0]["file_name"], "typeOfThisInStaticMembers8.ts");
}
