//! Tests for suite execution

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use crate::compare::CompareMode;
use crate::emitter::{EmitError, EmitRequest, FnEmitter};
use crate::report::CaseStatus;
use crate::runner::{SuiteOptions, compare_file, run_suite};
use tsz_fixture::{ScriptTarget, Stage};

const SOURCE: &str = "// @target: es2022\nclass C {\n    static f = 1;\n    static g = () => this.f + 1;\n}\n";
const BASELINE: &str = "//// [staticArrow.ts]\nclass C {\n    static f = 1;\n    static g = ()=>this.f + 1;\n}\n";
const BASELINE_NAME: &str = "staticArrow(target=es2022).2.minified.js";

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

fn suite() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "staticArrow.ts", SOURCE);
    write(dir.path(), BASELINE_NAME, BASELINE);
    dir
}

fn expected_code() -> String {
    BASELINE.trim_start_matches("//// [staticArrow.ts]\n").to_string()
}

#[test]
fn test_matching_output_passes() {
    let dir = suite();
    let seen = std::sync::Mutex::new(Vec::new());
    let emitter = FnEmitter::new("fake", |request: &EmitRequest| {
        seen.lock().unwrap().push(request.clone());
        Ok(expected_code())
    });

    let report = run_suite(&SuiteOptions::new(dir.path()), &emitter).unwrap();
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.passed, 1);
    assert!(!report.summary.has_failures());
    assert_eq!(report.emitter, "fake");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].file_name, "staticArrow.ts");
    assert_eq!(seen[0].target, Some(ScriptTarget::ES2022));
    assert_eq!(seen[0].stage, Stage::Minified);
    assert_eq!(seen[0].source_text, SOURCE);
    assert!(seen[0].options.is_empty());
}

#[test]
fn test_mismatch_reports_diff() {
    let dir = suite();
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| {
        Ok(expected_code().replace("this.f", "C.f"))
    });

    let report = run_suite(&SuiteOptions::new(dir.path()), &emitter).unwrap();
    assert_eq!(report.summary.mismatched, 1);
    assert!(report.summary.has_failures());
    let case = &report.cases[0];
    assert_eq!(case.status, CaseStatus::Mismatch);
    assert_eq!(case.id, "staticArrow(target=es2022).2.minified");
    assert!(case.detail.as_deref().unwrap().contains("line 3"));
    assert!(case.diff.as_deref().unwrap().contains("+    static g = ()=>C.f + 1;"));

    // Baselines are never touched outside update mode.
    let on_disk = std::fs::read_to_string(dir.path().join(BASELINE_NAME)).unwrap();
    assert_eq!(on_disk, BASELINE);
}

#[test]
fn test_update_mode_rewrites_baseline() {
    let dir = suite();
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| {
        Ok("class C {\n    static f = 2;\n}\n".to_string())
    });

    let mut options = SuiteOptions::new(dir.path());
    options.update = true;
    let report = run_suite(&options, &emitter).unwrap();
    assert_eq!(report.summary.updated, 1);
    assert!(!report.summary.has_failures());

    let on_disk = std::fs::read_to_string(dir.path().join(BASELINE_NAME)).unwrap();
    assert_eq!(on_disk, "//// [staticArrow.ts]\nclass C {\n    static f = 2;\n}\n");

    let rerun = run_suite(&SuiteOptions::new(dir.path()), &emitter).unwrap();
    assert_eq!(rerun.summary.passed, 1);
}

#[test]
fn test_missing_source() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), BASELINE_NAME, BASELINE);
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| Ok(String::new()));

    let report = run_suite(&SuiteOptions::new(dir.path()), &emitter).unwrap();
    assert_eq!(report.cases[0].status, CaseStatus::MissingSource);
    assert_eq!(report.summary.missing_source, 1);
}

#[test]
fn test_sources_dir_is_used_when_given() {
    let fixtures = TempDir::new().unwrap();
    let sources = TempDir::new().unwrap();
    write(fixtures.path(), BASELINE_NAME, BASELINE);
    write(sources.path(), "conformance/classes/staticArrow.ts", SOURCE);
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| Ok(expected_code()));

    let mut options = SuiteOptions::new(fixtures.path());
    options.sources_dir = Some(sources.path().to_path_buf());
    let report = run_suite(&options, &emitter).unwrap();
    assert_eq!(report.summary.passed, 1);
}

#[test]
fn test_emit_failure() {
    let dir = suite();
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| {
        Err(EmitError::Message("compiler crashed".to_string()))
    });

    let report = run_suite(&SuiteOptions::new(dir.path()), &emitter).unwrap();
    let case = &report.cases[0];
    assert_eq!(case.status, CaseStatus::EmitFailed);
    assert_eq!(case.detail.as_deref(), Some("compiler crashed"));
}

#[test]
fn test_nondeterministic_output() {
    let dir = suite();
    let calls = AtomicUsize::new(0);
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}// run {n}\n", expected_code()))
    });

    let mut options = SuiteOptions::new(dir.path());
    options.determinism_runs = 3;
    let report = run_suite(&options, &emitter).unwrap();
    let case = &report.cases[0];
    assert_eq!(case.status, CaseStatus::Nondeterministic);
    assert!(case.detail.as_deref().unwrap().contains("run 2"));
    assert!(case.diff.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_deterministic_output_runs_every_time() {
    let dir = suite();
    let calls = AtomicUsize::new(0);
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(expected_code())
    });

    let mut options = SuiteOptions::new(dir.path());
    options.determinism_runs = 3;
    let report = run_suite(&options, &emitter).unwrap();
    assert_eq!(report.summary.passed, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_invalid_target_in_name() {
    let dir = suite();
    write(dir.path(), "staticArrow(target=es1999).2.minified.js", BASELINE);
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| Ok(expected_code()));

    let report = run_suite(&SuiteOptions::new(dir.path()), &emitter).unwrap();
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.invalid, 1);
    let invalid = report
        .cases
        .iter()
        .find(|c| c.status == CaseStatus::InvalidFixture)
        .unwrap();
    assert!(invalid.detail.as_deref().unwrap().contains("es1999"));
}

#[test]
fn test_parallel_results_are_sorted() {
    let dir = TempDir::new().unwrap();
    for name in ["d", "b", "a", "c"] {
        write(dir.path(), &format!("{name}.ts"), "let x = 1;\n");
        write(dir.path(), &format!("{name}.js"), &format!("//// [{name}.ts]\nlet x = 1;\n"));
    }
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| Ok("let x = 1;\n".to_string()));

    let mut options = SuiteOptions::new(dir.path());
    options.jobs = 4;
    let report = run_suite(&options, &emitter).unwrap();
    let ids: Vec<&str> = report.cases.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert_eq!(report.summary.passed, 4);
}

#[test]
fn test_normalized_mode_in_suite() {
    let dir = suite();
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| {
        Ok("class C{static f=1;static g=()=>this.f+1;}".to_string())
    });

    let mut options = SuiteOptions::new(dir.path());
    options.mode = CompareMode::Normalized;
    let report = run_suite(&options, &emitter).unwrap();
    assert_eq!(report.summary.passed, 1);
    assert_eq!(report.mode, CompareMode::Normalized);
}

#[test]
fn test_report_serializes_snake_case_statuses() {
    let dir = suite();
    let emitter = FnEmitter::new("fake", |_: &EmitRequest| Ok(String::new()));
    let report = run_suite(&SuiteOptions::new(dir.path()), &emitter).unwrap();

    let json_path = dir.path().join("report.json");
    report.write_json(&json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(value["cases"][0]["status"], "mismatch");
    assert_eq!(value["summary"]["mismatched"], 1);
    assert_eq!(value["mode"], "exact");
}

#[test]
fn test_compare_file_ignores_markers() {
    let dir = suite();
    write(dir.path(), "out/actual.js", &expected_code());
    let comparison = compare_file(
        &dir.path().join(BASELINE_NAME),
        &dir.path().join("out/actual.js"),
        CompareMode::Exact,
    )
    .unwrap();
    assert!(comparison.is_match());
}

#[test]
fn test_source_and_name_options_reach_the_emitter() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "fields.ts",
        "// @target: es2022\n// @strict: true\n// @useDefineForClassFields: true, false\nclass C {}\n",
    );
    write(
        dir.path(),
        "fields(target=es2022,usedefineforclassfields=false).1.normal.js",
        "class C {}\n",
    );

    let seen = std::sync::Mutex::new(Vec::new());
    let emitter = FnEmitter::new("fake", |request: &EmitRequest| {
        seen.lock().unwrap().push(request.options.clone());
        Ok("class C {}\n".to_string())
    });

    let report = run_suite(&SuiteOptions::new(dir.path()), &emitter).unwrap();
    assert_eq!(report.summary.passed, 1);
    assert_eq!(
        seen.lock().unwrap()[0],
        vec![
            ("strict".to_string(), "true".to_string()),
            ("usedefineforclassfields".to_string(), "false".to_string()),
        ]
    );
}
