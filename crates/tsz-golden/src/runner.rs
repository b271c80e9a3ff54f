//! Suite execution: discover, emit, compare, report.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, info_span};

use crate::compare::{CompareMode, Comparison, compare};
use crate::determinism::{DeterminismError, check_determinism};
use crate::discover::{DiscoveredFixture, FixtureFilter, SourceIndex, discover_fixtures};
use crate::emitter::Emitter;
use crate::error::{HarnessError, Result};
use crate::fixture::{Fixture, read_text};
use crate::report::{CaseReport, CaseStatus, Summary, SuiteReport};

#[derive(Debug, Clone)]
pub struct SuiteOptions {
    pub fixtures_root: PathBuf,
    /// Directory of test sources; `None` looks next to each baseline.
    pub sources_dir: Option<PathBuf>,
    pub filter: FixtureFilter,
    pub mode: CompareMode,
    /// Emits per fixture; values above 1 enable the determinism check.
    pub determinism_runs: usize,
    pub jobs: usize,
    /// Rewrite mismatching baselines from actual output.
    pub update: bool,
}

impl SuiteOptions {
    pub fn new(fixtures_root: impl Into<PathBuf>) -> Self {
        Self {
            fixtures_root: fixtures_root.into(),
            sources_dir: None,
            filter: FixtureFilter::default(),
            mode: CompareMode::Exact,
            determinism_runs: 1,
            jobs: 1,
            update: false,
        }
    }
}

pub fn run_suite(options: &SuiteOptions, emitter: &dyn Emitter) -> Result<SuiteReport> {
    let span = info_span!("suite", root = %options.fixtures_root.display(), emitter = emitter.name());
    let _guard = span.enter();
    let start = Instant::now();

    let sources = options
        .sources_dir
        .as_deref()
        .map(SourceIndex::build)
        .transpose()?;
    if let Some(index) = &sources {
        info!(count = index.len(), "indexed test sources");
    }
    let fixtures = discover_fixtures(&options.fixtures_root, &options.filter)?;
    info!(count = fixtures.len(), "discovered fixtures");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.max(1))
        .build()
        .map_err(|err| HarnessError::ThreadPool(err.to_string()))?;

    let mut cases: Vec<CaseReport> = pool.install(|| {
        fixtures
            .par_iter()
            .map(|fixture| run_case(fixture, sources.as_ref(), options, emitter))
            .collect()
    });
    cases.sort_by(|a, b| a.path.cmp(&b.path));

    let summary = Summary::from_cases(&cases);
    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failures(),
        updated = summary.updated,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "suite finished"
    );

    Ok(SuiteReport {
        fixtures_root: options.fixtures_root.display().to_string(),
        emitter: emitter.name().to_string(),
        mode: options.mode,
        summary,
        cases,
    })
}

fn run_case(
    discovered: &DiscoveredFixture,
    sources: Option<&SourceIndex>,
    options: &SuiteOptions,
    emitter: &dyn Emitter,
) -> CaseReport {
    let mut report = CaseReport {
        id: discovered.name.id(),
        path: discovered.relative.clone(),
        status: CaseStatus::Pass,
        detail: None,
        diff: None,
    };

    let fixture = match Fixture::load(&discovered.path, sources) {
        Ok(fixture) => fixture,
        Err(err) => return report.fail(CaseStatus::InvalidFixture, err.to_string()),
    };
    let request = match fixture.emit_request() {
        Ok(Some(request)) => request,
        Ok(None) => {
            let detail = format!("no source found for '{}'", fixture.name.source_file_name());
            return report.fail(CaseStatus::MissingSource, detail);
        }
        Err(err) => return report.fail(CaseStatus::InvalidFixture, err.to_string()),
    };

    let actual = if options.determinism_runs > 1 {
        match check_determinism(emitter, &request, options.determinism_runs) {
            Ok(output) => output,
            Err(DeterminismError::Emit(err)) => {
                return report.fail(CaseStatus::EmitFailed, err.to_string());
            }
            Err(err @ DeterminismError::Diverged { .. }) => {
                let detail = err.to_string();
                if let DeterminismError::Diverged { diff, .. } = err {
                    report.diff = Some(diff);
                }
                return report.fail(CaseStatus::Nondeterministic, detail);
            }
        }
    } else {
        match emitter.emit(&request) {
            Ok(output) => output,
            Err(err) => return report.fail(CaseStatus::EmitFailed, err.to_string()),
        }
    };

    let comparison = compare(&fixture.expected_code(), &actual, options.mode);
    let Some(mismatch) = comparison.mismatch() else {
        debug!(fixture = %report.id, "pass");
        return report;
    };

    if options.update {
        let updated = fixture.file.with_code(&actual);
        return match std::fs::write(&fixture.path, updated.render()) {
            Ok(()) => {
                info!(fixture = %report.id, "updated baseline");
                report.status = CaseStatus::Updated;
                report
            }
            Err(err) => {
                report.diff = Some(mismatch.diff.clone());
                let detail = HarnessError::write(&fixture.path, err).to_string();
                report.fail(CaseStatus::Mismatch, detail)
            }
        };
    }

    debug!(fixture = %report.id, first_line = ?mismatch.first_line, "mismatch");
    report.diff = Some(mismatch.diff.clone());
    let detail = match mismatch.first_line {
        Some(line) => format!(
            "output differs from baseline at line {line} (+{} -{})",
            mismatch.stats.inserted, mismatch.stats.deleted
        ),
        None => "output differs from baseline".to_string(),
    };
    report.fail(CaseStatus::Mismatch, detail)
}

impl CaseReport {
    fn fail(mut self, status: CaseStatus, detail: String) -> Self {
        self.status = status;
        self.detail = Some(detail);
        self
    }
}

/// Compare an already produced output file against a baseline.
///
/// Source markers are ignored on both sides.
pub fn compare_file(fixture_path: &Path, actual_path: &Path, mode: CompareMode) -> Result<Comparison> {
    let expected = read_text(fixture_path)?;
    let actual = read_text(actual_path)?;
    Ok(compare(&expected, &actual, mode))
}
