use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::compare::CompareMode;
use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Pass,
    Mismatch,
    MissingSource,
    EmitFailed,
    Nondeterministic,
    InvalidFixture,
    /// Mismatch that was fixed by rewriting the baseline in update mode.
    Updated,
}

impl CaseStatus {
    pub fn is_failure(self) -> bool {
        !matches!(self, CaseStatus::Pass | CaseStatus::Updated)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub id: String,
    pub path: String,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub mismatched: usize,
    pub missing_source: usize,
    pub emit_failed: usize,
    pub nondeterministic: usize,
    pub invalid: usize,
    pub updated: usize,
}

impl Summary {
    pub fn from_cases(cases: &[CaseReport]) -> Self {
        let mut summary = Summary {
            total: cases.len(),
            ..Summary::default()
        };
        for case in cases {
            match case.status {
                CaseStatus::Pass => summary.passed += 1,
                CaseStatus::Mismatch => summary.mismatched += 1,
                CaseStatus::MissingSource => summary.missing_source += 1,
                CaseStatus::EmitFailed => summary.emit_failed += 1,
                CaseStatus::Nondeterministic => summary.nondeterministic += 1,
                CaseStatus::InvalidFixture => summary.invalid += 1,
                CaseStatus::Updated => summary.updated += 1,
            }
        }
        summary
    }

    pub fn failures(&self) -> usize {
        self.mismatched + self.missing_source + self.emit_failed + self.nondeterministic + self.invalid
    }

    pub fn has_failures(&self) -> bool {
        self.failures() > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub fixtures_root: String,
    pub emitter: String,
    pub mode: CompareMode,
    pub summary: Summary,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|case| case.status.is_failure())
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|err| HarnessError::write(path, err))
    }
}
