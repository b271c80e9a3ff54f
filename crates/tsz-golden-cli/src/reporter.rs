use colored::Colorize;

use tsz_golden::{CaseReport, CaseStatus, Comparison, GenerateSummary, Summary, SuiteReport};

/// Formats suite results for a terminal.
pub struct Reporter {
    color: bool,
    verbose: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn render(&self, report: &SuiteReport) -> String {
        let mut out = String::new();
        for case in &report.cases {
            if !self.verbose && case.status == CaseStatus::Pass {
                continue;
            }
            out.push_str(&self.format_case(case));
            out.push('\n');
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.format_summary(&report.summary));
        out
    }

    pub fn format_case(&self, case: &CaseReport) -> String {
        let mut line = format!("{} {}", self.format_status(case.status), case.path);
        if let Some(detail) = &case.detail {
            line.push_str(": ");
            line.push_str(detail);
        }
        if let Some(diff) = &case.diff {
            if case.status != CaseStatus::Pass {
                line.push('\n');
                line.push_str(&self.format_diff(diff));
            }
        }
        line
    }

    fn format_status(&self, status: CaseStatus) -> String {
        let label = match status {
            CaseStatus::Pass => "PASS",
            CaseStatus::Mismatch => "FAIL",
            CaseStatus::MissingSource => "MISSING",
            CaseStatus::EmitFailed => "ERROR",
            CaseStatus::Nondeterministic => "UNSTABLE",
            CaseStatus::InvalidFixture => "INVALID",
            CaseStatus::Updated => "UPDATED",
        };
        let padded = format!("{label:<8}");
        if !self.color {
            return padded;
        }
        match status {
            CaseStatus::Pass => padded.green().to_string(),
            CaseStatus::Updated => padded.cyan().to_string(),
            CaseStatus::MissingSource => padded.yellow().to_string(),
            _ => padded.red().bold().to_string(),
        }
    }

    /// Indent a unified diff and color its added, removed and hunk lines.
    pub fn format_diff(&self, diff: &str) -> String {
        let mut out = String::new();
        for (index, line) in diff.lines().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str("    ");
            out.push_str(&self.color_diff_line(line));
        }
        out
    }

    fn color_diff_line(&self, line: &str) -> String {
        if !self.color {
            return line.to_string();
        }
        if line.starts_with("+++") || line.starts_with("---") {
            line.bold().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else {
            line.to_string()
        }
    }

    pub fn format_summary(&self, summary: &Summary) -> String {
        let mut parts = vec![format!("{} passed", summary.passed)];
        let counts = [
            (summary.mismatched, "mismatched"),
            (summary.missing_source, "missing source"),
            (summary.emit_failed, "emit failed"),
            (summary.nondeterministic, "nondeterministic"),
            (summary.invalid, "invalid"),
            (summary.updated, "updated"),
        ];
        for (count, label) in counts {
            if count > 0 {
                parts.push(format!("{count} {label}"));
            }
        }

        let verdict = if summary.has_failures() { "FAILED" } else { "ok" };
        let verdict = match (self.color, summary.has_failures()) {
            (false, _) => verdict.to_string(),
            (true, true) => verdict.red().bold().to_string(),
            (true, false) => verdict.green().bold().to_string(),
        };
        format!(
            "{verdict}: {} baselines; {}",
            summary.total,
            parts.join(", ")
        )
    }

    pub fn format_comparison(&self, comparison: &Comparison) -> String {
        match comparison.mismatch() {
            None => {
                let message = format!("identical ({} comparison)", comparison.mode);
                if self.color {
                    message.green().to_string()
                } else {
                    message
                }
            }
            Some(mismatch) => {
                let header = match mismatch.first_line {
                    Some(line) => format!("differs at line {line} ({} comparison)", comparison.mode),
                    None => format!("differs ({} comparison)", comparison.mode),
                };
                let header = if self.color {
                    header.red().bold().to_string()
                } else {
                    header
                };
                format!("{header}\n{}", self.format_diff(&mismatch.diff))
            }
        }
    }

    pub fn format_generate(&self, summary: &GenerateSummary) -> String {
        let mut out = String::new();
        for (id, error) in &summary.failed {
            let label = if self.color {
                "ERROR".red().bold().to_string()
            } else {
                "ERROR".to_string()
            };
            out.push_str(&format!("{label} {id}: {error}\n"));
        }
        out.push_str(&format!(
            "{} written, {} skipped, {} failed",
            summary.written.len(),
            summary.skipped,
            summary.failed.len()
        ));
        out
    }
}
