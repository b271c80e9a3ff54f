//! Expected-vs-actual comparison of emitted code.
//!
//! Both sides are normalized the same way before comparing: byte order mark
//! and source markers dropped, `\r\n` unified to `\n`, trailing newlines at
//! the end removed. Whitespace inside lines is kept. `Exact` then requires
//! identical text. `Normalized` requires identical JavaScript token streams,
//! which tolerates reformatting and comments; output that does not parse is
//! held to `Exact`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use tsz_fixture::FixtureFile;

use crate::diff::{DEFAULT_CONTEXT, DiffStats, first_differing_line, unified_diff};
use crate::syntax::syntax_tokens;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    #[default]
    Exact,
    Normalized,
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareMode::Exact => f.write_str("exact"),
            CompareMode::Normalized => f.write_str("normalized"),
        }
    }
}

impl FromStr for CompareMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(CompareMode::Exact),
            "normalized" | "ast" | "tokens" => Ok(CompareMode::Normalized),
            other => Err(format!("unknown compare mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub diff: String,
    pub stats: DiffStats,
    /// 1-based line in the normalized texts.
    pub first_line: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Match,
    Mismatch(Mismatch),
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub mode: CompareMode,
    pub expected: String,
    pub actual: String,
    pub outcome: Outcome,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, Outcome::Match)
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match &self.outcome {
            Outcome::Match => None,
            Outcome::Mismatch(mismatch) => Some(mismatch),
        }
    }
}

/// Strip markers, unify line endings and drop the trailing newlines.
pub fn normalize_text(text: &str) -> String {
    let mut code = FixtureFile::parse(text).code();
    let kept = code.trim_end_matches('\n').len();
    code.truncate(kept);
    code
}

fn same_syntax(expected: &str, actual: &str) -> bool {
    match (syntax_tokens(expected), syntax_tokens(actual)) {
        (Ok(expected_tokens), Ok(actual_tokens)) => expected_tokens == actual_tokens,
        (Err(error), _) | (_, Err(error)) => {
            debug!(%error, "output does not parse, comparing text");
            expected == actual
        }
    }
}

pub fn compare(expected: &str, actual: &str, mode: CompareMode) -> Comparison {
    let expected = normalize_text(expected);
    let actual = normalize_text(actual);

    let equal = match mode {
        CompareMode::Exact => expected == actual,
        CompareMode::Normalized => same_syntax(&expected, &actual),
    };

    let outcome = if equal {
        Outcome::Match
    } else {
        let (diff, stats) = unified_diff(&expected, &actual, DEFAULT_CONTEXT);
        Outcome::Mismatch(Mismatch {
            diff,
            stats,
            first_line: first_differing_line(&expected, &actual),
        })
    };

    Comparison {
        mode,
        expected,
        actual,
        outcome,
    }
}
