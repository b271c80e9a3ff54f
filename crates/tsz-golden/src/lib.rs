//! Golden baseline harness for tsz emit output.
//!
//! A baseline is a checked-in file holding the exact code a compiler is
//! expected to emit for one test source, target and stage. This crate finds
//! baselines, drives the compiler under test through the [`Emitter`] seam,
//! compares the result and reports diffs. In update mode it rewrites
//! baselines instead of failing.

pub mod compare;
pub mod config;
pub mod determinism;
pub mod diff;
pub mod discover;
pub mod emitter;
pub mod error;
pub mod fixture;
pub mod generate;
pub mod report;
pub mod runner;
pub mod syntax;

pub use compare::{CompareMode, Comparison, Mismatch, Outcome, compare, normalize_text};
pub use config::HarnessConfig;
pub use determinism::{DeterminismError, check_determinism};
pub use discover::{DiscoveredFixture, FixtureFilter, SourceIndex, discover_fixtures};
pub use emitter::{CommandEmitter, EmitError, EmitRequest, Emitter, FnEmitter};
pub use error::{HarnessError, Result};
pub use fixture::{Fixture, SourceFile};
pub use generate::{GenerateOptions, GenerateSummary, generate_baselines};
pub use report::{CaseReport, CaseStatus, SuiteReport, Summary};
pub use runner::{SuiteOptions, compare_file, run_suite};
pub use syntax::{SyntaxError, SyntaxToken, syntax_tokens};

#[cfg(test)]
#[path = "tests/compare_tests.rs"]
mod compare_tests;
#[cfg(test)]
#[path = "tests/syntax_tests.rs"]
mod syntax_tests;
#[cfg(test)]
#[path = "tests/discover_tests.rs"]
mod discover_tests;
#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod runner_tests;
#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "tests/emitter_tests.rs"]
mod emitter_tests;
#[cfg(test)]
#[path = "tests/generate_tests.rs"]
mod generate_tests;
