//! Golden fixture model for tsz emit baselines.
//!
//! This crate provides the pieces every baseline consumer needs:
//! - Fixture identity parsed from file names (`FixtureName`, `Stage`)
//! - Compile targets (`ScriptTarget`)
//! - Fixture file contents split on `//// [file]` source markers (`FixtureFile`)
//! - `// @key: value` directives from test sources (`TestDirectives`)
//! - Source text decoding for BOM-prefixed files

pub mod decode;
pub mod directives;
pub mod error;
pub mod markers;
pub mod name;
pub mod target;

pub use decode::decode_source_text;
pub use directives::{TestDirectives, parse_directives};
pub use error::FixtureError;
pub use markers::{FixtureFile, Section};
pub use name::{FixtureName, Stage};
pub use target::ScriptTarget;

#[cfg(test)]
#[path = "tests/name_tests.rs"]
mod name_tests;
#[cfg(test)]
#[path = "tests/markers_tests.rs"]
mod markers_tests;
#[cfg(test)]
#[path = "tests/directives_tests.rs"]
mod directives_tests;
