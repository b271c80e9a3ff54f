//! Fixture identity encoded in baseline file names.
//!
//! Baselines are named
//! `<test>[(<key>=<value>,...)][.<variant>][.<stage>].<ext>`, for example
//! `typeOfThisInStaticMembers8(target=es2022).2.minified.js`. The harness uses
//! the name alone to pair a baseline with its test source and compile options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::FixtureError;
use crate::target::ScriptTarget;

/// Extensions a baseline of emitted code may carry.
pub const FIXTURE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx"];

/// Transform stage recorded in a baseline name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Normal,
    Minified,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Normal => "normal",
            Stage::Minified => "minified",
        }
    }

    pub fn is_minified(self) -> bool {
        matches!(self, Stage::Minified)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Stage::Normal),
            "minified" => Ok(Stage::Minified),
            other => Err(format!("unknown stage '{other}'")),
        }
    }
}

/// Parsed identity of a baseline file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureName {
    /// Test case name, e.g. `typeOfThisInStaticMembers8`.
    pub test_name: String,
    /// Compile options in the order they appear in the name.
    pub options: Vec<(String, String)>,
    /// Variant index (`.2` in `foo(target=es5).2.minified.js`).
    pub variant: Option<u32>,
    /// Stage as written in the name; `None` when the name omits it.
    pub stage: Option<Stage>,
    /// File extension without the dot.
    pub extension: String,
}

impl FixtureName {
    pub fn parse(file_name: &str) -> Result<Self, FixtureError> {
        let (rest, extension) = file_name.rsplit_once('.').unwrap_or((file_name, ""));
        if !FIXTURE_EXTENSIONS.contains(&extension) {
            return Err(FixtureError::UnsupportedExtension {
                name: file_name.to_string(),
                extension: extension.to_string(),
            });
        }

        let mut rest = rest;
        let mut stage = None;
        if let Some((head, tail)) = rest.rsplit_once('.') {
            if let Ok(parsed) = tail.parse::<Stage>() {
                stage = Some(parsed);
                rest = head;
            }
        }

        let mut variant = None;
        if let Some((head, tail)) = rest.rsplit_once('.') {
            if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
                variant = tail.parse::<u32>().ok();
                if variant.is_some() {
                    rest = head;
                }
            }
        }

        let (test_name, options) = split_options(file_name, rest)?;
        if test_name.is_empty() {
            return Err(FixtureError::EmptyTestName {
                name: file_name.to_string(),
            });
        }

        Ok(Self {
            test_name: test_name.to_string(),
            options,
            variant,
            stage,
            extension: extension.to_string(),
        })
    }

    /// Parse the final component of `path`.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| FixtureError::NoFileName(path.display().to_string()))?;
        Self::parse(file_name)
    }

    /// Stage of the baseline; names without one are `normal` output.
    pub fn stage(&self) -> Stage {
        self.stage.unwrap_or(Stage::Normal)
    }

    /// Look up an option by key, ignoring case.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Compile target named by the `target` option.
    ///
    /// Returns `Ok(None)` when the name carries no target.
    pub fn target(&self) -> Result<Option<ScriptTarget>, FixtureError> {
        self.option("target").map(str::parse).transpose()
    }

    /// Canonical name without the extension; used as the report key.
    pub fn id(&self) -> String {
        let mut id = self.test_name.clone();
        if !self.options.is_empty() {
            id.push('(');
            for (index, (key, value)) in self.options.iter().enumerate() {
                if index > 0 {
                    id.push(',');
                }
                id.push_str(key);
                id.push('=');
                id.push_str(value);
            }
            id.push(')');
        }
        if let Some(variant) = self.variant {
            id.push('.');
            id.push_str(&variant.to_string());
        }
        if let Some(stage) = self.stage {
            id.push('.');
            id.push_str(stage.as_str());
        }
        id
    }

    /// File name of the TypeScript test source this baseline was emitted from.
    pub fn source_file_name(&self) -> String {
        format!("{}.ts", self.test_name)
    }
}

impl fmt::Display for FixtureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id(), self.extension)
    }
}

impl FromStr for FixtureName {
    type Err = FixtureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

fn split_options<'a>(
    file_name: &str,
    stem: &'a str,
) -> Result<(&'a str, Vec<(String, String)>), FixtureError> {
    let unbalanced = || FixtureError::UnbalancedParens {
        name: file_name.to_string(),
    };

    let Some(open) = stem.find('(') else {
        if stem.contains(')') {
            return Err(unbalanced());
        }
        return Ok((stem, Vec::new()));
    };
    let Some(inner) = stem[open + 1..].strip_suffix(')') else {
        return Err(unbalanced());
    };
    if inner.contains('(') || inner.contains(')') {
        return Err(unbalanced());
    }

    let mut options = Vec::new();
    for raw in inner.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let Some((key, value)) = raw.split_once('=') else {
            return Err(FixtureError::MalformedOption {
                name: file_name.to_string(),
                option: raw.to_string(),
            });
        };
        options.push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok((&stem[..open], options))
}
