//! `tsz-golden.json` harness configuration.
//!
//! Every field is optional; command-line flags override file values.
//! Relative paths resolve against the directory holding the file.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::compare::CompareMode;
use crate::emitter::CommandEmitter;
use crate::error::{HarnessError, Result};

pub const CONFIG_FILE_NAME: &str = "tsz-golden.json";

/// Environment variable that turns on update mode (`1`, `true`, `yes`).
pub const UPDATE_ENV: &str = "TSZ_GOLDEN_UPDATE";

/// Accepts both `true` and `"true"`, like tsconfig booleans written as strings.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => parse_flag(&s)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("invalid boolean value: '{s}'"))),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmitterConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl EmitterConfig {
    pub fn to_emitter(&self) -> CommandEmitter {
        CommandEmitter::new(self.command.clone(), self.args.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HarnessConfig {
    #[serde(default)]
    pub fixtures_dir: Option<PathBuf>,
    #[serde(default)]
    pub sources_dir: Option<PathBuf>,
    #[serde(default)]
    pub mode: Option<CompareMode>,
    #[serde(default)]
    pub determinism_runs: Option<usize>,
    #[serde(default)]
    pub jobs: Option<usize>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub update: Option<bool>,
    #[serde(default)]
    pub emitter: Option<EmitterConfig>,
}

impl HarnessConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| HarnessError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` and resolve its relative directories against its parent.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| HarnessError::read(path, err))?;
        let mut config = Self::parse(&text, path)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// `tsz-golden.json` in `dir`, if present.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for dir in [&mut self.fixtures_dir, &mut self.sources_dir] {
            if let Some(path) = dir.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

/// Update mode requested through the environment.
pub fn update_from_env() -> bool {
    std::env::var(UPDATE_ENV)
        .ok()
        .and_then(|value| parse_flag(&value))
        .unwrap_or(false)
}
