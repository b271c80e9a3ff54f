//! Test source directive parser
//!
//! Parses `// @key: value` comment directives from TypeScript test sources.
//! A comma-separated value declares one configuration per entry, so
//! `// @target: esnext, es2022` produces a baseline for each target.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::FixtureError;
use crate::target::ScriptTarget;

/// Matches: // @key: value (captures entire rest of line as value)
static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*//\s*@(\w+)\s*:\s*([^\r\n]*)").expect("valid directive regex"));

/// Directives declared by a test source, keys lower-cased.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TestDirectives {
    /// Raw values by key; a repeated key keeps the last value.
    pub options: BTreeMap<String, String>,
}

pub fn parse_directives(source: &str) -> TestDirectives {
    let mut directives = TestDirectives::default();
    for line in source.lines() {
        if let Some(cap) = DIRECTIVE_RE.captures(line) {
            let key = cap[1].to_lowercase();
            let value = cap[2].trim().to_string();
            directives.options.insert(key, value);
        }
    }
    directives
}

impl TestDirectives {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Comma-separated values declared for `key`, empty when absent.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.get(key).map(split_values).unwrap_or_default()
    }

    /// Cartesian product of all comma-separated directive values.
    ///
    /// Keys iterate in sorted order and values in declaration order, so the
    /// result is stable across runs. Sources without directives yield a
    /// single empty configuration.
    pub fn configurations(&self) -> Vec<BTreeMap<String, String>> {
        let mut configurations = vec![BTreeMap::new()];
        for (key, raw) in &self.options {
            let values: Vec<&str> = split_values(raw);
            let mut next = Vec::with_capacity(configurations.len() * values.len().max(1));
            for config in &configurations {
                if values.is_empty() {
                    next.push(config.clone());
                    continue;
                }
                for value in &values {
                    let mut expanded = config.clone();
                    expanded.insert(key.clone(), (*value).to_string());
                    next.push(expanded);
                }
            }
            configurations = next;
        }
        configurations
    }

    /// Targets declared by `@target`, or the harness default when absent.
    pub fn targets(&self) -> Result<Vec<ScriptTarget>, FixtureError> {
        let values = self.values("target");
        if values.is_empty() {
            return Ok(vec![ScriptTarget::DEFAULT]);
        }
        values.into_iter().map(str::parse).collect()
    }
}

fn split_values(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect()
}
