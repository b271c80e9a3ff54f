//! Fixture and test source discovery.

use globset::{Glob, GlobMatcher};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tsz_fixture::{FixtureName, ScriptTarget, Stage};
use walkdir::WalkDir;

use crate::error::{HarnessError, Result};

/// Selects which discovered fixtures a run covers.
#[derive(Debug, Clone, Default)]
pub struct FixtureFilter {
    pattern: Option<String>,
    glob: Option<GlobMatcher>,
    pub stage: Option<Stage>,
    pub target: Option<ScriptTarget>,
}

impl FixtureFilter {
    /// A pattern with glob metacharacters is matched against the file name
    /// and the relative path; anything else is a substring of the relative path.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.contains(['*', '?', '[', '{']) {
            let glob = Glob::new(&pattern).map_err(|source| HarnessError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            self.glob = Some(glob.compile_matcher());
        }
        self.pattern = Some(pattern);
        Ok(self)
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_target(mut self, target: ScriptTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn matches(&self, relative: &Path, name: &FixtureName) -> bool {
        if !matches_path_filter(relative, self.pattern.as_deref(), self.glob.as_ref()) {
            return false;
        }
        if let Some(stage) = self.stage {
            if name.stage() != stage {
                return false;
            }
        }
        if let Some(target) = self.target {
            if !matches!(name.target(), Ok(Some(t)) if t == target) {
                return false;
            }
        }
        true
    }
}

fn matches_path_filter(relative: &Path, pattern: Option<&str>, glob: Option<&GlobMatcher>) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    match glob {
        Some(glob) => {
            glob.is_match(relative)
                || relative
                    .file_name()
                    .is_some_and(|file_name| glob.is_match(file_name))
        }
        None => relative.to_string_lossy().replace('\\', "/").contains(pattern),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFixture {
    pub path: PathBuf,
    /// Path relative to the fixtures root, `/`-separated on every platform.
    pub relative: String,
    pub name: FixtureName,
}

/// Walk `root` for files whose names follow the fixture convention.
///
/// Files that do not parse as fixture names (sources, READMEs) are skipped.
/// The result is sorted by relative path.
pub fn discover_fixtures(root: &Path, filter: &FixtureFilter) -> Result<Vec<DiscoveredFixture>> {
    if !root.is_dir() {
        return Err(HarnessError::MissingRoot(root.to_path_buf()));
    }

    let mut fixtures = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = match FixtureName::from_path(path) {
            Ok(name) => name,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "not a fixture");
                continue;
            }
        };
        let relative_path = path.strip_prefix(root).unwrap_or(path);
        if !filter.matches(relative_path, &name) {
            continue;
        }
        fixtures.push(DiscoveredFixture {
            path: path.to_path_buf(),
            relative: relative_path.to_string_lossy().replace('\\', "/"),
            name,
        });
    }

    fixtures.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(fixtures)
}

/// Test sources indexed by test name (file stem).
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    by_name: BTreeMap<String, PathBuf>,
}

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

impl SourceIndex {
    pub fn build(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(HarnessError::MissingRoot(root.to_path_buf()));
        }

        let mut by_name: BTreeMap<String, PathBuf> = BTreeMap::new();
        for entry in WalkDir::new(root).sort_by_file_name().into_iter().flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if file_name.ends_with(".d.ts") {
                continue;
            }
            let Some((stem, ext)) = file_name.rsplit_once('.') else {
                continue;
            };
            if !SOURCE_EXTENSIONS.contains(&ext) {
                continue;
            }
            if let Some(existing) = by_name.get(stem) {
                warn!(
                    test = stem,
                    kept = %existing.display(),
                    ignored = %path.display(),
                    "duplicate test source"
                );
                continue;
            }
            by_name.insert(stem.to_string(), path.to_path_buf());
        }

        debug!(count = by_name.len(), root = %root.display(), "indexed test sources");
        Ok(Self { by_name })
    }

    pub fn lookup(&self, test_name: &str) -> Option<&Path> {
        self.by_name.get(test_name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.by_name
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}
