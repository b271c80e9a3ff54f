//! A baseline on disk paired with the test source it was emitted from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use tsz_fixture::{FixtureFile, FixtureName, TestDirectives, decode_source_text, parse_directives};

use crate::discover::SourceIndex;
use crate::emitter::EmitRequest;
use crate::error::{HarnessError, Result};

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    pub directives: TestDirectives,
}

impl SourceFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let directives = parse_directives(&text);
        Ok(Self {
            path: path.to_path_buf(),
            text,
            directives,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Fixture {
    pub name: FixtureName,
    pub path: PathBuf,
    pub file: FixtureFile,
    /// `None` when no source for the test could be found.
    pub source: Option<SourceFile>,
}

impl Fixture {
    /// Load the baseline at `path` and look up its test source.
    ///
    /// Sources are looked up in `sources` when given, otherwise next to the
    /// baseline as `<test>.ts`.
    pub fn load(path: &Path, sources: Option<&SourceIndex>) -> Result<Self> {
        let name = FixtureName::from_path(path).map_err(|err| HarnessError::fixture(path, err))?;
        let file = FixtureFile::parse(&read_text(path)?);

        let source_path = match sources {
            Some(index) => index.lookup(&name.test_name).map(Path::to_path_buf),
            None => path
                .parent()
                .map(|dir| dir.join(name.source_file_name()))
                .filter(|candidate| candidate.is_file()),
        };
        let source = source_path.as_deref().map(SourceFile::load).transpose()?;

        let fixture = Self {
            name,
            path: path.to_path_buf(),
            file,
            source,
        };
        fixture.warn_on_undeclared_target();
        Ok(fixture)
    }

    /// Expected emitted code, source markers removed.
    pub fn expected_code(&self) -> String {
        self.file.code()
    }

    /// Request that should reproduce this baseline, if the source is known.
    pub fn emit_request(&self) -> Result<Option<EmitRequest>> {
        let Some(source) = &self.source else {
            return Ok(None);
        };
        let target = self
            .name
            .target()
            .map_err(|err| HarnessError::fixture(&self.path, err))?;
        let file_name = self
            .file
            .primary_source()
            .map(str::to_string)
            .unwrap_or_else(|| self.name.source_file_name());

        // Single-valued directives always apply; the name picks among the rest.
        let declared = source.directives.options.keys().filter_map(|key| {
            match source.directives.values(key).as_slice() {
                [value] => Some((key.as_str(), *value)),
                _ => None,
            }
        });
        let named = self.name.options.iter().map(|(k, v)| (k.as_str(), v.as_str()));

        Ok(Some(EmitRequest {
            file_name,
            source_text: source.text.clone(),
            target,
            stage: self.name.stage(),
            options: compile_options(declared.chain(named)),
        }))
    }

    fn warn_on_undeclared_target(&self) {
        let (Some(source), Ok(Some(target))) = (&self.source, self.name.target()) else {
            return;
        };
        if source.directives.get("target").is_none() {
            return;
        }
        if let Ok(declared) = source.directives.targets() {
            if !declared.contains(&target) {
                warn!(
                    fixture = %self.path.display(),
                    %target,
                    "baseline target is not declared by its test source"
                );
            }
        }
    }
}

/// Directive keys that select targets or files rather than compile options.
const NON_OPTION_KEYS: &[&str] = &["target", "filename"];

/// Compile options for an emit request, sorted by key. Later pairs win.
pub(crate) fn compile_options<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<(String, String)> {
    let options: BTreeMap<String, String> = pairs
        .into_iter()
        .map(|(key, value)| (key.to_ascii_lowercase(), value.to_string()))
        .filter(|(key, _)| !NON_OPTION_KEYS.contains(&key.as_str()))
        .collect();
    options.into_iter().collect()
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|err| HarnessError::read(path, err))?;
    decode_source_text(&bytes).map_err(|err| HarnessError::fixture(path, err))
}
