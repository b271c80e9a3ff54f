//! Authoring of new baselines from test sources.
//!
//! Every source yields one baseline per directive configuration and requested
//! stage, named `<test>(target=<t>[,<key>=<value>...]).<variant>.<stage>.js`
//! where the variant is `1` for normal output and `2` for minified output.
//! Only options declared with several values appear in the name.

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tsz_fixture::{FixtureFile, FixtureName, ScriptTarget, Stage};

use crate::discover::SourceIndex;
use crate::emitter::{EmitRequest, Emitter};
use crate::error::{HarnessError, Result};
use crate::fixture::{SourceFile, compile_options};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub sources_dir: PathBuf,
    pub out_dir: PathBuf,
    pub stages: Vec<Stage>,
    /// Keep baselines that already exist.
    pub skip_existing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub written: Vec<PathBuf>,
    pub skipped: usize,
    pub failed: Vec<(String, String)>,
}

/// Baseline name for `test_name` compiled with `options` through `stage`.
pub fn baseline_name(test_name: &str, options: &[(String, String)], stage: Stage) -> FixtureName {
    FixtureName {
        test_name: test_name.to_string(),
        options: options.to_vec(),
        variant: Some(match stage {
            Stage::Normal => 1,
            Stage::Minified => 2,
        }),
        stage: Some(stage),
        extension: "js".to_string(),
    }
}

/// Emit every directive configuration of every source under `sources_dir`.
///
/// Sources that cannot be read or declare an unknown target, and emits that
/// fail, are collected in `GenerateSummary::failed` without stopping the run.
pub fn generate_baselines(options: &GenerateOptions, emitter: &dyn Emitter) -> Result<GenerateSummary> {
    let index = SourceIndex::build(&options.sources_dir)?;
    if index.is_empty() {
        warn!(dir = %options.sources_dir.display(), "no test sources found");
    } else {
        info!(count = index.len(), "generating baselines");
    }
    std::fs::create_dir_all(&options.out_dir)
        .map_err(|err| HarnessError::write(&options.out_dir, err))?;

    let mut summary = GenerateSummary::default();
    for (test_name, path) in index.iter() {
        let source = match load_source(path) {
            Ok(source) => source,
            Err(err) => {
                warn!(source = %path.display(), error = %err, "skipping test source");
                summary.failed.push((test_name.to_string(), err.to_string()));
                continue;
            }
        };
        let file_name = source_file_name(path, test_name);
        // Options with several values go into the name so each configuration
        // gets its own baseline.
        let varying: Vec<&String> = source
            .directives
            .options
            .keys()
            .filter(|key| key.as_str() != "target" && source.directives.values(key).len() > 1)
            .collect();

        for config in source.directives.configurations() {
            let target = config
                .get("target")
                .and_then(|value| value.parse::<ScriptTarget>().ok())
                .unwrap_or(ScriptTarget::DEFAULT);
            let mut name_options = vec![("target".to_string(), target.as_str().to_string())];
            for key in &varying {
                if let Some(value) = config.get(key.as_str()) {
                    name_options.push(((*key).clone(), value.clone()));
                }
            }
            let compile = compile_options(config.iter().map(|(k, v)| (k.as_str(), v.as_str())));

            for &stage in &options.stages {
                let name = baseline_name(test_name, &name_options, stage);
                let out_path = options.out_dir.join(name.to_string());
                if options.skip_existing && out_path.exists() {
                    summary.skipped += 1;
                    continue;
                }

                let mut request = EmitRequest::new(file_name.clone(), source.text.clone())
                    .with_target(target)
                    .with_stage(stage);
                request.options = compile.clone();
                match emitter.emit(&request) {
                    Ok(output) => {
                        let file = FixtureFile::single(file_name.clone(), output.trim_end());
                        std::fs::write(&out_path, file.render())
                            .map_err(|err| HarnessError::write(&out_path, err))?;
                        info!(baseline = %name, "wrote baseline");
                        summary.written.push(out_path);
                    }
                    Err(err) => {
                        warn!(baseline = %name, error = %err, "emit failed");
                        summary.failed.push((name.id(), err.to_string()));
                    }
                }
            }
        }
    }

    Ok(summary)
}

/// Load a source and check that every declared target is known.
fn load_source(path: &Path) -> Result<SourceFile> {
    let source = SourceFile::load(path)?;
    source
        .directives
        .targets()
        .map_err(|err| HarnessError::fixture(path, err))?;
    Ok(source)
}

fn source_file_name(path: &Path, test_name: &str) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{test_name}.ts"))
}
