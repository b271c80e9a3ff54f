//! Subcommand handlers. Each returns the process exit code.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use tsz_fixture::{FixtureFile, FixtureName, Stage, decode_source_text};
use tsz_golden::config::update_from_env;
use tsz_golden::{
    CommandEmitter, FixtureFilter, GenerateOptions, HarnessConfig, SuiteOptions, compare_file,
    generate_baselines, run_suite,
};

use crate::args::{CheckArgs, CompareArgs, GenerateArgs, InspectArgs};
use crate::reporter::Reporter;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURES: i32 = 1;

/// Build an emitter from a trailing `-- program args...` command line.
pub fn emitter_from_command(command: &[String]) -> Option<CommandEmitter> {
    let (program, args) = command.split_first()?;
    Some(CommandEmitter::new(program.clone(), args.to_vec()))
}

fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<HarnessConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => HarnessConfig::find(cwd),
    };
    match path {
        Some(path) => {
            debug!(config = %path.display(), "loading config");
            Ok(HarnessConfig::load(&path)?)
        }
        None => Ok(HarnessConfig::default()),
    }
}

/// Merge the config file, flags and environment into suite options.
/// Flags win over the file.
pub fn suite_options(args: &CheckArgs, config: &HarnessConfig) -> Result<SuiteOptions> {
    let Some(fixtures_root) = args.fixtures.clone().or_else(|| config.fixtures_dir.clone()) else {
        bail!("no fixtures directory; pass --fixtures or set fixturesDir in tsz-golden.json");
    };

    let mut filter = FixtureFilter::default();
    if let Some(pattern) = args.filter.clone().or_else(|| config.filter.clone()) {
        filter = filter.with_pattern(pattern)?;
    }
    if let Some(stage) = args.stage {
        filter = filter.with_stage(stage.to_stage());
    }
    if let Some(target) = args.target {
        filter = filter.with_target(target.to_script_target());
    }

    let mut options = SuiteOptions::new(fixtures_root);
    options.sources_dir = args.sources.clone().or_else(|| config.sources_dir.clone());
    options.filter = filter;
    options.mode = args
        .mode
        .map(|mode| mode.to_compare_mode())
        .or(config.mode)
        .unwrap_or_default();
    options.determinism_runs = args.runs.or(config.determinism_runs).unwrap_or(1);
    options.jobs = args.jobs.or(config.jobs).unwrap_or_else(num_cpus::get);
    options.update = args.update || config.update.unwrap_or(false) || update_from_env();
    Ok(options)
}

pub fn run_check(args: &CheckArgs, color: bool) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = load_config(args.config.as_deref(), &cwd)?;
    let options = suite_options(args, &config)?;

    let emitter = match emitter_from_command(&args.emitter) {
        Some(emitter) => emitter,
        None => match &config.emitter {
            Some(emitter) => emitter.to_emitter(),
            None => bail!("no emitter; pass a command after `--` or set emitter in tsz-golden.json"),
        },
    };

    let report = run_suite(&options, &emitter)?;
    if let Some(json) = &args.json {
        report
            .write_json(json)
            .with_context(|| format!("failed to write report to {}", json.display()))?;
    }

    let reporter = Reporter::new(color).verbose(args.verbose);
    println!("{}", reporter.render(&report));

    Ok(if report.summary.has_failures() {
        EXIT_FAILURES
    } else {
        EXIT_SUCCESS
    })
}

pub fn run_compare(args: &CompareArgs, color: bool) -> Result<i32> {
    let comparison = compare_file(&args.fixture, &args.actual, args.mode.to_compare_mode())?;
    println!("{}", Reporter::new(color).format_comparison(&comparison));
    Ok(if comparison.is_match() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURES
    })
}

/// Everything `inspect` knows about one baseline.
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub name: FixtureName,
    pub id: String,
    pub stage: Stage,
    pub target: Option<String>,
    pub source_file_name: String,
    pub file: FixtureFile,
}

pub fn inspect(path: &Path) -> Result<Inspection> {
    let name = FixtureName::from_path(path)
        .with_context(|| format!("{} is not a baseline name", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = decode_source_text(&bytes)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    let target = name.target()?.map(|target| target.to_string());

    Ok(Inspection {
        id: name.id(),
        stage: name.stage(),
        target,
        source_file_name: name.source_file_name(),
        file: FixtureFile::parse(&text),
        name,
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<i32> {
    let inspection = inspect(&args.fixture)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(EXIT_SUCCESS);
    }

    let name = &inspection.name;
    println!("test:     {}", name.test_name);
    for (key, value) in &name.options {
        println!("option:   {key}={value}");
    }
    if let Some(variant) = name.variant {
        println!("variant:  {variant}");
    }
    println!("stage:    {}", inspection.stage);
    if let Some(target) = &inspection.target {
        println!("target:   {target}");
    }
    println!("source:   {}", inspection.source_file_name);
    for section in &inspection.file.sections {
        let label = section.file_name.as_deref().unwrap_or("<unmarked>");
        println!("section:  {label} ({} lines)", section.body.lines().count());
    }
    Ok(EXIT_SUCCESS)
}

pub fn run_generate(args: &GenerateArgs, color: bool) -> Result<i32> {
    let Some(emitter) = emitter_from_command(&args.emitter) else {
        bail!("no emitter; pass a command after `--`");
    };
    let stages = if args.stage.is_empty() {
        vec![Stage::Normal, Stage::Minified]
    } else {
        args.stage.iter().map(|stage| stage.to_stage()).collect()
    };
    let options = GenerateOptions {
        sources_dir: args.sources.clone(),
        out_dir: PathBuf::from(&args.out),
        stages,
        skip_existing: args.skip_existing,
    };

    let summary = generate_baselines(&options, &emitter)?;
    println!("{}", Reporter::new(color).format_generate(&summary));
    Ok(if summary.failed.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURES
    })
}
