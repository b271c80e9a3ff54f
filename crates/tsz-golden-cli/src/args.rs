use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tsz_fixture::{ScriptTarget, Stage};
use tsz_golden::CompareMode;

/// CLI arguments for the tsz-golden binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsz-golden",
    version,
    about = "Check tsz emit output against golden baselines"
)]
pub struct CliArgs {
    /// Colorize output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Emit every baseline's source and compare against the baseline.
    Check(CheckArgs),
    /// Compare an already emitted file against a baseline.
    Compare(CompareArgs),
    /// Print the identity encoded in a baseline file name.
    Inspect(InspectArgs),
    /// Write new baselines for every test source.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to tsz-golden.json (defaults to ./tsz-golden.json when present).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Directory containing baselines.
    #[arg(short = 'f', long)]
    pub fixtures: Option<PathBuf>,

    /// Directory containing test sources (defaults to next to each baseline).
    #[arg(short = 's', long)]
    pub sources: Option<PathBuf>,

    /// Substring or glob selecting baselines by relative path.
    #[arg(long)]
    pub filter: Option<String>,

    /// Only check baselines of this stage.
    #[arg(long, value_enum)]
    pub stage: Option<StageArg>,

    /// Only check baselines emitted for this target.
    #[arg(short = 't', long, value_enum, ignore_case = true)]
    pub target: Option<TargetArg>,

    /// How expected and actual output are compared.
    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Emit each source this many times and require identical output.
    #[arg(long)]
    pub runs: Option<usize>,

    /// Number of parallel workers.
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Rewrite mismatching baselines from actual output.
    #[arg(short = 'u', long)]
    pub update: bool,

    /// Write the JSON report to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Show passing baselines and full diffs.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Compiler command line; placeholders like {input} and {target} are expanded.
    #[arg(last = true)]
    pub emitter: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Baseline file.
    pub fixture: PathBuf,

    /// Emitted output to check.
    pub actual: PathBuf,

    #[arg(short = 'm', long, value_enum, default_value_t = ModeArg::Exact)]
    pub mode: ModeArg,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Baseline file.
    pub fixture: PathBuf,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory containing test sources.
    #[arg(short = 's', long)]
    pub sources: PathBuf,

    /// Directory baselines are written to.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    /// Stages to generate (defaults to both).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub stage: Vec<StageArg>,

    /// Leave baselines that already exist untouched.
    #[arg(long)]
    pub skip_existing: bool,

    /// Compiler command line; placeholders like {input} and {target} are expanded.
    #[arg(last = true, required = true)]
    pub emitter: Vec<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StageArg {
    Normal,
    Minified,
}

impl StageArg {
    pub fn to_stage(self) -> Stage {
        match self {
            StageArg::Normal => Stage::Normal,
            StageArg::Minified => Stage::Minified,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    Exact,
    #[value(alias = "ast")]
    Normalized,
}

impl ModeArg {
    pub fn to_compare_mode(self) -> CompareMode {
        match self {
            ModeArg::Exact => CompareMode::Exact,
            ModeArg::Normalized => CompareMode::Normalized,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum TargetArg {
    Es3,
    Es5,
    #[value(alias = "es6")]
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    Es2023,
    Es2024,
    #[value(name = "esnext", alias = "es-next")]
    EsNext,
}

impl TargetArg {
    pub fn to_script_target(self) -> ScriptTarget {
        match self {
            TargetArg::Es3 => ScriptTarget::ES3,
            TargetArg::Es5 => ScriptTarget::ES5,
            TargetArg::Es2015 => ScriptTarget::ES2015,
            TargetArg::Es2016 => ScriptTarget::ES2016,
            TargetArg::Es2017 => ScriptTarget::ES2017,
            TargetArg::Es2018 => ScriptTarget::ES2018,
            TargetArg::Es2019 => ScriptTarget::ES2019,
            TargetArg::Es2020 => ScriptTarget::ES2020,
            TargetArg::Es2021 => ScriptTarget::ES2021,
            TargetArg::Es2022 => ScriptTarget::ES2022,
            TargetArg::Es2023 => ScriptTarget::ES2023,
            TargetArg::Es2024 => ScriptTarget::ES2024,
            TargetArg::EsNext => ScriptTarget::ESNext,
        }
    }
}
