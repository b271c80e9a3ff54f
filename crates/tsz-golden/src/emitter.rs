//! The seam between the harness and the compiler under test.
//!
//! The harness never compiles anything itself. It hands an `EmitRequest` to an
//! `Emitter` and compares whatever comes back.

use std::io;
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;
use tsz_fixture::{ScriptTarget, Stage};

/// One compilation the harness needs output for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitRequest {
    /// Source file name as it appears in the fixture marker, e.g. `foo.ts`.
    pub file_name: String,
    pub source_text: String,
    /// `None` leaves the choice to the compiler's default.
    pub target: Option<ScriptTarget>,
    pub stage: Stage,
    /// Remaining options from the fixture name, `target` excluded.
    pub options: Vec<(String, String)>,
}

impl EmitRequest {
    pub fn new(file_name: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source_text: source_text.into(),
            target: None,
            stage: Stage::Normal,
            options: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: ScriptTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to spawn emitter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("emitter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("emitter output is not valid UTF-8")]
    InvalidOutput,

    #[error("failed to prepare emitter input: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Message(String),
}

pub trait Emitter: Send + Sync {
    /// Short name recorded in reports.
    fn name(&self) -> &str;

    fn emit(&self, request: &EmitRequest) -> Result<String, EmitError>;
}

/// Emitter backed by a closure.
pub struct FnEmitter<F> {
    name: String,
    emit: F,
}

impl<F> FnEmitter<F>
where
    F: Fn(&EmitRequest) -> Result<String, EmitError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, emit: F) -> Self {
        Self {
            name: name.into(),
            emit,
        }
    }
}

impl<F> Emitter for FnEmitter<F>
where
    F: Fn(&EmitRequest) -> Result<String, EmitError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&self, request: &EmitRequest) -> Result<String, EmitError> {
        (self.emit)(request)
    }
}

/// Runs an external compiler once per request.
///
/// The source is written to a fresh temporary directory under its fixture
/// file name. Arguments may use these placeholders:
///
/// | placeholder | value |
/// |---|---|
/// | `{input}` | absolute path of the written source |
/// | `{file}` | source file name |
/// | `{target}` | target, or empty when the fixture has none |
/// | `{stage}` | `normal` or `minified` |
/// | `{minify}` | `true` or `false` |
/// | `{options}` | remaining options as `key=value,...` |
///
/// Standard output is the emitted code.
#[derive(Debug, Clone)]
pub struct CommandEmitter {
    program: String,
    args: Vec<String>,
}

impl CommandEmitter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let args = if args.is_empty() {
            vec!["{input}".to_string()]
        } else {
            args
        };
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn expand_args(&self, request: &EmitRequest, input: &Path) -> Vec<String> {
        let target = request.target.map(|t| t.as_str()).unwrap_or_default();
        let options = request
            .options
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        let input = input.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{file}", &request.file_name)
                    .replace("{target}", target)
                    .replace("{stage}", request.stage.as_str())
                    .replace("{minify}", if request.stage.is_minified() { "true" } else { "false" })
                    .replace("{options}", &options)
            })
            .collect()
    }
}

impl Emitter for CommandEmitter {
    fn name(&self) -> &str {
        &self.program
    }

    fn emit(&self, request: &EmitRequest) -> Result<String, EmitError> {
        let temp_dir = tempfile::TempDir::new()?;
        let sanitized = request
            .file_name
            .replace("..", "_")
            .trim_start_matches('/')
            .to_string();
        let input = temp_dir.path().join(&sanitized);
        if let Some(parent) = input.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&input, &request.source_text)?;

        let args = self.expand_args(request, &input);
        debug!(program = %self.program, ?args, "running emitter");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(temp_dir.path())
            .output()
            .map_err(|source| EmitError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(EmitError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| EmitError::InvalidOutput)
    }
}
