use thiserror::Error;

/// Errors produced while reading fixture identity or contents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FixtureError {
    #[error("fixture name '{name}' has no test name")]
    EmptyTestName { name: String },

    #[error("fixture name '{name}' has unsupported extension '{extension}'")]
    UnsupportedExtension { name: String, extension: String },

    #[error("fixture name '{name}' has unbalanced parentheses")]
    UnbalancedParens { name: String },

    #[error("fixture option '{option}' in '{name}' is not of the form key=value")]
    MalformedOption { name: String, option: String },

    #[error("unsupported target '{0}'")]
    UnknownTarget(String),

    #[error("path '{0}' has no file name")]
    NoFileName(String),

    #[error("source text is not valid {0}")]
    Decode(&'static str),
}
