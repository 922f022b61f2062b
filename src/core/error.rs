use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresubmitError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Initialization step '{step}' failed: {reason}")]
    InitializationError { step: String, reason: String },
    #[error("Unmet precondition: {0}")]
    PreconditionError(String),
    #[error("{0}")]
    CheckFailed(CheckFailure),
    #[error("Command `{command}` exited with status {code}")]
    CommandFailed {
        command: String,
        code: i32,
        output: String,
    },
    #[error("Git error: {0}")]
    GitError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Structured violation raised by a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub message: String,
    pub paths: Vec<String>,
}

impl CheckFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            paths: Vec::new(),
        }
    }

    pub fn with_paths(message: impl Into<String>, paths: Vec<String>) -> Self {
        Self {
            message: message.into(),
            paths,
        }
    }
}

impl std::fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<CheckFailure> for PresubmitError {
    fn from(failure: CheckFailure) -> Self {
        PresubmitError::CheckFailed(failure)
    }
}
