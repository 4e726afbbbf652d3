// src/error.rs

//! Error types for recipe loading and pipeline execution
//!
//! Every failure falls into one of two pipeline kinds: a configuration
//! problem detected before any external process starts, or a delegated
//! external process that failed. Plain I/O failures while touching the
//! layout folders are reported separately.

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by recipe parsing, layout resolution and the stage runners
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed recipe field, folder-role collision, or a stage invoked
    /// without its prerequisites
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A declared folder path is absolute or escapes the invocation root
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A `%(name)s` variable in a layout path has no value
    #[error("missing variable: {0}")]
    MissingVariable(String),

    /// A delegated build system invocation returned a failure status
    #[error("{phase} failed: {program} exited with {}{}", fmt_code(.code), fmt_stderr(.stderr))]
    CommandFailed {
        phase: String,
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The external build system could not be started
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// IO error while reading or writing layout folders
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised before any external process starts
    Configuration,
    /// A delegated configure/build/test/install invocation failed
    ExternalProcess,
    /// Filesystem or serialization failure
    Io,
}

impl Error {
    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Which pipeline error kind this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::InvalidPath(_) | Self::MissingVariable(_) => {
                ErrorKind::Configuration
            }
            Self::CommandFailed { .. } | Self::ToolNotFound(_) => ErrorKind::ExternalProcess,
            Self::Io(_) | Self::Json(_) => ErrorKind::Io,
        }
    }

    /// True for errors raised before any external process was started
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\nstderr: {}", trimmed)
    }
}
