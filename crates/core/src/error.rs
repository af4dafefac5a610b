use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while resolving or dispatching a toolbox command
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no recognized project context found in {} or parent directories", dir.display())]
    ContextNotFound { dir: PathBuf },

    #[error("unknown context '{context}'")]
    UnknownContext { context: String },

    #[error("command '{command}' not defined in context '{context}'")]
    CommandUndefined { command: String, context: String },

    #[error("invalid arguments: {0}")]
    ArgumentLimitExceeded(#[from] ArgumentLimitViolation),

    #[error("empty command")]
    EmptyCommand,

    #[error("command not found: {program}: {source}")]
    ProgramNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("command '{command}' timed out after {timeout:?}")]
    CommandTimedOut { command: String, timeout: Duration },

    #[error("command '{command}' failed: {}", describe_exit(*code))]
    ProcessExecutionFailed { command: String, code: Option<i32> },

    #[error("failed to run '{command}': {source}")]
    ProcessIo {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("plugin with name \"{name}\" already registered")]
    PluginRegistrationConflict { name: String },

    #[error("plugin validation failed for \"{name}\": {reason}")]
    PluginValidationFailed { name: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Which caller-argument bound was exceeded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentLimitViolation {
    #[error("too many arguments (max: {max}, got: {got})")]
    TooMany { max: usize, got: usize },

    #[error("argument {index} exceeds maximum length of {max} bytes")]
    TooLong { index: usize, max: usize },
}

impl Error {
    /// True when the child was killed because its deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::CommandTimedOut { .. })
    }

    /// Failures the caller can fix by forcing a context or editing config.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Error::ContextNotFound { .. }
                | Error::UnknownContext { .. }
                | Error::CommandUndefined { .. }
        )
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for toolbox operations
pub type Result<T> = std::result::Result<T, Error>;
