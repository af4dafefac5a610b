//! Caller argument handling: command-line splitting and resource bounds

use crate::error::{ArgumentLimitViolation, Result};
use tracing::debug;

pub const DEFAULT_MAX_ARGUMENTS: usize = 100;
pub const DEFAULT_MAX_ARGUMENT_LENGTH: usize = 8192;

/// Characters a shell would interpret. Reported, never rejected.
pub const SHELL_METACHARACTERS: &[char] = &[
    ';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r',
];

/// Bounds on the arguments forwarded to a child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentLimits {
    pub max_arguments: usize,
    /// In bytes
    pub max_argument_length: usize,
}

impl Default for ArgumentLimits {
    fn default() -> Self {
        Self {
            max_arguments: DEFAULT_MAX_ARGUMENTS,
            max_argument_length: DEFAULT_MAX_ARGUMENT_LENGTH,
        }
    }
}

impl ArgumentLimits {
    pub fn validate(&self, args: &[String]) -> Result<()> {
        if args.len() > self.max_arguments {
            return Err(ArgumentLimitViolation::TooMany {
                max: self.max_arguments,
                got: args.len(),
            }
            .into());
        }

        if let Some(index) = args
            .iter()
            .position(|arg| arg.len() > self.max_argument_length)
        {
            return Err(ArgumentLimitViolation::TooLong {
                index,
                max: self.max_argument_length,
            }
            .into());
        }

        Ok(())
    }
}

/// Indices of arguments containing shell metacharacters
pub fn shell_metacharacter_args(args: &[String]) -> Vec<usize> {
    args.iter()
        .enumerate()
        .filter(|(_, arg)| arg.contains(SHELL_METACHARACTERS))
        .map(|(i, _)| i)
        .collect()
}

/// A command name and the arguments forwarded after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub command: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// A single `--` directly after the command name is dropped.
    pub fn new(command: impl Into<String>, mut args: Vec<String>) -> Self {
        if args.first().is_some_and(|a| a == "--") {
            debug!("Dropping '--' separator");
            args.remove(0);
        }
        Self {
            command: command.into(),
            args,
        }
    }

    /// First token is the command name, the rest are forwarded. `None` when
    /// there are no tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        let command = tokens.next()?;
        Some(Self::new(command, tokens.collect()))
    }
}
