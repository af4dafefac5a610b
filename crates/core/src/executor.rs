//! Shell-free command execution with a deadline
//!
//! The configured invocation string is split on whitespace into a program and
//! its fixed arguments, caller arguments are appended as separate argv
//! entries, and the program is started directly. Nothing is ever handed to
//! `sh -c`, so metacharacters in caller arguments reach the child literally.
//!
//! Quoting is not understood: `echo 'a b'` becomes the two arguments `'a` and
//! `b'`. Commands that need shell features belong in a script.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// A resolved base command plus the caller's extra arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub base: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(base: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            base: base.into(),
            args,
        }
    }

    /// Program token and fixed arguments of the base command
    pub fn split(&self) -> Result<(&str, Vec<&str>)> {
        let mut parts = self.base.split_whitespace();
        let program = parts.next().ok_or(Error::EmptyCommand)?;
        Ok((program, parts.collect()))
    }

    /// Program and the complete argument vector: fixed arguments first, then
    /// the caller's arguments untouched.
    pub fn argv(&self) -> Result<(&str, Vec<&str>)> {
        let (program, mut args) = self.split()?;
        args.extend(self.args.iter().map(String::as_str));
        Ok((program, args))
    }

    /// Human readable form for dry runs and logs. Never executed.
    pub fn to_display_string(&self) -> String {
        let mut out = self.base.trim().to_string();
        for arg in &self.args {
            out.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                out.push_str(&format!("'{arg}'"));
            } else {
                out.push_str(arg);
            }
        }
        out
    }
}

/// Runs an [`Invocation`] to completion or until its deadline
pub trait CommandExecutor {
    fn execute(&self, invocation: &Invocation, timeout: Duration) -> Result<ExitStatus>;
}

/// Executes without a shell, with inherited stdio and environment
#[derive(Debug, Clone, Default)]
pub struct SecureExecutor {
    working_dir: Option<PathBuf>,
}

impl SecureExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Look `program` up on `PATH`. Tokens containing a path separator are
    /// resolved against the working directory instead.
    pub fn resolve_program(&self, program: &str) -> Result<PathBuf> {
        let found = match &self.working_dir {
            Some(dir) => which::which_in(program, std::env::var_os("PATH"), dir),
            None => which::which(program),
        };

        found.map_err(|source| Error::ProgramNotFound {
            program: program.to_string(),
            source,
        })
    }

    fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

impl CommandExecutor for SecureExecutor {
    fn execute(&self, invocation: &Invocation, timeout: Duration) -> Result<ExitStatus> {
        let (program, args) = invocation.argv()?;
        let program_path = self.resolve_program(program)?;

        debug!("Executing {:?} with args {:?} (timeout {:?})", program_path, args, timeout);

        let mut command = Command::new(&program_path);
        command
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = self.working_dir() {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| Error::ProcessIo {
            command: program.to_string(),
            source,
        })?;

        let waited = child.wait_timeout(timeout).map_err(|source| Error::ProcessIo {
            command: program.to_string(),
            source,
        })?;

        match waited {
            Some(status) if status.success() => Ok(status),
            Some(status) => Err(Error::ProcessExecutionFailed {
                command: program.to_string(),
                code: status.code(),
            }),
            None => {
                warn!("'{}' exceeded its {:?} deadline, killing it", program, timeout);
                if let Err(e) = child.kill() {
                    debug!("kill after timeout failed: {}", e);
                }
                // Reap so the child does not linger as a zombie
                if let Err(e) = child.wait() {
                    debug!("reaping after timeout failed: {}", e);
                }
                Err(Error::CommandTimedOut {
                    command: program.to_string(),
                    timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::TempDir;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_argv_appends_caller_args_unsplit() {
        let invocation = Invocation::new("go test ./...", args(&["-run", "Foo Bar"]));
        let (program, argv) = invocation.argv().unwrap();

        assert_eq!(program, "go");
        assert_eq!(argv, vec!["test", "./...", "-run", "Foo Bar"]);
    }

    #[test]
    fn test_split_collapses_whitespace() {
        let invocation = Invocation::new("  npm   run\tbuild ", vec![]);
        let (program, fixed) = invocation.split().unwrap();
        assert_eq!(program, "npm");
        assert_eq!(fixed, vec!["run", "build"]);
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        // Known limitation: quoted segments are split on their inner space
        let invocation = Invocation::new("echo 'hello world'", vec![]);
        let (_, argv) = invocation.argv().unwrap();
        assert_eq!(argv, vec!["'hello", "world'"]);
    }

    #[test]
    fn test_empty_command() {
        for base in ["", "   \t"] {
            let err = Invocation::new(base, vec![]).split().unwrap_err();
            assert!(matches!(err, Error::EmptyCommand));
            assert!(err.to_string().contains("empty"));
        }
    }

    #[test]
    fn test_display_string_quotes_spaced_args() {
        let invocation = Invocation::new("git commit", args(&["-m", "fix the thing"]));
        assert_eq!(invocation.to_display_string(), "git commit -m 'fix the thing'");
    }

    #[test]
    fn test_program_not_found() {
        let invocation = Invocation::new("this-command-absolutely-does-not-exist-anywhere", vec![]);
        let err = SecureExecutor::new()
            .execute(&invocation, Duration::from_secs(5))
            .unwrap_err();

        assert!(matches!(err, Error::ProgramNotFound { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_command() {
        let status = SecureExecutor::new()
            .execute(&Invocation::new("true", vec![]), Duration::from_secs(5))
            .unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_reports_exit_code() {
        let err = SecureExecutor::new()
            .execute(&Invocation::new("false", vec![]), Duration::from_secs(5))
            .unwrap_err();

        assert!(matches!(err, Error::ProcessExecutionFailed { code: Some(1), .. }));
        assert!(!err.is_timeout());
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = SecureExecutor::new()
            .execute(
                &Invocation::new("sleep", args(&["10"])),
                Duration::from_millis(100),
            )
            .unwrap_err();

        assert!(err.is_timeout(), "expected timeout, got {err}");
        assert!(err.to_string().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_metacharacters_stay_literal() {
        let temp_dir = TempDir::new().unwrap();
        let canary = temp_dir.path().join("canary.txt");
        let touch = format!("touch {}", canary.display());

        let attempts = [
            vec!["test".to_string(), format!("; {touch}")],
            vec![format!("test | {touch}")],
            vec![format!("$({touch})")],
            vec![format!("`{touch}`")],
            vec![format!("test && {touch}")],
        ];

        for attempt in attempts {
            let _ = SecureExecutor::new()
                .execute(&Invocation::new("echo", attempt.clone()), Duration::from_secs(5));
            assert!(
                !canary.exists(),
                "shell interpretation happened for {attempt:?}"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_metacharacters_arrive_as_single_argv_entries() {
        let temp_dir = TempDir::new().unwrap();
        let executor = SecureExecutor::new().with_working_dir(temp_dir.path());

        executor
            .execute(
                &Invocation::new("touch", args(&["a;b", "$(whoami)"])),
                Duration::from_secs(5),
            )
            .unwrap();

        assert!(temp_dir.path().join("a;b").exists());
        assert!(temp_dir.path().join("$(whoami)").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_multi_word_base_command() {
        let temp_dir = TempDir::new().unwrap();
        let executor = SecureExecutor::new().with_working_dir(temp_dir.path());

        executor
            .execute(
                &Invocation::new("mkdir -p", args(&["nested/deeper"])),
                Duration::from_secs(5),
            )
            .unwrap();

        assert!(temp_dir.path().join("nested/deeper").is_dir());
    }
}
