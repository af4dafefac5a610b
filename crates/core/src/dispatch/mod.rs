//! Resolution and execution of a single `tb <command>` invocation
//!
//! Steps run strictly in order: resolve the context, validate the forwarded
//! arguments, look the command up, then execute (or stop there on dry runs).

pub mod args;

pub use args::{
    ArgumentLimits, CommandLine, DEFAULT_MAX_ARGUMENT_LENGTH, DEFAULT_MAX_ARGUMENTS,
    SHELL_METACHARACTERS, shell_metacharacter_args,
};

use crate::{
    context::Detector,
    error::Result,
    executor::{CommandExecutor, Invocation},
    plugin::PluginManager,
    registry::CommandRegistry,
    types::{ContextTable, Detection},
};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;
use tracing::{debug, warn};

/// Everything the caller decided for one invocation
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub command_line: CommandLine,
    pub working_dir: PathBuf,
    pub forced_context: Option<String>,
    pub dry_run: bool,
    pub timeout: Duration,
}

/// Outcome of steps 1 through 4: what would run, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub detection: Detection,
    pub command: String,
    pub invocation: Invocation,
    /// Indices into `invocation.args` of arguments with shell metacharacters
    pub suspicious_args: Vec<usize>,
}

impl Resolution {
    pub fn context(&self) -> &str {
        &self.detection.context
    }

    pub fn base_command(&self) -> &str {
        &self.invocation.base
    }

    pub fn args(&self) -> &[String] {
        &self.invocation.args
    }
}

#[derive(Debug)]
pub enum DispatchOutcome {
    DryRun(Resolution),
    Executed {
        resolution: Resolution,
        status: ExitStatus,
    },
}

impl DispatchOutcome {
    pub fn resolution(&self) -> &Resolution {
        match self {
            DispatchOutcome::DryRun(resolution) => resolution,
            DispatchOutcome::Executed { resolution, .. } => resolution,
        }
    }
}

/// Wires the collaborators of one invocation together
pub struct Dispatcher<'a> {
    plugins: &'a PluginManager,
    detector: &'a Detector,
    contexts: &'a ContextTable,
    executor: &'a dyn CommandExecutor,
    limits: ArgumentLimits,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        plugins: &'a PluginManager,
        detector: &'a Detector,
        contexts: &'a ContextTable,
        executor: &'a dyn CommandExecutor,
    ) -> Self {
        Self {
            plugins,
            detector,
            contexts,
            executor,
            limits: ArgumentLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ArgumentLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> ArgumentLimits {
        self.limits
    }

    /// Forced context, else the first plugin match in `dir`, else built-in
    /// marker detection walking up from `dir`.
    pub fn resolve_context(&self, dir: &Path, forced: Option<&str>) -> Result<Detection> {
        if let Some(context) = forced {
            debug!("Using forced context '{}'", context);
            return Ok(Detection::forced(context));
        }

        if let Some(found) = self.plugins.detect_context(dir) {
            return Ok(Detection::plugin(found.context, found.plugin));
        }

        self.detector.detect(dir).map(Detection::builtin)
    }

    /// Everything up to execution
    pub fn resolve(&self, request: &DispatchRequest) -> Result<Resolution> {
        let detection =
            self.resolve_context(&request.working_dir, request.forced_context.as_deref())?;
        debug!("Active context: {}", detection);

        let args = &request.command_line.args;
        self.limits.validate(args)?;

        let suspicious_args = shell_metacharacter_args(args);
        for &index in &suspicious_args {
            warn!(
                "Argument {} contains shell metacharacters and will be passed literally: {:?}",
                index, args[index]
            );
        }

        let command = &request.command_line.command;
        let base = CommandRegistry::new(self.contexts).get_command(&detection.context, command)?;

        Ok(Resolution {
            detection,
            command: command.clone(),
            invocation: Invocation::new(base, args.clone()),
            suspicious_args,
        })
    }

    pub fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchOutcome> {
        let resolution = self.resolve(request)?;

        if request.dry_run {
            return Ok(DispatchOutcome::DryRun(resolution));
        }

        self.run(resolution, request.timeout)
    }

    /// Execute an already resolved invocation
    pub fn run(&self, resolution: Resolution, timeout: Duration) -> Result<DispatchOutcome> {
        let status = self.executor.execute(&resolution.invocation, timeout)?;
        Ok(DispatchOutcome::Executed { resolution, status })
    }
}
