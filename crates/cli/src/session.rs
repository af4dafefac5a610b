//! Per-invocation state: loaded config, plugins and the merged context table

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use toolbox_core::{
    CommandRegistry, ContextTable, Detection, Detector, Dispatcher, PluginManager, SecureExecutor,
    config::{ConfigInfo, load_config},
    dispatch::ArgumentLimits,
};

use crate::cli::GlobalArgs;

pub struct Session {
    pub cwd: PathBuf,
    pub global: GlobalArgs,
    pub config_info: ConfigInfo,
    pub plugins: PluginManager,
    pub detector: Detector,
    pub contexts: ContextTable,
    pub limits: ArgumentLimits,
    pub timeout: Duration,
    executor: SecureExecutor,
}

impl Session {
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_info) =
            load_config(global.config.as_deref(), &cwd).context("Failed to load configuration")?;

        let plugins =
            PluginManager::with_builtin_plugins().context("Failed to register built-in plugins")?;

        let mut contexts = config.contexts.clone();
        plugins.merge_into(&mut contexts);
        debug!("{} contexts available", contexts.len());

        let timeout = match global.timeout {
            Some(timeout) => timeout,
            None => config
                .timeout()
                .context("Invalid timeout in configuration")?,
        };

        Ok(Self {
            cwd,
            global: global.clone(),
            config_info,
            plugins,
            detector: Detector::new(),
            contexts,
            limits: config.argument_limits(),
            timeout,
            executor: SecureExecutor::new(),
        })
    }

    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(&self.plugins, &self.detector, &self.contexts, &self.executor)
            .with_limits(self.limits)
    }

    pub fn registry(&self) -> CommandRegistry<'_> {
        CommandRegistry::new(&self.contexts)
    }

    /// Context for the working directory, honoring `--context`
    pub fn active_context(&self) -> toolbox_core::Result<Detection> {
        self.dispatcher()
            .resolve_context(&self.cwd, self.global.context.as_deref())
    }
}
