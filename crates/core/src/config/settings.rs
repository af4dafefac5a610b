use crate::{
    dispatch::ArgumentLimits,
    error::{Error, Result},
    types::{ContextConfig, ContextTable},
    utils::parse_duration,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::validation::{MAX_CONFIG_FILE_SIZE, validate_config};

/// Default deadline for a dispatched command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// On-disk configuration: context tables plus dispatch settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub contexts: ContextTable,

    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,
}

/// Optional knobs; unset fields fall back to built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    /// Executor deadline, e.g. `"10m"` or `"90s"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_arguments: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_argument_length: Option<usize>,
}

impl Settings {
    pub fn is_empty(&self) -> bool {
        self.timeout.is_none() && self.max_arguments.is_none() && self.max_argument_length.is_none()
    }

    /// Field-by-field overlay; set fields in `other` win.
    pub fn merge_from(&mut self, other: Settings) {
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.max_arguments.is_some() {
            self.max_arguments = other.max_arguments;
        }
        if other.max_argument_length.is_some() {
            self.max_argument_length = other.max_argument_length;
        }
    }
}

impl Config {
    /// Read, size-check, parse and validate a config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| Error::ConfigError(format!("config file not accessible: {e}")))?;

        if !metadata.is_file() {
            return Err(Error::ConfigError(
                "config path must be a regular file".to_string(),
            ));
        }
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(Error::ConfigError(format!(
                "config file exceeds maximum size of {} bytes (got {} bytes)",
                MAX_CONFIG_FILE_SIZE,
                metadata.len()
            )));
        }

        let contents = std::fs::read_to_string(path)?;
        // serde_json errors can quote file content; only keep the position
        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!(
                "failed to parse config file: invalid JSON at line {} column {}",
                e.line(),
                e.column()
            ))
        })?;

        validate_config(&config)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Overlay `other` on top of `self`: contexts merge command by command,
    /// settings field by field.
    pub fn merge_from(&mut self, other: Config) {
        for (name, context) in other.contexts {
            self.contexts.entry(name).or_default().merge_from(context);
        }
        self.settings.merge_from(other.settings);
    }

    pub fn timeout(&self) -> Result<Duration> {
        match &self.settings.timeout {
            Some(raw) => parse_duration(raw),
            None => Ok(DEFAULT_COMMAND_TIMEOUT),
        }
    }

    pub fn argument_limits(&self) -> ArgumentLimits {
        let defaults = ArgumentLimits::default();
        ArgumentLimits {
            max_arguments: self.settings.max_arguments.unwrap_or(defaults.max_arguments),
            max_argument_length: self
                .settings
                .max_argument_length
                .unwrap_or(defaults.max_argument_length),
        }
    }

    /// Built-in contexts used when no file overrides them
    pub fn defaults() -> Self {
        let node = ContextConfig::new()
            .with_command("build", "npm run build")
            .with_command("test", "npm test")
            .with_command("start", "npm start")
            .with_command("dev", "npm run dev")
            .with_command("lint", "npm run lint")
            .with_command("install", "npm install");

        let go = ContextConfig::new()
            .with_command("build", "go build ./...")
            .with_command("test", "go test ./...")
            .with_command("run", "go run ./cmd/...")
            .with_command("install", "go mod download")
            .with_command("lint", "golangci-lint run")
            .with_command("fmt", "go fmt ./...");

        let python = ContextConfig::new()
            .with_command("test", "pytest")
            .with_command("lint", "ruff check .")
            .with_command("fmt", "black .")
            .with_command("install", "pip install -r requirements.txt")
            .with_command("run", "python main.py");

        let rust = ContextConfig::new()
            .with_command("build", "cargo build")
            .with_command("test", "cargo test")
            .with_command("run", "cargo run")
            .with_command("install", "cargo fetch")
            .with_command("lint", "cargo clippy")
            .with_command("fmt", "cargo fmt");

        let make = ContextConfig::new()
            .with_command("build", "make")
            .with_command("test", "make test")
            .with_command("clean", "make clean");

        Self {
            contexts: ContextTable::from([
                ("node".to_string(), node),
                ("go".to_string(), go),
                ("python".to_string(), python),
                ("rust".to_string(), rust),
                ("make".to_string(), make),
            ]),
            settings: Settings::default(),
        }
    }
}
