//! Size and content checks applied to configuration before it is used

use crate::error::{Error, Result};
use std::path::{Component, Path};

use super::Config;

/// Largest config file that will be read
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Longest accepted invocation string
pub const MAX_COMMAND_LENGTH: usize = 4096;
pub const MAX_CONTEXTS: usize = 100;
pub const MAX_COMMANDS_PER_CONTEXT: usize = 50;
pub const MAX_NAME_LENGTH: usize = 50;

/// Check limits and names across the whole configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.contexts.len() > MAX_CONTEXTS {
        return Err(Error::ConfigError(format!(
            "too many contexts (max: {}, got: {})",
            MAX_CONTEXTS,
            config.contexts.len()
        )));
    }

    for (context_name, context) in &config.contexts {
        validate_context_name(context_name)
            .map_err(|e| Error::ConfigError(format!("invalid context name {context_name:?}: {e}")))?;

        if context.commands.len() > MAX_COMMANDS_PER_CONTEXT {
            return Err(Error::ConfigError(format!(
                "context {:?} has too many commands (max: {}, got: {})",
                context_name,
                MAX_COMMANDS_PER_CONTEXT,
                context.commands.len()
            )));
        }

        for (command_name, invocation) in &context.commands {
            validate_command(command_name, invocation).map_err(|e| {
                Error::ConfigError(format!(
                    "context {context_name:?}, command {command_name:?}: {e}"
                ))
            })?;
        }
    }

    if config.settings.max_arguments == Some(0) {
        return Err(Error::ConfigError(
            "settings.max_arguments must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// A `--config` path must be relative, stay below the working directory and
/// name a `.json` file.
pub fn validate_config_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::ConfigError("empty config path".to_string()));
    }
    if path.is_absolute() {
        return Err(Error::ConfigError(
            "absolute paths not allowed, use a relative path or ~/.toolbox/config.json".to_string(),
        ));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(Error::ConfigError(
            "directory traversal not allowed".to_string(),
        ));
    }
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(Error::ConfigError(
            "config file must have a .json extension".to_string(),
        ));
    }
    Ok(())
}

fn validate_context_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("empty context name".to_string());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(format!("context name too long (max {MAX_NAME_LENGTH} characters)"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("context name contains invalid character {bad:?}"));
    }
    Ok(())
}

fn validate_command(name: &str, invocation: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("empty command name".to_string());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err("command name too long".to_string());
    }
    if invocation.trim().is_empty() {
        return Err("empty command string".to_string());
    }
    if invocation.len() > MAX_COMMAND_LENGTH {
        return Err(format!(
            "command string exceeds maximum length of {MAX_COMMAND_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContextConfig, ContextTable};

    fn config_with(name: &str, context: ContextConfig) -> Config {
        Config {
            contexts: ContextTable::from([(name.to_string(), context)]),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&Config::defaults()).is_ok());
    }

    #[test]
    fn test_context_names() {
        let ok = ContextConfig::new().with_command("build", "make");
        assert!(validate_config(&config_with("my_ctx-2", ok.clone())).is_ok());
        assert!(validate_config(&config_with("", ok.clone())).is_err());
        assert!(validate_config(&config_with("bad name", ok.clone())).is_err());
        assert!(validate_config(&config_with("a:b", ok.clone())).is_err());
        assert!(validate_config(&config_with(&"x".repeat(51), ok)).is_err());
    }

    #[test]
    fn test_command_limits() {
        let empty = ContextConfig::new().with_command("build", "");
        assert!(validate_config(&config_with("go", empty)).is_err());

        let long = ContextConfig::new().with_command("build", &"a".repeat(MAX_COMMAND_LENGTH + 1));
        assert!(validate_config(&config_with("go", long)).is_err());

        let mut many = ContextConfig::new();
        for i in 0..=MAX_COMMANDS_PER_CONTEXT {
            many = many.with_command(&format!("c{i}"), "true");
        }
        let err = validate_config(&config_with("go", many)).unwrap_err();
        assert!(err.to_string().contains("too many commands"));
    }

    #[test]
    fn test_too_many_contexts() {
        let mut config = Config::default();
        for i in 0..=MAX_CONTEXTS {
            config.contexts.insert(
                format!("ctx{i}"),
                ContextConfig::new().with_command("build", "make"),
            );
        }
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_max_arguments_rejected() {
        let mut config = Config::defaults();
        config.settings.max_arguments = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_path_rules() {
        assert!(validate_config_path(Path::new("custom.json")).is_ok());
        assert!(validate_config_path(Path::new("conf/team.json")).is_ok());
        assert!(validate_config_path(Path::new("")).is_err());
        assert!(validate_config_path(Path::new("/etc/toolbox.json")).is_err());
        assert!(validate_config_path(Path::new("../other/toolbox.json")).is_err());
        assert!(validate_config_path(Path::new("toolbox.yaml")).is_err());
    }
}
