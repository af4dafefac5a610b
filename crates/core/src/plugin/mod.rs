//! Plugin interface for toolbox
//!
//! Plugins contribute extra contexts (each with its own commands) and decide
//! for themselves whether they apply to a directory. They are compiled in and
//! registered with a [`PluginManager`] before any detection happens.

use crate::{
    error::{Error, Result},
    types::ContextTable,
};
use std::path::Path;

pub mod builtin;
pub mod manager;
pub mod ubuntu;

pub use builtin::{DockerPlugin, KubernetesPlugin};
pub use manager::{PluginDetection, PluginManager, PluginMetadata};
pub use ubuntu::UbuntuPlugin;

/// Main plugin interface
pub trait Plugin: Send + Sync {
    /// Unique identifier, also used as the namespace prefix of its contexts
    fn name(&self) -> &str;

    /// Plugin version (semantic versioning recommended)
    fn version(&self) -> &str;

    /// Contexts this plugin provides, computed fresh on every call
    fn contexts(&self) -> ContextTable;

    /// Context name if this plugin applies to `dir`.
    ///
    /// Runs on every invocation, so implementations should only check for
    /// the existence of files.
    fn detect(&self, dir: &Path) -> Option<String>;

    /// Self-check run once at registration
    fn validate(&self) -> Result<()> {
        validate_plugin(self)
    }
}

/// Default validation shared by the built-in plugins
pub fn validate_plugin<P: Plugin + ?Sized>(plugin: &P) -> Result<()> {
    let fail = |reason: String| Error::PluginValidationFailed {
        name: plugin.name().to_string(),
        reason,
    };

    if plugin.name().is_empty() {
        return Err(fail("plugin name cannot be empty".to_string()));
    }
    if plugin.version().is_empty() {
        return Err(fail("plugin version cannot be empty".to_string()));
    }

    let contexts = plugin.contexts();
    if contexts.is_empty() {
        return Err(fail("plugin must provide at least one context".to_string()));
    }

    for (context_name, context) in &contexts {
        if context.commands.is_empty() {
            return Err(fail(format!("context \"{context_name}\" has no commands")));
        }
        for (command_name, invocation) in &context.commands {
            if invocation.trim().is_empty() {
                return Err(fail(format!(
                    "context \"{context_name}\", command \"{command_name}\" is empty"
                )));
            }
        }
    }

    Ok(())
}

pub(crate) fn file_exists(path: &Path) -> bool {
    path.metadata().map(|m| !m.is_dir()).unwrap_or(false)
}


#[cfg(test)]
mod tests {
    use super::testing::MarkerPlugin;
    use super::*;
    use crate::types::ContextConfig;

    #[test]
    fn test_validate_accepts_well_formed_plugin() {
        let plugin = MarkerPlugin::new("demo", "demo", "demo.txt");
        assert!(plugin.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_plugin_without_contexts() {
        let mut plugin = MarkerPlugin::new("demo", "demo", "demo.txt");
        plugin.contexts.clear();

        let err = plugin.validate().unwrap_err();
        assert!(matches!(err, Error::PluginValidationFailed { .. }));
        assert!(err.to_string().contains("at least one context"));
    }

    #[test]
    fn test_validate_rejects_context_without_commands() {
        let mut plugin = MarkerPlugin::new("demo", "demo", "demo.txt");
        plugin
            .contexts
            .insert("hollow".to_string(), ContextConfig::new());

        let err = plugin.validate().unwrap_err();
        assert!(err.to_string().contains("\"hollow\" has no commands"));
    }

    #[test]
    fn test_validate_rejects_empty_identity() {
        let mut plugin = MarkerPlugin::new("demo", "demo", "demo.txt");
        plugin.version.clear();
        assert!(plugin.validate().is_err());

        let mut plugin = MarkerPlugin::new("demo", "demo", "demo.txt");
        plugin.name.clear();
        assert!(plugin.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_command() {
        let mut plugin = MarkerPlugin::new("demo", "demo", "demo.txt");
        plugin.contexts.insert(
            "blank".to_string(),
            ContextConfig::new().with_command("build", "   "),
        );
        assert!(plugin.validate().is_err());
    }
}
