//! Plugin registration, detection and context aggregation

use super::{DockerPlugin, KubernetesPlugin, Plugin, UbuntuPlugin};
use crate::{
    error::{Error, Result},
    types::ContextTable,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Information recorded about a plugin when it is registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    pub enabled: bool,
    pub context_count: usize,
    pub contexts: Vec<String>,
}

/// A context claimed by a plugin's detector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDetection {
    pub context: String,
    pub plugin: String,
}

/// Holds registered plugins in registration order.
///
/// Constructed once per invocation and handed to whatever needs it; there is
/// no process-wide registry.
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
    metadata: HashMap<String, PluginMetadata>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager with the compiled-in plugins: docker, kubernetes, ubuntu.
    pub fn with_builtin_plugins() -> Result<Self> {
        let mut manager = Self::new();
        manager.register(Box::new(DockerPlugin::new()))?;
        manager.register(Box::new(KubernetesPlugin::new()))?;
        manager.register(Box::new(UbuntuPlugin::new()))?;
        Ok(manager)
    }

    /// Validate and register a plugin. A name collision leaves the already
    /// registered plugin in place.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        plugin.validate()?;

        let name = plugin.name().to_string();
        if self.metadata.contains_key(&name) {
            return Err(Error::PluginRegistrationConflict { name });
        }

        let contexts: Vec<String> = plugin.contexts().into_keys().collect();
        let metadata = PluginMetadata {
            name: name.clone(),
            version: plugin.version().to_string(),
            enabled: true,
            context_count: contexts.len(),
            contexts,
        };

        info!("Registered plugin {} v{}", metadata.name, metadata.version);
        self.metadata.insert(name, metadata);
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn plugins(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn metadata(&self, name: &str) -> Option<&PluginMetadata> {
        self.metadata.get(name)
    }

    /// Metadata for every plugin, in registration order
    pub fn all_metadata(&self) -> Vec<&PluginMetadata> {
        self.plugins
            .iter()
            .filter_map(|p| self.metadata.get(p.name()))
            .collect()
    }

    /// First plugin (in registration order) whose detector matches `dir`.
    pub fn detect_context(&self, dir: &Path) -> Option<PluginDetection> {
        self.plugins.iter().find_map(|plugin| {
            plugin.detect(dir).map(|context| {
                debug!("Plugin '{}' detected context '{}'", plugin.name(), context);
                PluginDetection {
                    context,
                    plugin: plugin.name().to_string(),
                }
            })
        })
    }

    /// Every plugin match for `dir`, in registration order.
    pub fn detect_all_contexts(&self, dir: &Path) -> Vec<PluginDetection> {
        self.plugins
            .iter()
            .filter_map(|plugin| {
                plugin.detect(dir).map(|context| PluginDetection {
                    context,
                    plugin: plugin.name().to_string(),
                })
            })
            .collect()
    }

    /// Union of all plugin contexts.
    ///
    /// Each context appears as `plugin:context`, and also under its bare name
    /// unless an earlier plugin already claimed that name.
    pub fn contexts(&self) -> ContextTable {
        let mut all = ContextTable::new();

        for plugin in &self.plugins {
            for (name, context) in plugin.contexts() {
                all.insert(format!("{}:{}", plugin.name(), name), context.clone());
                all.entry(name).or_insert(context);
            }
        }

        all
    }

    /// Add plugin contexts to a config-derived table. Entries already in
    /// `table` win over plugin entries with the same key.
    pub fn merge_into(&self, table: &mut ContextTable) {
        for (name, context) in self.contexts() {
            if table.contains_key(&name) {
                debug!("Config context '{}' shadows plugin context", name);
                continue;
            }
            table.insert(name, context);
        }
    }
}
