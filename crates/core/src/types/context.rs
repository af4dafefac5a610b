use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Context name -> commands for that context.
///
/// Ordered so that listings and help output are stable between runs.
pub type ContextTable = BTreeMap<String, ContextConfig>;

/// A named bucket of commands for one kind of project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContextConfig {
    /// Command name -> invocation string (e.g. `build` -> `go build ./...`)
    #[serde(default)]
    pub commands: BTreeMap<String, String>,

    /// Optional human readable text per command name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub descriptions: BTreeMap<String, String>,
}

impl ContextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper used by plugins and default tables
    pub fn with_command(mut self, name: &str, invocation: &str) -> Self {
        self.commands.insert(name.to_string(), invocation.to_string());
        self
    }

    pub fn with_description(mut self, name: &str, text: &str) -> Self {
        self.descriptions.insert(name.to_string(), text.to_string());
        self
    }

    pub fn command(&self, name: &str) -> Option<&str> {
        self.commands.get(name).map(String::as_str)
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.descriptions
            .get(name)
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }

    /// Overlay `other` on top of `self`, command by command.
    pub fn merge_from(&mut self, other: ContextConfig) {
        self.commands.extend(other.commands);
        self.descriptions.extend(other.descriptions);
    }
}
