//! Command lookups over an assembled context table.
//!
//! The registry neither detects nor executes anything, so it can be exercised
//! with synthetic tables.

use crate::{
    error::{Error, Result},
    types::{ContextConfig, ContextTable},
};

pub struct CommandRegistry<'a> {
    contexts: &'a ContextTable,
}

impl<'a> CommandRegistry<'a> {
    pub fn new(contexts: &'a ContextTable) -> Self {
        Self { contexts }
    }

    pub fn context(&self, context: &str) -> Result<&'a ContextConfig> {
        self.contexts
            .get(context)
            .ok_or_else(|| Error::UnknownContext {
                context: context.to_string(),
            })
    }

    /// Invocation string for `command` in `context`
    pub fn get_command(&self, context: &str, command: &str) -> Result<&'a str> {
        self.context(context)?
            .command(command)
            .ok_or_else(|| Error::CommandUndefined {
                command: command.to_string(),
                context: context.to_string(),
            })
    }

    /// Command names of `context`, sorted
    pub fn list_commands(&self, context: &str) -> Result<Vec<&'a str>> {
        Ok(self
            .context(context)?
            .commands
            .keys()
            .map(String::as_str)
            .collect())
    }

    /// All context names, sorted
    pub fn list_contexts(&self) -> Vec<&'a str> {
        self.contexts.keys().map(String::as_str).collect()
    }

    pub fn description(&self, context: &str, command: &str) -> Option<&'a str> {
        self.contexts.get(context)?.description(command)
    }

    /// Every context defining `command`, sorted by context name
    pub fn contexts_defining(&self, command: &str) -> Vec<(&'a str, &'a ContextConfig)> {
        self.contexts
            .iter()
            .filter(|(_, ctx)| ctx.commands.contains_key(command))
            .map(|(name, ctx)| (name.as_str(), ctx))
            .collect()
    }
}
