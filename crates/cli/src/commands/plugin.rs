use anyhow::{Context, Result, bail};

use crate::cli::PluginCommands;
use crate::display::{render_commands, render_plugin_table};
use crate::session::Session;

pub fn plugin_command(session: &Session, command: PluginCommands) -> Result<()> {
    match command {
        PluginCommands::List { json } => list_plugins(session, json),
        PluginCommands::Info { name } => plugin_info(session, &name),
        PluginCommands::Contexts => plugin_contexts(session),
    }
}

fn list_plugins(session: &Session, json: bool) -> Result<()> {
    let metadata = session.plugins.all_metadata();

    if json {
        let out = serde_json::to_string_pretty(&metadata)
            .context("Failed to serialize plugin metadata")?;
        println!("{out}");
        return Ok(());
    }

    if metadata.is_empty() {
        println!("No plugins registered");
        return Ok(());
    }

    println!("{}", render_plugin_table(&metadata));
    Ok(())
}

fn plugin_info(session: &Session, name: &str) -> Result<()> {
    let Some(plugin) = session.plugins.plugins().find(|p| p.name() == name) else {
        bail!("plugin '{name}' not found");
    };

    println!("Name: {}", plugin.name());
    println!("Version: {}", plugin.version());
    if let Some(metadata) = session.plugins.metadata(name) {
        println!("Enabled: {}", metadata.enabled);
    }

    for (context_name, context) in plugin.contexts() {
        println!();
        println!("Context: {context_name} ({}:{context_name})", plugin.name());
        for line in render_commands(&context).lines() {
            println!("  {line}");
        }
    }

    Ok(())
}

fn plugin_contexts(session: &Session) -> Result<()> {
    let contexts = session.plugins.contexts();
    if contexts.is_empty() {
        println!("No plugin contexts");
        return Ok(());
    }

    for (key, context) in &contexts {
        let shadowed = session.contexts.get(key) != Some(context);
        let marker = if shadowed { " (overridden by config)" } else { "" };
        println!("{key}: {} commands{marker}", context.commands.len());
    }

    Ok(())
}
