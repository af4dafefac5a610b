use anyhow::{Result, bail};
use clap::CommandFactory;
use tracing::debug;

use crate::cli::Cli;
use crate::display::render_commands;
use crate::session::Session;

/// General usage followed by the commands of the active context
pub fn usage_command(session: &Session) -> Result<()> {
    Cli::command().print_help()?;

    match session.active_context() {
        Ok(detection) => {
            println!();
            println!("Commands for {detection}:");
            match session.registry().context(&detection.context) {
                Ok(context) => {
                    for line in render_commands(context).lines() {
                        println!("  {line}");
                    }
                }
                Err(e) => println!("  {e}"),
            }
        }
        Err(e) => {
            debug!("No active context: {}", e);
            println!();
            println!("No project context detected here; pass --context <name> to choose one.");
        }
    }

    Ok(())
}

/// What `name` runs in the active context, or everywhere it is defined
pub fn help_command(session: &Session, name: &str) -> Result<()> {
    let registry = session.registry();

    if let Ok(detection) = session.active_context() {
        if let Ok(invocation) = registry.get_command(&detection.context, name) {
            println!("{name} ({detection})");
            println!("  Runs: {invocation}");
            if let Some(description) = registry.description(&detection.context, name) {
                println!("  {description}");
            }
            return Ok(());
        }
    }

    let defining = registry.contexts_defining(name);
    if defining.is_empty() {
        bail!("command '{name}' is not defined in any context");
    }

    println!("'{name}' is not available in the active context. Defined in:");
    for (context_name, context) in defining {
        let invocation = context.command(name).unwrap_or_default();
        match context.description(name) {
            Some(description) => println!("  {context_name}: {invocation}  ({description})"),
            None => println!("  {context_name}: {invocation}"),
        }
    }

    Ok(())
}
