use anyhow::Result;

use crate::display::render_commands;
use crate::session::Session;

pub fn status_command(session: &Session) -> Result<()> {
    println!("Directory: {}", session.cwd.display());

    let files = session.config_info.loaded_files();
    if files.is_empty() {
        println!("Config: built-in defaults");
    } else {
        for file in files {
            println!("Config: {}", file.display());
        }
    }

    let detection = match session.active_context() {
        Ok(detection) => detection,
        Err(e) => {
            println!("Context: none ({e})");
            println!();
            println!(
                "Use --context <name> to pick one of: {}",
                session.registry().list_contexts().join(", ")
            );
            return Ok(());
        }
    };

    println!("Context: {detection}");
    println!();

    match session.registry().context(&detection.context) {
        Ok(context) if !context.commands.is_empty() => {
            println!("Available commands:");
            for line in render_commands(context).lines() {
                println!("  {line}");
            }
        }
        Ok(_) => println!("No commands defined for '{}'", detection.context),
        Err(e) => println!("{e}"),
    }

    let plugin_matches = session.plugins.detect_all_contexts(&session.cwd);
    let builtin_matches = session.detector.detect_all_in_directory(&session.cwd);

    let others: Vec<String> = plugin_matches
        .iter()
        .filter(|d| d.context != detection.context)
        .map(|d| format!("{} (plugin: {})", d.context, d.plugin))
        .chain(
            builtin_matches
                .into_iter()
                .filter(|name| *name != detection.context)
                .map(str::to_string),
        )
        .collect();

    if !others.is_empty() {
        println!();
        println!("Also detected: {}", others.join(", "));
    }

    Ok(())
}
