use anyhow::{Context, Result};
use tracing::{debug, info};

use toolbox_core::dispatch::{CommandLine, DispatchRequest};
use toolbox_core::utils::format_duration;

use crate::display::render_resolution;
use crate::session::Session;

pub fn run_command(session: &Session, tokens: Vec<String>) -> Result<()> {
    let command_line = CommandLine::from_tokens(tokens).context("No command given")?;
    let command = command_line.command.clone();

    debug!("Running '{}' with args {:?}", command, command_line.args);

    let request = DispatchRequest {
        command_line,
        working_dir: session.cwd.clone(),
        forced_context: session.global.context.clone(),
        dry_run: session.global.dry_run,
        timeout: session.timeout,
    };

    let dispatcher = session.dispatcher();
    let resolution = dispatcher
        .resolve(&request)
        .with_context(|| format!("Cannot run '{command}'"))?;

    if session.global.verbose {
        for &index in &resolution.suspicious_args {
            eprintln!(
                "Warning: argument {} contains shell metacharacters and is passed literally: {:?}",
                index,
                resolution.args()[index]
            );
        }
    }

    if request.dry_run || session.global.verbose {
        println!("{}", render_resolution(&resolution));
        println!("Timeout: {}", format_duration(request.timeout));
    }
    if request.dry_run {
        return Ok(());
    }

    let shell_cmd = resolution.invocation.to_display_string();
    info!("Running: {}", shell_cmd);

    dispatcher
        .run(resolution, request.timeout)
        .with_context(|| format!("Failed to execute: {shell_cmd}"))?;

    Ok(())
}
