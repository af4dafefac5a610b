use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::commands::{
    complete_command, help_command, plugin_command, run_command, status_command, usage_command,
};
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(name = "tb")]
#[command(version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags accepted before the command name
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Use this config file instead of ~/.toolbox/config.json and .toolbox.json
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip detection and use this context
    #[arg(long, global = true, value_name = "NAME")]
    pub context: Option<String>,

    /// Print what would run without executing it
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Print resolution details before executing
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Kill the command after this long (e.g. 90s, 10m, 1h30m)
    #[arg(short, long, global = true, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the active context, its commands and the config in use
    Status,
    /// Inspect compiled-in plugins
    #[command(subcommand)]
    Plugin(PluginCommands),
    /// Show what a command runs
    Help {
        /// Command name; omit for general usage
        command: Option<String>,
    },
    /// Print command names of the active context for shell completion
    #[command(hide = true)]
    Complete {
        /// Only list names starting with this
        prefix: Option<String>,
    },
    /// Any other name is looked up in the active context and run
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Subcommand, Debug)]
pub enum PluginCommands {
    /// List registered plugins
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one plugin and the commands it provides
    Info { name: String },
    /// Show every plugin context with its namespaced key
    Contexts,
}

fn parse_timeout(raw: &str) -> std::result::Result<Duration, String> {
    match toolbox_core::utils::parse_duration(raw) {
        Ok(duration) if duration.is_zero() => Err("timeout must be greater than zero".to_string()),
        Ok(duration) => Ok(duration),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    /// Execute the parsed command line
    pub fn execute(self) -> Result<()> {
        let session = Session::load(&self.global)?;

        match self.command {
            None => usage_command(&session),
            Some(Commands::Status) => status_command(&session),
            Some(Commands::Plugin(command)) => plugin_command(&session, command),
            Some(Commands::Help { command: None }) => usage_command(&session),
            Some(Commands::Help {
                command: Some(name),
            }) => help_command(&session, &name),
            Some(Commands::Complete { prefix }) => {
                complete_command(&session, prefix.as_deref().unwrap_or(""))
            }
            Some(Commands::External(tokens)) => run_command(&session, tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tb").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_external_command_args_are_verbatim() {
        let cli = parse(&["--dry-run", "build", "--verbose", "--", "--release"]);

        assert!(cli.global.dry_run);
        assert!(!cli.global.verbose);
        match cli.command {
            Some(Commands::External(tokens)) => {
                assert_eq!(tokens, vec!["build", "--verbose", "--", "--release"]);
            }
            other => panic!("expected external command, got {other:?}"),
        }
    }

    #[test]
    fn test_help_flag_after_command_is_forwarded() {
        let cli = parse(&["test", "--help"]);
        match cli.command {
            Some(Commands::External(tokens)) => assert_eq!(tokens, vec!["test", "--help"]),
            other => panic!("expected external command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["--context", "go", "--timeout", "1m30s", "--config", "team.json", "status"]);

        assert_eq!(cli.global.context.as_deref(), Some("go"));
        assert_eq!(cli.global.timeout, Some(Duration::from_secs(90)));
        assert_eq!(cli.global.config, Some(PathBuf::from("team.json")));
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        assert!(Cli::try_parse_from(["tb", "--timeout", "soon", "build"]).is_err());
        assert!(Cli::try_parse_from(["tb", "--timeout", "0s", "build"]).is_err());
    }

    #[test]
    fn test_plugin_subcommands() {
        assert!(matches!(
            parse(&["plugin", "list", "--json"]).command,
            Some(Commands::Plugin(PluginCommands::List { json: true }))
        ));
        assert!(matches!(
            parse(&["plugin", "info", "docker"]).command,
            Some(Commands::Plugin(PluginCommands::Info { ref name })) if name == "docker"
        ));
    }

    #[test]
    fn test_no_command() {
        assert!(parse(&[]).command.is_none());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
