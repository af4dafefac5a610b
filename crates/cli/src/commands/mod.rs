pub mod complete;
pub mod help;
pub mod plugin;
pub mod run;
pub mod status;

pub use complete::complete_command;
pub use help::{help_command, usage_command};
pub use plugin::plugin_command;
pub use run::run_command;
pub use status::status_command;
