pub mod formatter;

pub use formatter::{render_commands, render_plugin_table, render_resolution};
