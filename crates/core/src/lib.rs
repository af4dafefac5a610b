//! toolbox - context-aware command dispatch
//!
//! This crate provides functionality to:
//! - Detect which kind of project a directory belongs to (built-in marker files or plugins)
//! - Map short command names to the right invocation for that project
//! - Execute the invocation without a shell, with bounded arguments and a deadline
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod plugin;
pub mod registry;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::Config;
pub use context::Detector;
pub use dispatch::{DispatchOutcome, DispatchRequest, Dispatcher, Resolution};
pub use executor::{CommandExecutor, Invocation, SecureExecutor};
pub use plugin::{Plugin, PluginManager};
pub use registry::CommandRegistry;
