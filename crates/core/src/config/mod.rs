//! Configuration management for toolbox

pub mod merge;
mod settings;
pub mod validation;

// Re-export main types
pub use merge::{ConfigInfo, ConfigMerger, LOCAL_CONFIG_FILE, global_config_path, load_config};
pub use settings::{Config, DEFAULT_COMMAND_TIMEOUT, Settings};
pub use validation::{validate_config, validate_config_path};
