//! Configuration layering for toolbox
//!
//! Implements the hierarchy: built-in defaults -> user-global -> project-local.
//! An explicit `--config` file takes the place of the global and local files.

use super::{Config, validation::validate_config_path};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = ".toolbox.json";

/// `~/.toolbox/config.json`, if a home directory is known
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".toolbox").join("config.json"))
}

/// Which files contributed to the merged configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigInfo {
    pub explicit_config_path: Option<PathBuf>,
    pub global_config_path: Option<PathBuf>,
    pub local_config_path: Option<PathBuf>,
}

impl ConfigInfo {
    /// Files in the order they were applied
    pub fn loaded_files(&self) -> Vec<&Path> {
        [
            &self.global_config_path,
            &self.local_config_path,
            &self.explicit_config_path,
        ]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .collect()
    }
}

#[derive(Debug, Default)]
pub struct ConfigMerger {
    global_config: Option<Config>,
    local_config: Option<Config>,
    explicit_config: Option<Config>,
    config_info: ConfigInfo,
}

impl ConfigMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the layers relevant to `cwd`. `explicit` is resolved against
    /// `cwd` after path validation.
    pub fn load(&mut self, explicit: Option<&Path>, cwd: &Path) -> Result<()> {
        self.load_with_global(explicit, cwd, global_config_path().as_deref())
    }

    /// Same as [`ConfigMerger::load`] with the global file location supplied
    /// by the caller.
    pub fn load_with_global(
        &mut self,
        explicit: Option<&Path>,
        cwd: &Path,
        global: Option<&Path>,
    ) -> Result<()> {
        if let Some(explicit) = explicit {
            validate_config_path(explicit)?;
            let path = cwd.join(explicit);
            debug!("Loading explicit config from {:?}", path);
            self.explicit_config = Some(Config::load_from_file(&path)?);
            self.config_info.explicit_config_path = Some(path);
            return Ok(());
        }

        if let Some(global) = global.filter(|p| p.is_file()) {
            debug!("Found global config at {:?}", global);
            self.global_config = Some(Config::load_from_file(global)?);
            self.config_info.global_config_path = Some(global.to_path_buf());
        }

        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            debug!("Found local config at {:?}", local);
            self.local_config = Some(Config::load_from_file(&local)?);
            self.config_info.local_config_path = Some(local);
        }

        Ok(())
    }

    /// Defaults overlaid with every loaded layer
    pub fn get_merged_config(&self) -> Config {
        let mut config = Config::defaults();

        for layer in [&self.global_config, &self.local_config, &self.explicit_config]
            .into_iter()
            .flatten()
        {
            config.merge_from(layer.clone());
        }

        config
    }

    pub fn config_info(&self) -> &ConfigInfo {
        &self.config_info
    }
}

/// Load and merge configuration for `cwd` in one step
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<(Config, ConfigInfo)> {
    let mut merger = ConfigMerger::new();
    merger.load(explicit, cwd)?;
    Ok((merger.get_merged_config(), merger.config_info.clone()))
}
