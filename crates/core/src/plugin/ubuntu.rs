//! Ubuntu/Debian packaging workflows

use super::{Plugin, file_exists};
use crate::types::{ContextConfig, ContextTable};
use std::path::{Path, PathBuf};
use tracing::debug;

const HELPER_SCRIPT: &str = "ubuntu_helpers.sh";

/// Debian packaging trees (a `debian/` directory with control or changelog)
#[derive(Debug, Clone)]
pub struct UbuntuPlugin {
    name: String,
    version: String,
}

impl Default for UbuntuPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl UbuntuPlugin {
    pub fn new() -> Self {
        Self {
            name: "ubuntu".to_string(),
            version: "1.0.0".to_string(),
        }
    }

    /// Locate the helper script: the installed copy under `~/.toolbox/scripts`,
    /// then `scripts/` next to the executable, else the bare file name.
    pub fn helper_script_path() -> PathBuf {
        let installed = dirs::home_dir()
            .map(|home| home.join(".toolbox").join("scripts").join(HELPER_SCRIPT))
            .filter(|path| path.is_file());

        let beside_exe = || {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(|dir| dir.join("scripts").join(HELPER_SCRIPT)))
                .filter(|path| path.is_file())
        };

        installed
            .or_else(beside_exe)
            .unwrap_or_else(|| PathBuf::from(HELPER_SCRIPT))
    }
}

impl Plugin for UbuntuPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn contexts(&self) -> ContextTable {
        let script = Self::helper_script_path();
        debug!("Ubuntu helper script resolved to {:?}", script);
        // Paths with spaces would be split by the executor
        let helper = |action: &str| format!("bash {} {action}", script.display());

        let packaging = ContextConfig::new()
            .with_command("gbranch", &helper("gbranch"))
            .with_command("ppa-status", &helper("ppa-status"))
            .with_command("dch-auto", &helper("dch-auto"))
            .with_command("ubuild", &helper("ubuild"))
            .with_command("sb-auto", &helper("sb-auto"))
            .with_command("dput-auto", &helper("dput-auto"))
            .with_command("dch", "dch -i")
            .with_command("dch-release", "dch -r")
            .with_command("build", "dpkg-buildpackage -us -uc")
            .with_command("build-source", "dpkg-buildpackage -S -us -uc")
            .with_command("changelog", "dpkg-parsechangelog")
            .with_command("version", "dpkg-parsechangelog -S Version")
            .with_command("clean", "debian/rules clean")
            .with_command("distclean", "fakeroot debian/rules clean")
            .with_command("lint", "lintian")
            .with_command("lint-pedantic", "lintian --pedantic")
            .with_description(
                "gbranch",
                "Create/checkout git branch: gbranch <project> <bug-id> [merge|sru|bug] [description]",
            )
            .with_description("ppa-status", "Show PPA information from current branch")
            .with_description(
                "dch-auto",
                "Auto-update changelog with version suffix from current branch",
            )
            .with_description("dch", "Add new changelog entry manually")
            .with_description("dch-release", "Mark changelog entry as released")
            .with_description("ubuild", "Complete build and upload workflow (sb-auto + dput-auto)")
            .with_description("sb-auto", "Build source package with sbuild for detected release")
            .with_description("dput-auto", "Upload to PPA inferred from current branch")
            .with_description("build", "Build binary package (dpkg-buildpackage)")
            .with_description("build-source", "Build source package only")
            .with_description("changelog", "Display full changelog")
            .with_description("version", "Show current package version")
            .with_description("clean", "Clean build artifacts")
            .with_description("distclean", "Deep clean (using fakeroot)")
            .with_description("lint", "Run lintian on built packages")
            .with_description(
                "lint-pedantic",
                "Run lintian --pedantic on the given .dsc or .changes file",
            );

        ContextTable::from([("ubuntu-packaging".to_string(), packaging)])
    }

    fn detect(&self, dir: &Path) -> Option<String> {
        let debian = dir.join("debian");
        (file_exists(&debian.join("control")) || file_exists(&debian.join("changelog")))
            .then(|| "ubuntu-packaging".to_string())
    }
}
