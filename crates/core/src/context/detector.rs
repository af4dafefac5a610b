use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Number of ancestors checked above the start directory.
///
/// Keeps the walk from wandering into unrelated trees such as `/home`.
pub const MAX_PARENT_LEVELS: usize = 3;

/// A built-in context and the marker files that identify it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextIdentity {
    pub name: String,
    pub markers: Vec<String>,
}

impl ContextIdentity {
    pub fn new(name: &str, markers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn matches(&self, dir: &Path) -> bool {
        self.markers.iter().any(|marker| is_file(&dir.join(marker)))
    }
}

/// Identifies the project context of a directory by its marker files.
///
/// Identities are kept in priority order: when one directory holds markers
/// for two identities, the earlier one wins.
#[derive(Debug, Clone)]
pub struct Detector {
    identities: Vec<ContextIdentity>,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    pub fn new() -> Self {
        Self {
            identities: vec![
                ContextIdentity::new(
                    "node",
                    &["package.json", "package-lock.json", "yarn.lock", "pnpm-lock.yaml"],
                ),
                ContextIdentity::new("go", &["go.mod", "go.sum"]),
                ContextIdentity::new(
                    "python",
                    &["pyproject.toml", "setup.py", "requirements.txt", "Pipfile"],
                ),
                ContextIdentity::new("rust", &["Cargo.toml", "Cargo.lock"]),
                ContextIdentity::new("java", &["pom.xml", "build.gradle", "build.gradle.kts"]),
                ContextIdentity::new("ruby", &["Gemfile", "Gemfile.lock"]),
                ContextIdentity::new("php", &["composer.json", "composer.lock"]),
                ContextIdentity::new("make", &["Makefile", "makefile"]),
            ],
        }
    }

    pub fn identities(&self) -> &[ContextIdentity] {
        &self.identities
    }

    /// Find the context for `start_dir`, looking at most
    /// [`MAX_PARENT_LEVELS`] directories up.
    pub fn detect(&self, start_dir: &Path) -> Result<String> {
        let start = absolute(start_dir)?;
        let mut current: &Path = &start;

        for level in 0..=MAX_PARENT_LEVELS {
            if let Some(context) = self.detect_in_directory(current) {
                debug!("Detected context '{}' in {:?} (level {})", context, current, level);
                return Ok(context.to_string());
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::ContextNotFound { dir: start })
    }

    /// First identity in priority order with a marker directly in `dir`.
    pub fn detect_in_directory(&self, dir: &Path) -> Option<&str> {
        self.identities
            .iter()
            .find(|identity| identity.matches(dir))
            .map(|identity| identity.name.as_str())
    }

    /// Every identity with a marker directly in `dir`, in priority order.
    pub fn detect_all_in_directory(&self, dir: &Path) -> Vec<&str> {
        self.identities
            .iter()
            .filter(|identity| identity.matches(dir))
            .map(|identity| identity.name.as_str())
            .collect()
    }

    /// Add a marker for `context`. Unknown contexts are appended with the
    /// lowest priority.
    pub fn add_marker(&mut self, context: &str, marker: &str) {
        match self.identities.iter_mut().find(|i| i.name == context) {
            Some(identity) => identity.markers.push(marker.to_string()),
            None => self.identities.push(ContextIdentity::new(context, &[marker])),
        }
    }
}

fn absolute(dir: &Path) -> Result<PathBuf> {
    std::path::absolute(dir).map_err(Error::from)
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| !m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_detect_each_identity_by_single_marker() {
        let cases = [
            ("package.json", "node"),
            ("yarn.lock", "node"),
            ("go.mod", "go"),
            ("requirements.txt", "python"),
            ("Pipfile", "python"),
            ("Cargo.toml", "rust"),
            ("build.gradle.kts", "java"),
            ("Gemfile", "ruby"),
            ("composer.json", "php"),
            ("Makefile", "make"),
            ("makefile", "make"),
        ];

        for (marker, expected) in cases {
            let temp_dir = TempDir::new().unwrap();
            touch(temp_dir.path(), marker);

            let detected = Detector::new().detect(temp_dir.path()).unwrap();
            assert_eq!(detected, expected, "marker {marker}");
        }
    }

    #[test]
    fn test_priority_prefers_earlier_identity() {
        let temp_dir = TempDir::new().unwrap();
        // Created in reverse priority order so directory order can't help
        touch(temp_dir.path(), "Makefile");
        touch(temp_dir.path(), "Cargo.toml");
        touch(temp_dir.path(), "go.mod");

        let detector = Detector::new();
        assert_eq!(detector.detect(temp_dir.path()).unwrap(), "go");

        touch(temp_dir.path(), "package.json");
        assert_eq!(detector.detect(temp_dir.path()).unwrap(), "node");
    }

    #[test]
    fn test_marker_directory_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("go.mod")).unwrap();

        let result = Detector::new().detect(temp_dir.path());
        assert!(matches!(result, Err(Error::ContextNotFound { .. })));
    }

    #[test]
    fn test_detect_within_three_parent_levels() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "go.mod");

        let mut dir = temp_dir.path().to_path_buf();
        for level in 0..=MAX_PARENT_LEVELS {
            fs::create_dir_all(&dir).unwrap();
            assert_eq!(
                Detector::new().detect(&dir).unwrap(),
                "go",
                "depth {level} should detect"
            );
            dir = dir.join(format!("l{}", level + 1));
        }
    }

    #[test]
    fn test_detect_fails_beyond_parent_limit() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "go.mod");

        let depth_four = temp_dir.path().join("l1").join("l2").join("l3").join("l4");
        let depth_five = depth_four.join("l5");
        fs::create_dir_all(&depth_five).unwrap();

        let detector = Detector::new();
        assert!(matches!(
            detector.detect(&depth_four),
            Err(Error::ContextNotFound { .. })
        ));
        assert!(matches!(
            detector.detect(&depth_five),
            Err(Error::ContextNotFound { .. })
        ));
    }

    #[test]
    fn test_no_context_reports_start_dir() {
        let temp_dir = TempDir::new().unwrap();
        let err = Detector::new().detect(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("no recognized project context"));
    }

    #[test]
    fn test_add_marker() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "justfile");

        let mut detector = Detector::new();
        assert_eq!(detector.detect_in_directory(temp_dir.path()), None);

        detector.add_marker("make", "justfile");
        assert_eq!(detector.detect_in_directory(temp_dir.path()), Some("make"));

        detector.add_marker("deno", "deno.json");
        assert_eq!(detector.identities().last().unwrap().name, "deno");
    }

    #[test]
    fn test_detect_all_in_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "Makefile");
        touch(temp_dir.path(), "pyproject.toml");

        let detector = Detector::new();
        let all = detector.detect_all_in_directory(temp_dir.path());
        assert_eq!(all, vec!["python", "make"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_stops_at_filesystem_root() {
        let root = Path::new("/");
        let err = Detector::new().detect(root).unwrap_err();

        assert!(matches!(err, Error::ContextNotFound { ref dir } if dir == root));
        insta::assert_snapshot!(err.to_string(), @"no recognized project context found in / or parent directories");
    }
}
