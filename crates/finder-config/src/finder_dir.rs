//! Discovery and management of the `.finder/` directory.
//!
//! The `.finder/` directory holds a project's search defaults
//! (`config.yaml`, optionally `config.toml`) and saved search profiles
//! (`profiles/`). It is found by walking up from the working directory,
//! the way version control tools find their metadata directory.

use crate::config::ConfigError;
use std::path::{Path, PathBuf};

/// The name of the finder metadata directory.
pub const FINDER_DIR_NAME: &str = ".finder";

/// The name of the environment variable that can override the finder directory.
pub const FINDER_DIR_ENV: &str = "FINDER_DIR";

/// Main configuration file inside `.finder/`.
pub const CONFIG_FILE: &str = "config.yaml";

/// Optional TOML overrides inside `.finder/`.
pub const CONFIG_TOML_FILE: &str = "config.toml";

/// Directory of saved search profiles inside `.finder/`.
pub const PROFILES_DIR: &str = "profiles";

/// Walk up the directory tree from `start` looking for a `.finder/` directory.
///
/// The `FINDER_DIR` environment variable is checked first and wins when it
/// names an existing directory. Returns `None` if the filesystem root is
/// reached without finding one.
///
/// # Examples
///
/// ```no_run
/// use finder_config::finder_dir::find_finder_dir;
/// use std::path::Path;
///
/// if let Some(dir) = find_finder_dir(Path::new(".")) {
///     println!("Found finder dir at {}", dir.display());
/// }
/// ```
pub fn find_finder_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(FINDER_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(FINDER_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Ensure a `.finder/` directory (with its `profiles/` subdirectory) exists
/// at the given path.
///
/// If `path` itself is not called `.finder`, a `.finder/` subdirectory is
/// created under it. Returns the path to the `.finder/` directory.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if directory creation fails.
pub fn ensure_finder_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let finder_dir = if path.ends_with(FINDER_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(FINDER_DIR_NAME)
    };

    std::fs::create_dir_all(profiles_dir(&finder_dir))?;
    Ok(finder_dir)
}

/// Where profiles live for a given `.finder/` directory.
pub fn profiles_dir(finder_dir: &Path) -> PathBuf {
    finder_dir.join(PROFILES_DIR)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_finder_dir_in_temp() {
        let dir = tempfile::tempdir().unwrap();
        let finder = dir.path().join(".finder");
        std::fs::create_dir(&finder).unwrap();

        let found = find_finder_dir(dir.path()).unwrap().canonicalize().unwrap();
        assert_eq!(found, finder.canonicalize().unwrap());
    }

    #[test]
    fn test_find_finder_dir_in_child() {
        let dir = tempfile::tempdir().unwrap();
        let finder = dir.path().join(".finder");
        std::fs::create_dir(&finder).unwrap();

        let child = dir.path().join("notes").join("2024");
        std::fs::create_dir_all(&child).unwrap();

        let found = find_finder_dir(&child).unwrap().canonicalize().unwrap();
        assert_eq!(found, finder.canonicalize().unwrap());
    }

    #[test]
    fn test_find_finder_dir_missing_start() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_finder_dir(&dir.path().join("does-not-exist")).is_none());
    }

    #[test]
    fn test_ensure_finder_dir_creates_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let result = ensure_finder_dir(dir.path()).unwrap();
        assert!(result.ends_with(".finder"));
        assert!(profiles_dir(&result).is_dir());
    }

    #[test]
    fn test_ensure_finder_dir_already_named_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let finder = dir.path().join(".finder");
        let first = ensure_finder_dir(&finder).unwrap();
        let second = ensure_finder_dir(&finder).unwrap();
        assert_eq!(first, finder);
        assert_eq!(first, second);
    }
}
