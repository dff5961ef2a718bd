//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds all the state a command handler needs:
//! global flags, the working directory, where the `.finder/` directory
//! lives, and the slot through which Ctrl+C reaches a running search.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use finder_config::config::ConfigError;
use finder_config::finder_dir::FINDER_DIR_NAME;
use finder_config::profile;
use finder_config::{FinderConfig, SearchProfile, find_finder_dir};
use finder_search::CancelToken;

use crate::cli::GlobalArgs;

/// Cancellation flag of the search currently running, if any. Shared
/// between the context and the Ctrl+C handler.
pub type ActiveSearch = Arc<Mutex<Option<CancelToken>>>;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Explicit `.finder/` directory from `--dir` or `FINDER_DIR`.
    pub finder_dir: Option<PathBuf>,

    /// Directory the command was started in.
    pub cwd: PathBuf,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,

    /// Search a Ctrl+C should cancel.
    pub active_search: ActiveSearch,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    pub fn from_global_args(global: &GlobalArgs, active_search: ActiveSearch) -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            finder_dir: global.dir.clone(),
            cwd,
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
            active_search,
        }
    }

    /// Register the search the first Ctrl+C should cancel, or clear it
    /// with `None`.
    pub fn track_search(&self, token: Option<CancelToken>) {
        if let Ok(mut active) = self.active_search.lock() {
            *active = token;
        }
    }

    /// Whether human-oriented progress and hints should be printed.
    pub fn chatty(&self) -> bool {
        !self.json && !self.quiet
    }

    /// The `.finder/` directory in effect, if any.
    ///
    /// An explicit directory wins; otherwise one is searched for upward from
    /// the working directory.
    pub fn resolve_finder_dir(&self) -> Option<PathBuf> {
        match &self.finder_dir {
            Some(dir) => Some(self.absolute(dir)),
            None => find_finder_dir(&self.cwd),
        }
    }

    /// Like [`resolve_finder_dir`](Self::resolve_finder_dir), but the
    /// directory must exist.
    pub fn require_finder_dir(&self) -> Result<PathBuf> {
        match self.resolve_finder_dir() {
            Some(dir) if dir.is_dir() => Ok(dir),
            _ => Err(ConfigError::FinderDirNotFound.into()),
        }
    }

    /// Where `finder init` should create the `.finder/` directory.
    pub fn init_target(&self) -> PathBuf {
        match &self.finder_dir {
            Some(dir) => self.absolute(dir),
            None => self.cwd.join(FINDER_DIR_NAME),
        }
    }

    /// Effective configuration: the project's layered config when a
    /// `.finder/` directory exists, built-in defaults otherwise.
    pub fn load_config(&self) -> Result<FinderConfig> {
        let config = match self.resolve_finder_dir().filter(|d| d.is_dir()) {
            Some(dir) => finder_config::load_config(&dir)
                .with_context(|| format!("failed to load config from {}", dir.display()))?,
            None => finder_config::load_default_config()?,
        };
        Ok(config)
    }

    /// Resolve `--profile`: a path to a profile file, or a saved profile name.
    pub fn find_profile(&self, name: &str) -> Result<SearchProfile> {
        let explicit = self.finder_dir.as_deref().map(|dir| self.absolute(dir));
        Ok(profile::find_profile(name, &self.cwd, explicit.as_deref())?)
    }

    /// Display form of `path`: relative to the working directory when that
    /// is shorter.
    pub fn display_path(&self, path: &Path) -> String {
        let shown = match path.strip_prefix(&self.cwd) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => path,
        };
        let shown = shown.strip_prefix(".").unwrap_or(shown);
        shown.display().to_string()
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
