//! Configuration types and loading for the finder tool.
//!
//! The main entry point is [`FinderConfig`], the search defaults stored in
//! `.finder/config.yaml`. [`load_config`] layers built-in defaults, the YAML
//! file, an optional `config.toml` and `FINDER_*` environment variables;
//! [`save_config`] writes the YAML file back atomically.

use std::io::Write;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use finder_search::{DEFAULT_EXTENSIONS, DEFAULT_SNIPPET_LENGTH, SearchMode, normalize_extensions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::finder_dir::{CONFIG_FILE, CONFIG_TOML_FILE};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration or profile file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// A YAML file was invalid.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// A TOML file was invalid.
    #[error("failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A value could not be written as TOML.
    #[error("failed to write TOML: {0}")]
    TomlWriteError(#[from] toml::ser::Error),

    /// A JSON file was invalid.
    #[error("failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The layered configuration could not be extracted.
    #[error("invalid configuration: {0}")]
    ExtractError(#[from] figment::Error),

    /// The `.finder/` directory was not found.
    #[error("no .finder directory found (run 'finder init' first)")]
    FinderDirNotFound,

    /// The key is not a known configuration setting.
    #[error("unknown configuration key '{0}' (known keys: {keys})", keys = CONFIG_KEYS.join(", "))]
    UnknownKey(String),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },

    /// No saved profile with this name exists.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    /// A profile name or file was unusable.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// Settings every key of [`FinderConfig`] can be addressed by.
pub const CONFIG_KEYS: [&str; 6] = [
    "extensions",
    "mode",
    "unique",
    "result-limit",
    "snippet-length",
    "strict",
];

/// Default maximum characters shown for one result.
pub const DEFAULT_RESULT_LIMIT: usize = 1024;

/// Search defaults, corresponding to `.finder/config.yaml`.
///
/// Every field has a default so a partial file deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FinderConfig {
    /// File extensions searched when none are given on the command line.
    pub extensions: Vec<String>,

    /// Line or document matching.
    pub mode: SearchMode,

    /// Report only first occurrences.
    pub unique: bool,

    /// Longest result text shown before it is cut with `...`.
    pub result_limit: usize,

    /// Characters of a document shown for a document-mode match.
    pub snippet_length: usize,

    /// Refuse formulas that can never match unless forced.
    pub strict: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            mode: SearchMode::Line,
            unique: false,
            result_limit: DEFAULT_RESULT_LIMIT,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            strict: true,
        }
    }
}

impl FinderConfig {
    /// Configured extensions, cleaned up.
    pub fn normalized_extensions(&self) -> Vec<String> {
        normalize_extensions(&self.extensions)
    }

    /// Check value ranges serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.result_limit < 4 {
            return Err(ConfigError::invalid_value(
                "result-limit",
                "must be at least 4",
            ));
        }
        if self.snippet_length == 0 {
            return Err(ConfigError::invalid_value(
                "snippet-length",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

/// Load configuration for the given `.finder/` directory.
///
/// Later sources override earlier ones: built-in defaults, `config.yaml`,
/// `config.toml`, then `FINDER_*` environment variables (`FINDER_RESULT_LIMIT`
/// sets `result-limit`). Missing files are skipped.
///
/// # Errors
///
/// Returns [`ConfigError::ExtractError`] if a source contains a bad value,
/// or [`ConfigError::InvalidValue`] if a value is out of range.
pub fn load_config(finder_dir: &Path) -> Result<FinderConfig> {
    let config: FinderConfig = figment(Some(finder_dir)).extract()?;
    config.validate()?;
    debug!(dir = %finder_dir.display(), "loaded configuration");
    Ok(config)
}

/// Configuration when no `.finder/` directory exists: defaults plus
/// environment overrides.
pub fn load_default_config() -> Result<FinderConfig> {
    let config: FinderConfig = figment(None).extract()?;
    config.validate()?;
    Ok(config)
}

fn figment(finder_dir: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(FinderConfig::default()));
    if let Some(dir) = finder_dir {
        figment = figment
            .merge(Yaml::file(dir.join(CONFIG_FILE)))
            .merge(Toml::file(dir.join(CONFIG_TOML_FILE)));
    }
    figment.merge(
        Env::prefixed("FINDER_")
            .ignore(&["dir", "log"])
            .map(|key| key.as_str().replace('_', "-").into()),
    )
}

/// Save configuration to `config.yaml` inside the given `.finder/` directory.
///
/// The directory is created if it does not exist. The file is replaced
/// atomically.
pub fn save_config(finder_dir: &Path, config: &FinderConfig) -> Result<()> {
    config.validate()?;
    let yaml = serde_yaml::to_string(config)?;
    write_atomic(&finder_dir.join(CONFIG_FILE), yaml.as_bytes())
}

/// Write `contents` to a temporary file next to `path`, then rename it over
/// `path`.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Key/value access
// ---------------------------------------------------------------------------

fn check_key(key: &str) -> Result<()> {
    if CONFIG_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(ConfigError::UnknownKey(key.to_string()))
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Look up one effective setting, formatted for display.
pub fn get_value(config: &FinderConfig, key: &str) -> Result<String> {
    check_key(key)?;
    let doc = serde_json::to_value(config)?;
    Ok(doc.get(key).map(display_value).unwrap_or_default())
}

/// All effective settings, in key order.
pub fn list_values(config: &FinderConfig) -> Result<Vec<(String, String)>> {
    CONFIG_KEYS
        .iter()
        .map(|key| Ok((key.to_string(), get_value(config, key)?)))
        .collect()
}

fn read_document(finder_dir: &Path) -> Result<serde_yaml::Mapping> {
    let path = finder_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(serde_yaml::Mapping::new());
    }
    let content = std::fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(serde_yaml::Mapping::new());
    }
    match serde_yaml::from_str(&content)? {
        serde_yaml::Value::Mapping(map) => Ok(map),
        serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
        _ => Err(ConfigError::invalid_value(
            CONFIG_FILE,
            "expected a mapping of settings",
        )),
    }
}

fn write_document(finder_dir: &Path, doc: serde_yaml::Mapping) -> Result<FinderConfig> {
    let value = serde_yaml::Value::Mapping(doc);
    let config: FinderConfig = serde_yaml::from_value(value.clone())?;
    config.validate()?;
    let yaml = serde_yaml::to_string(&value)?;
    write_atomic(&finder_dir.join(CONFIG_FILE), yaml.as_bytes())?;
    Ok(config)
}

/// Set `key` in `config.yaml`, leaving other keys as written.
///
/// `extensions` takes a comma separated list; other values are read as
/// YAML scalars. The resulting file is validated before it is written.
pub fn set_value(finder_dir: &Path, key: &str, value: &str) -> Result<FinderConfig> {
    check_key(key)?;
    let parsed = if key == "extensions" {
        serde_yaml::Value::Sequence(
            normalize_extensions(value.split(','))
                .into_iter()
                .map(serde_yaml::Value::String)
                .collect(),
        )
    } else {
        serde_yaml::from_str(value)
            .map_err(|e| ConfigError::invalid_value(key, e.to_string()))?
    };

    let mut doc = read_document(finder_dir)?;
    doc.insert(serde_yaml::Value::String(key.to_string()), parsed);
    write_document(finder_dir, doc).map_err(|e| match e {
        ConfigError::ParseError(err) => ConfigError::invalid_value(key, err.to_string()),
        other => other,
    })
}

/// Remove `key` from `config.yaml` so its default applies again.
///
/// Returns `false` if the key was not set.
pub fn unset_value(finder_dir: &Path, key: &str) -> Result<bool> {
    check_key(key)?;
    let mut doc = read_document(finder_dir)?;
    if doc.remove(key).is_none() {
        return Ok(false);
    }
    write_document(finder_dir, doc)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
