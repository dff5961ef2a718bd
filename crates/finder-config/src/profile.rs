//! Saved search profiles.
//!
//! A profile captures phrases, a formula and search options under a name so
//! a search can be repeated with `finder search --profile <name>`. Profiles
//! live in `.finder/profiles/` as `<name>.toml` or `<name>.json`.

use std::path::{Path, PathBuf};

use finder_formula::PhraseSet;
use finder_search::{SearchMode, SearchParams, normalize_extensions};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ConfigError, Result, write_atomic};
use crate::finder_dir::{find_finder_dir, profiles_dir};

/// A named, reusable search.
///
/// Unset options fall back to the configuration defaults when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProfile {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub formula: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SearchMode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,

    // TOML needs tables after plain values.
    #[serde(default)]
    pub phrases: PhraseSet,
}

impl SearchProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Overlay this profile on `params`. Phrases are merged letter by letter;
    /// other options replace the current value only when set.
    pub fn apply(&self, params: &mut SearchParams) {
        params.phrases.merge(&self.phrases);
        if !self.formula.trim().is_empty() {
            params.formula = self.formula.clone();
        }
        if let Some(mode) = self.mode {
            params.mode = mode;
        }
        if !self.extensions.is_empty() {
            params.extensions = normalize_extensions(&self.extensions);
        }
        if !self.paths.is_empty() {
            params.paths = self.paths.clone();
        }
        if let Some(unique) = self.unique {
            params.unique = unique;
        }
    }
}

/// On-disk encodings for profiles, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Toml,
    Json,
}

impl ProfileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

/// Profile names become file names, so keep them simple.
pub fn validate_profile_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidProfile(format!(
            "name '{}' must be non-empty and use only letters, digits, '-' or '_'",
            name
        )))
    }
}

/// Read a profile file. A profile without a `name` takes the file stem.
pub fn load_profile(path: &Path) -> Result<SearchProfile> {
    let format = ProfileFormat::from_path(path).ok_or_else(|| {
        ConfigError::InvalidProfile(format!(
            "{}: expected a .toml or .json file",
            path.display()
        ))
    })?;
    let content = std::fs::read_to_string(path)?;
    let mut profile: SearchProfile = match format {
        ProfileFormat::Toml => toml::from_str(&content)?,
        ProfileFormat::Json => serde_json::from_str(&content)?,
    };
    if profile.name.is_empty() {
        if let Some(stem) = path.file_stem() {
            profile.name = stem.to_string_lossy().into_owned();
        }
    }
    Ok(profile)
}

fn profile_file(dir: &Path, name: &str) -> Option<PathBuf> {
    [ProfileFormat::Toml, ProfileFormat::Json]
        .iter()
        .map(|f| dir.join(format!("{}.{}", name, f.extension())))
        .find(|p| p.is_file())
}

/// Resolve a profile given on the command line.
///
/// `name` may be a path to a profile file (relative to `cwd`); otherwise it
/// is looked up in the profiles directory of `finder_dir`, or of the
/// `.finder/` found upward from `cwd` when no directory is given.
pub fn find_profile(name: &str, cwd: &Path, finder_dir: Option<&Path>) -> Result<SearchProfile> {
    let direct = cwd.join(name);
    if direct.is_file() && ProfileFormat::from_path(&direct).is_some() {
        return load_profile(&direct);
    }
    let finder_dir = match finder_dir {
        Some(dir) if dir.is_dir() => dir.to_path_buf(),
        Some(_) => return Err(ConfigError::FinderDirNotFound),
        None => find_finder_dir(cwd).ok_or(ConfigError::FinderDirNotFound)?,
    };
    load_named_profile(&profiles_dir(&finder_dir), name)
}

/// Load the profile called `name` from the profiles directory `dir`.
pub fn load_named_profile(dir: &Path, name: &str) -> Result<SearchProfile> {
    validate_profile_name(name)?;
    match profile_file(dir, name) {
        Some(path) => load_profile(&path),
        None => Err(ConfigError::ProfileNotFound(name.to_string())),
    }
}

/// All readable profiles in `dir`, sorted by name. Unreadable files are
/// logged and skipped.
pub fn list_profiles(dir: &Path) -> Result<Vec<SearchProfile>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut profiles = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if ProfileFormat::from_path(&path).is_none() {
            continue;
        }
        match load_profile(&path) {
            Ok(profile) => profiles.push(profile),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable profile"),
        }
    }
    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(profiles)
}

/// Write `profile` to `dir/<name>.toml`, replacing any existing profile of
/// the same name. Returns the file written.
pub fn save_profile(dir: &Path, profile: &SearchProfile) -> Result<PathBuf> {
    validate_profile_name(&profile.name)?;
    let path = dir.join(format!("{}.{}", profile.name, ProfileFormat::Toml.extension()));
    let text = toml::to_string_pretty(profile)?;
    write_atomic(&path, text.as_bytes())?;

    // one file per profile name
    let json = dir.join(format!("{}.{}", profile.name, ProfileFormat::Json.extension()));
    if json.is_file() {
        std::fs::remove_file(&json)?;
    }
    debug!(path = %path.display(), "saved profile");
    Ok(path)
}

/// Remove the profile called `name` from `dir`.
pub fn delete_profile(dir: &Path, name: &str) -> Result<PathBuf> {
    validate_profile_name(name)?;
    let path =
        profile_file(dir, name).ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;
    std::fs::remove_file(&path)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use finder_formula::{Letter, Phrase};
    use pretty_assertions::assert_eq;

    fn sample() -> SearchProfile {
        SearchProfile {
            description: "Rust without unsafe".to_string(),
            formula: "A & !B".to_string(),
            mode: Some(SearchMode::Document),
            extensions: vec!["rs".to_string()],
            phrases: PhraseSet::new()
                .with(Letter::A, Phrase::insensitive("rust"))
                .with(Letter::B, Phrase::sensitive("unsafe")),
            ..SearchProfile::new("rust-safe")
        }
    }

    #[test]
    fn save_then_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_profile(dir.path(), &sample()).unwrap();
        assert!(path.ends_with("rust-safe.toml"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("formula = \"A & !B\""));
        assert!(text.contains("[phrases"));

        assert_eq!(load_profile(&path).unwrap(), sample());
    }

    #[test]
    fn json_profile_takes_name_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quick.json");
        std::fs::write(
            &path,
            r#"{"formula": "A", "phrases": {"a": {"text": "todo"}}}"#,
        )
        .unwrap();

        let profile = load_profile(&path).unwrap();
        assert_eq!(profile.name, "quick");
        assert_eq!(profile.phrases.get(Letter::A), Some(&Phrase::insensitive("todo")));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.yaml");
        std::fs::write(&path, "name: x").unwrap();
        assert!(matches!(load_profile(&path), Err(ConfigError::InvalidProfile(_))));
    }

    #[test]
    fn list_is_sorted_and_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        save_profile(dir.path(), &SearchProfile::new("zeta")).unwrap();
        save_profile(dir.path(), &SearchProfile::new("alpha")).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let names: Vec<String> = list_profiles(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(list_profiles(&dir.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn find_profile_by_name_or_path() {
        let dir = tempfile::tempdir().unwrap();
        let finder_dir = crate::finder_dir::ensure_finder_dir(dir.path()).unwrap();
        save_profile(&profiles_dir(&finder_dir), &sample()).unwrap();

        let by_name = find_profile("rust-safe", dir.path(), None).unwrap();
        assert_eq!(by_name.formula, "A & !B");

        let by_path = find_profile(".finder/profiles/rust-safe.toml", dir.path(), None).unwrap();
        assert_eq!(by_path, by_name);

        assert!(matches!(
            find_profile("other", dir.path(), None),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn find_profile_in_explicit_dir() {
        let project = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let custom = elsewhere.path().join("custom");
        save_profile(&profiles_dir(&custom), &sample()).unwrap();

        let found = find_profile("rust-safe", project.path(), Some(&custom)).unwrap();
        assert_eq!(found.formula, "A & !B");

        assert!(matches!(
            find_profile("rust-safe", project.path(), None),
            Err(ConfigError::FinderDirNotFound)
        ));
        assert!(matches!(
            find_profile("rust-safe", project.path(), Some(&project.path().join("missing"))),
            Err(ConfigError::FinderDirNotFound)
        ));
    }

    #[test]
    fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        save_profile(dir.path(), &sample()).unwrap();
        delete_profile(dir.path(), "rust-safe").unwrap();
        assert!(matches!(
            delete_profile(dir.path(), "rust-safe"),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(validate_profile_name("ok_name-1").is_ok());
        assert!(validate_profile_name("").is_err());
        assert!(validate_profile_name("../escape").is_err());
        assert!(save_profile(Path::new("."), &SearchProfile::new("a b")).is_err());
    }

    #[test]
    fn apply_overlays_only_set_options() {
        let base_phrases = PhraseSet::new()
            .with(Letter::A, Phrase::insensitive("old"))
            .with(Letter::C, Phrase::insensitive("kept"));
        let mut params = SearchParams::new(base_phrases, "A | C");
        sample().apply(&mut params);

        assert_eq!(params.formula, "A & !B");
        assert_eq!(params.mode, SearchMode::Document);
        assert_eq!(params.extensions, vec![".rs"]);
        assert!(params.paths.is_empty());
        assert!(!params.unique);
        assert_eq!(params.phrases.get(Letter::A), Some(&Phrase::insensitive("rust")));
        assert_eq!(params.phrases.get(Letter::C), Some(&Phrase::insensitive("kept")));
    }
}
