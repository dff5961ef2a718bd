//! Matching a formula against the contents of one file.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use finder_formula::{Formula, PhraseSet};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::files::DEFAULT_EXTENSIONS;

/// Characters of a document shown for a document-mode match.
pub const DEFAULT_SNIPPET_LENGTH: usize = 200;

/// Unit of text a formula is evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Every line is evaluated on its own.
    #[default]
    Line,
    /// The whole file is evaluated once.
    Document,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Line => "line",
            SearchMode::Document => "document",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" | "lines" => Ok(SearchMode::Line),
            "document" | "doc" | "file" => Ok(SearchMode::Document),
            other => Err(format!(
                "invalid search mode '{}' (expected 'line' or 'document')",
                other
            )),
        }
    }
}

/// Everything needed to run one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    pub phrases: PhraseSet,
    pub formula: String,
    pub mode: SearchMode,
    /// Normalized extensions (leading dot); empty searches every file.
    pub extensions: Vec<String>,
    pub paths: Vec<PathBuf>,
    /// Report only the first occurrence of each line (or document).
    pub unique: bool,
    pub snippet_length: usize,
    /// Stop after this many matches.
    pub max_results: Option<usize>,
}

impl SearchParams {
    /// Parameters with default mode, extensions and snippet length.
    pub fn new(phrases: PhraseSet, formula: impl Into<String>) -> Self {
        Self {
            phrases,
            formula: formula.into(),
            mode: SearchMode::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            paths: Vec::new(),
            unique: false,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            max_results: None,
        }
    }
}

/// One reported match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub path: PathBuf,
    /// 1-based line number; 0 for document matches.
    pub line_number: usize,
    pub text: String,
    /// First time this line (or document) was reported in this search.
    pub is_unique: bool,
}

/// Evaluates a search against files, remembering what has already matched
/// so repeated lines can be flagged or suppressed.
#[derive(Debug)]
pub struct FileSearcher {
    phrases: PhraseSet,
    formula: Formula,
    mode: SearchMode,
    unique_only: bool,
    snippet_length: usize,
    seen: HashSet<String>,
}

impl FileSearcher {
    /// Prepare a searcher, failing if the formula does not parse or no
    /// phrase is active.
    pub fn new(params: &SearchParams) -> Result<Self> {
        if !params.phrases.has_active() {
            return Err(SearchError::NoPhrases);
        }
        let formula = Formula::parse(&params.formula)?;
        Ok(Self {
            phrases: params.phrases.clone(),
            formula,
            mode: params.mode,
            unique_only: params.unique,
            snippet_length: params.snippet_length,
            seen: HashSet::new(),
        })
    }

    /// Read `path` (lossy UTF-8) and return its matches.
    pub fn search_file(&mut self, path: &Path) -> Result<Vec<SearchMatch>> {
        let bytes = fs::read(path).map_err(|e| SearchError::read(path, e))?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(self.search_text(path, &content))
    }

    /// Match already-loaded `content` as if it were the file at `path`.
    pub fn search_text(&mut self, path: &Path, content: &str) -> Vec<SearchMatch> {
        match self.mode {
            SearchMode::Line => self.search_lines(path, content),
            SearchMode::Document => self.search_document(path, content).into_iter().collect(),
        }
    }

    fn search_lines(&mut self, path: &Path, content: &str) -> Vec<SearchMatch> {
        let mut matches = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if !self.formula.evaluate(line, &self.phrases) {
                continue;
            }
            let text = line.trim();
            let key = format!("{}:{}", path.display(), text);
            if let Some(found) = self.record(key, path, idx + 1, text.to_string()) {
                matches.push(found);
            }
        }
        matches
    }

    fn search_document(&mut self, path: &Path, content: &str) -> Option<SearchMatch> {
        if !self.formula.evaluate(content, &self.phrases) {
            return None;
        }
        let mut snippet: String = content.chars().take(self.snippet_length).collect();
        snippet.push_str("...");
        let key = path.display().to_string();
        self.record(key, path, 0, snippet)
    }

    fn record(
        &mut self,
        key: String,
        path: &Path,
        line_number: usize,
        text: String,
    ) -> Option<SearchMatch> {
        let is_unique = self.seen.insert(key);
        if self.unique_only && !is_unique {
            return None;
        }
        Some(SearchMatch {
            path: path.to_path_buf(),
            line_number,
            text,
            is_unique,
        })
    }
}
