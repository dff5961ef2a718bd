//! Search error types.

use std::path::PathBuf;

use finder_formula::FormulaError;

/// Errors that can occur while preparing or running a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The search formula does not parse.
    #[error("invalid formula: {0}")]
    Formula(#[from] FormulaError),

    /// No phrase has any text, so nothing can match.
    #[error("no active phrases: enter at least one phrase (A-F)")]
    NoPhrases,

    /// The background worker could not be started or died.
    #[error("search worker failed: {0}")]
    Worker(String),
}

/// Convenience alias used throughout the search crate.
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors confined to a single file.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}
