//! File search for the finder tool.
//!
//! Collects candidate files, evaluates a phrase formula against each line or
//! whole document, and streams results from a background worker.

pub mod error;
pub mod files;
pub mod searcher;
pub mod worker;

// Re-exports for convenience.
pub use error::SearchError;
pub use files::{
    DEFAULT_EXTENSIONS, collect_files, matches_extension, normalize_extensions,
    parse_extension_list,
};
pub use searcher::{DEFAULT_SNIPPET_LENGTH, FileSearcher, SearchMatch, SearchMode, SearchParams};
pub use worker::{CancelToken, SearchEvent, SearchHandle, SearchSummary, SearchWorker};
