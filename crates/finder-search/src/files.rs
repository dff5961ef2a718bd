//! Choosing which files a search visits.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions searched when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = [".txt", ".md"];

/// Clean up user-entered extensions: trim, drop blanks, ensure a leading
/// dot and remove duplicates (keeping first occurrence).
///
/// `["txt", " .md ", "", "TXT"]` becomes `[".txt", ".md", ".TXT"]`; matching
/// is case-insensitive anyway, so duplicates differing only by case are
/// harmless.
pub fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for ext in extensions {
        let ext = ext.as_ref().trim();
        if ext.is_empty() {
            continue;
        }
        let ext = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{}", ext)
        };
        if !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}

/// Split a comma separated extension list, as typed on the command line.
pub fn parse_extension_list(list: &str) -> Vec<String> {
    normalize_extensions(list.split(','))
}

/// Returns `true` if the file name ends with one of `extensions`, ignoring
/// case. An empty list accepts every file.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_lowercase(),
        None => return false,
    };
    extensions
        .iter()
        .any(|ext| name.ends_with(&ext.to_lowercase()))
}

/// Expand search paths into the list of files to visit.
///
/// Files are taken as given when their extension matches. Directories are
/// walked recursively in file-name order. Missing paths and unreadable
/// directory entries are logged and skipped.
pub fn collect_files(paths: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in paths {
        if root.is_file() {
            if matches_extension(root, extensions) {
                files.push(root.clone());
            }
            continue;
        }
        if !root.is_dir() {
            warn!(path = %root.display(), "search path does not exist, skipping");
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && matches_extension(entry.path(), extensions)
                    {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => warn!(error = %err, "skipping unreadable entry"),
            }
        }
    }
    debug!(count = files.len(), "collected files to search");
    files
}
