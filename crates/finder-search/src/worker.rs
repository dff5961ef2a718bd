//! Running a search on a background thread.
//!
//! A [`SearchWorker`] walks the file list and streams [`SearchEvent`]s to
//! whoever holds the matching [`SearchHandle`]. Cancellation is cooperative:
//! the worker checks its [`CancelToken`] between files and between matches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, SearchError};
use crate::files::collect_files;
use crate::searcher::{FileSearcher, SearchMatch, SearchParams};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the search to stop at the next check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub total_files: usize,
    pub files_searched: usize,
    pub matches: usize,
    pub cancelled: bool,
    /// Stopped early because the result limit was reached.
    pub truncated: bool,
    pub message: String,
}

/// Progress reported by a running search, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SearchEvent {
    Started { total: usize },
    Progress { current: usize, total: usize },
    Match(SearchMatch),
    FileError { path: String, message: String },
    Finished(SearchSummary),
}

/// A prepared search.
#[derive(Debug)]
pub struct SearchWorker {
    params: SearchParams,
    searcher: FileSearcher,
    cancel: CancelToken,
}

impl SearchWorker {
    /// Validate `params` and prepare a worker. Formula and phrase problems
    /// are reported here, before any file is touched.
    pub fn new(params: SearchParams) -> Result<Self> {
        let searcher = FileSearcher::new(&params)?;
        Ok(Self {
            params,
            searcher,
            cancel: CancelToken::new(),
        })
    }

    /// Use an externally owned cancellation flag, e.g. one tripped by a
    /// signal handler.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the search on the current thread, passing each event to `emit`.
    pub fn run(mut self, mut emit: impl FnMut(SearchEvent)) -> SearchSummary {
        let files = collect_files(&self.params.paths, &self.params.extensions);
        let total = files.len();
        emit(SearchEvent::Started { total });

        if total == 0 {
            let summary = SearchSummary {
                total_files: 0,
                files_searched: 0,
                matches: 0,
                cancelled: false,
                truncated: false,
                message: "No files found matching the criteria.".to_string(),
            };
            emit(SearchEvent::Finished(summary.clone()));
            return summary;
        }

        let limit = self.params.max_results;
        let mut matches = 0usize;
        let mut searched = 0usize;
        let mut truncated = false;

        'files: for (i, path) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }
            emit(SearchEvent::Progress {
                current: i + 1,
                total,
            });
            searched = i + 1;

            match self.searcher.search_file(path) {
                Ok(found) => {
                    for m in found {
                        if self.cancel.is_cancelled() {
                            break 'files;
                        }
                        if limit.is_some_and(|max| matches >= max) {
                            truncated = true;
                            break 'files;
                        }
                        matches += 1;
                        emit(SearchEvent::Match(m));
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    emit(SearchEvent::FileError {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let cancelled = self.cancel.is_cancelled();
        let message = if cancelled {
            format!("Search cancelled after {} of {} files.", searched, total)
        } else if truncated {
            format!(
                "Result limit reached. Found {} matches in {} of {} files.",
                matches, searched, total
            )
        } else {
            format!("Search complete. Found {} matches in {} files.", matches, total)
        };
        info!(matches, searched, total, cancelled, "search finished");

        let summary = SearchSummary {
            total_files: total,
            files_searched: searched,
            matches,
            cancelled,
            truncated,
            message,
        };
        emit(SearchEvent::Finished(summary.clone()));
        summary
    }

    /// Start the search on a background thread.
    pub fn spawn(self) -> Result<SearchHandle> {
        let (tx, rx) = mpsc::channel();
        let cancel = self.cancel.clone();
        let worker_cancel = self.cancel.clone();

        let thread = thread::Builder::new()
            .name("finder-search".to_string())
            .spawn(move || {
                self.run(|event| {
                    // receiver gone: nobody is listening, stop early
                    if tx.send(event).is_err() {
                        worker_cancel.cancel();
                    }
                });
            })
            .map_err(|e| SearchError::Worker(e.to_string()))?;
        debug!("search worker started");

        Ok(SearchHandle {
            events: rx,
            cancel,
            thread: Some(thread),
        })
    }
}

/// The caller's side of a background search.
#[derive(Debug)]
pub struct SearchHandle {
    events: Receiver<SearchEvent>,
    cancel: CancelToken,
    thread: Option<JoinHandle<()>>,
}

impl SearchHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Block until the next event; `None` once the worker is done.
    pub fn recv(&self) -> Option<SearchEvent> {
        self.events.recv().ok()
    }

    /// Next event if one is ready, without blocking.
    pub fn try_recv(&self) -> Option<SearchEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Blocking iterator over all remaining events.
    pub fn events(&self) -> mpsc::Iter<'_, SearchEvent> {
        self.events.iter()
    }

    /// Wait for the worker thread to exit.
    pub fn join(mut self) -> Result<()> {
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| SearchError::Worker("search thread panicked".to_string())),
            None => Ok(()),
        }
    }
}
