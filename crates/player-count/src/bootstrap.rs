//! Initial player count from a full scan of the log directory.

use std::path::{Path, PathBuf};

use crate::aggregator::{BatchMode, apply_batch};

/// Errors that prevent an initial count from being established.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("cannot read log directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Contribution of one log file to the initial count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTally {
    pub path: PathBuf,
    pub delta: i64,
    pub counted: usize,
    pub malformed: usize,
}

/// Per-file results of a bootstrap scan.
#[derive(Debug, Clone, Default)]
pub struct BootstrapSummary {
    /// Files that were read, sorted by path.
    pub files: Vec<FileTally>,
    /// Files that could not be read and were left out of the count.
    pub unreadable: Vec<PathBuf>,
}

impl BootstrapSummary {
    /// Sum of every file's delta.
    pub fn total(&self) -> i64 {
        self.files.iter().map(|f| f.delta).sum()
    }
}

/// Reads every top-level file in `dir` and tallies its connection events,
/// ignoring timestamps.
///
/// Subdirectories are not descended into. A file that vanishes or cannot be
/// read mid-scan is logged and skipped; failing to list `dir` itself is an
/// error.
pub fn scan_directory(dir: &Path) -> Result<BootstrapSummary, BootstrapError> {
    let read_dir_err = |source| BootstrapError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(read_dir_err)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    paths.sort_unstable();

    let mut summary = BootstrapSummary::default();

    for path in paths {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read log file during bootstrap");
                summary.unreadable.push(path);
                continue;
            }
        };

        let outcome = apply_batch(&String::from_utf8_lossy(&bytes), BatchMode::Bootstrap);
        tracing::debug!(
            path = %path.display(),
            delta = outcome.delta,
            counted = outcome.counted,
            malformed = outcome.malformed,
            "scanned log file"
        );

        summary.files.push(FileTally {
            path,
            delta: outcome.delta,
            counted: outcome.counted,
            malformed: outcome.malformed,
        });
    }

    Ok(summary)
}

/// Returns the initial player count for the log directory `dir`.
pub fn compute_initial_count(dir: &Path) -> Result<i64, BootstrapError> {
    let summary = scan_directory(dir)?;
    let total = summary.total();

    tracing::info!(
        dir = %dir.display(),
        files = summary.files.len(),
        unreadable = summary.unreadable.len(),
        count = total,
        "computed initial player count"
    );
    if total < 0 {
        tracing::warn!(count = total, "initial player count is negative");
    }

    Ok(total)
}
