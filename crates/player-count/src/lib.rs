//! Player count aggregation over server round logs.
//!
//! The count starts from a one-off scan of every log file in the server's
//! log directory ([`compute_initial_count`]). After that each file update is
//! fed through an [`Aggregator`], which only counts records newer than its
//! watermark so re-reading a whole file never counts a line twice.

mod aggregator;
mod bootstrap;

pub use aggregator::{Aggregator, BatchMode, BatchOutcome, apply_batch};
pub use bootstrap::{
    BootstrapError, BootstrapSummary, FileTally, compute_initial_count, scan_directory,
};
