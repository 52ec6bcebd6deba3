//! Server log directory watching.
//!
//! [`watch_directory`] turns filesystem notifications for a log directory
//! into a stream of [`RawFileEvent`]s. A [`Monitor`] consumes that stream one
//! event at a time, re-reads each updated file, folds it into the running
//! player count and publishes the result.

mod monitor;
mod watcher;

pub use monitor::Monitor;
pub use watcher::{
    DirectoryWatcher, EVENT_BUFFER_SIZE, FileEventKind, RawFileEvent, WatchError, map_event,
    watch_directory,
};
