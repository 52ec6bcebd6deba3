//! Change feed over a log directory using `notify`.

use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Capacity of the event channel between the notify thread and the consumer.
pub const EVENT_BUFFER_SIZE: usize = 256;

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Updated,
    Removed,
}

/// A single file change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileEvent {
    pub kind: FileEventKind,
    pub path: PathBuf,
}

impl RawFileEvent {
    pub fn updated(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: FileEventKind::Updated,
            path: path.into(),
        }
    }

    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: FileEventKind::Removed,
            path: path.into(),
        }
    }
}

/// Errors produced while setting up a directory watch.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to watch {}: {source}", .path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Keeps the underlying watcher alive. Dropping it stops the feed and closes
/// the event channel.
pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
    dir: PathBuf,
}

impl DirectoryWatcher {
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Converts a notify event into zero or more file events.
///
/// Creations, content/metadata changes and rename targets become `Updated`.
/// Deletions and rename sources become `Removed`. Access events are dropped.
pub fn map_event(event: &Event) -> Vec<RawFileEvent> {
    // A two-sided rename lists the old path first, then the new one.
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind
        && let [from, to] = event.paths.as_slice()
    {
        return vec![RawFileEvent::removed(from), RawFileEvent::updated(to)];
    }

    let kind = match event.kind {
        EventKind::Create(_) => FileEventKind::Updated,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => FileEventKind::Removed,
        EventKind::Modify(_) => FileEventKind::Updated,
        EventKind::Remove(_) => FileEventKind::Removed,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
    };

    event
        .paths
        .iter()
        .map(|path| RawFileEvent {
            kind,
            path: path.clone(),
        })
        .collect()
}

/// Starts a recursive watch on `dir`.
///
/// Events are delivered in arrival order on the returned receiver. The
/// notify thread blocks when the channel is full, so a slow consumer delays
/// notifications rather than losing them.
pub fn watch_directory(
    dir: &Path,
) -> Result<(DirectoryWatcher, mpsc::Receiver<RawFileEvent>), WatchError> {
    let watch_err = |source| WatchError::Watch {
        path: dir.to_path_buf(),
        source,
    };

    let (tx, rx) = mpsc::channel(EVENT_BUFFER_SIZE);

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "log directory watcher error");
                return;
            }
        };

        for file_event in map_event(&event) {
            if tx.blocking_send(file_event).is_err() {
                tracing::debug!("log event receiver dropped");
                return;
            }
        }
    })
    .map_err(watch_err)?;

    watcher
        .watch(dir, RecursiveMode::Recursive)
        .map_err(watch_err)?;

    tracing::info!(dir = %dir.display(), "watching log directory");

    Ok((
        DirectoryWatcher {
            _watcher: watcher,
            dir: dir.to_path_buf(),
        },
        rx,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind};
    use std::time::Duration;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |ev, p| ev.add_path(PathBuf::from(p)))
    }

    #[test]
    fn create_and_modify_are_updates() {
        let created = map_event(&event(EventKind::Create(CreateKind::File), &["/logs/a.txt"]));
        assert_eq!(created, vec![RawFileEvent::updated("/logs/a.txt")]);

        let modified = map_event(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/logs/a.txt"],
        ));
        assert_eq!(modified, vec![RawFileEvent::updated("/logs/a.txt")]);
    }

    #[test]
    fn remove_and_rename_from_are_removals() {
        let removed = map_event(&event(EventKind::Remove(RemoveKind::File), &["/logs/a.txt"]));
        assert_eq!(removed, vec![RawFileEvent::removed("/logs/a.txt")]);

        let renamed = map_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/logs/a.txt"],
        ));
        assert_eq!(renamed, vec![RawFileEvent::removed("/logs/a.txt")]);
    }

    #[test]
    fn access_events_are_dropped() {
        let ev = event(EventKind::Access(AccessKind::Read), &["/logs/a.txt"]);
        assert!(map_event(&ev).is_empty());
        assert!(map_event(&event(EventKind::Other, &["/logs/a.txt"])).is_empty());
    }

    #[test]
    fn one_event_per_path() {
        let ev = event(
            EventKind::Modify(ModifyKind::Metadata(notify::event::MetadataKind::Any)),
            &["/logs/a.txt", "/logs/b.txt"],
        );
        assert_eq!(
            map_event(&ev),
            vec![
                RawFileEvent::updated("/logs/a.txt"),
                RawFileEvent::updated("/logs/b.txt"),
            ]
        );
    }

    #[test]
    fn two_sided_rename_splits_paths() {
        let ev = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/logs/a.txt", "/logs/b.txt"],
        );
        assert_eq!(
            map_event(&ev),
            vec![
                RawFileEvent::removed("/logs/a.txt"),
                RawFileEvent::updated("/logs/b.txt"),
            ]
        );
    }

    #[test]
    fn missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(watch_directory(&tmp.path().join("absent")).is_err());
    }

    #[tokio::test]
    async fn reports_file_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let (watcher, mut rx) = watch_directory(tmp.path()).unwrap();
        assert_eq!(watcher.dir(), tmp.path());

        let path = tmp.path().join("Round 1.txt");
        std::fs::write(&path, "hello\n").unwrap();

        let found = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(ev) = rx.recv().await {
                if ev.kind == FileEventKind::Updated && ev.path.ends_with("Round 1.txt") {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);

        assert!(found, "expected an update event for the new file");
    }
}
