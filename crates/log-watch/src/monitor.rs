//! Orchestration loop: file events in, published player counts out.

use scpwatch_player_count::{Aggregator, BatchOutcome};
use scpwatch_presence::Publisher;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::watcher::{FileEventKind, RawFileEvent};

/// Owns the player count state and the publisher.
///
/// Events are handled strictly one at a time, so the count and watermark
/// never see concurrent updates.
pub struct Monitor {
    aggregator: Aggregator,
    publisher: Publisher,
}

impl Monitor {
    pub fn new(aggregator: Aggregator, publisher: Publisher) -> Self {
        Self {
            aggregator,
            publisher,
        }
    }

    pub fn count(&self) -> i64 {
        self.aggregator.count()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Publishes the current count without reading anything.
    pub async fn publish_current(&self) {
        // Failures are already logged by the publisher.
        let _ = self.publisher.publish(self.aggregator.count()).await;
    }

    /// Handles one file event.
    ///
    /// Returns the batch outcome when the file was read and applied, `None`
    /// when the event was ignored or the read failed.
    pub async fn handle(&mut self, event: RawFileEvent) -> Option<BatchOutcome> {
        let path = match event.kind {
            FileEventKind::Removed => {
                tracing::trace!(path = %event.path.display(), "ignoring removal");
                return None;
            }
            FileEventKind::Updated => event.path,
        };

        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
            tracing::trace!(path = %path.display(), "ignoring directory update");
            return None;
        }

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read updated log file");
                return None;
            }
        };

        let outcome = self.aggregator.apply(&String::from_utf8_lossy(&bytes));
        tracing::debug!(
            path = %path.display(),
            delta = outcome.delta,
            counted = outcome.counted,
            count = self.aggregator.count(),
            "log file updated"
        );

        self.publish_current().await;
        Some(outcome)
    }

    /// Consumes events until the channel closes or `cancel` fires.
    ///
    /// Returns the monitor so the final state can be inspected.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<RawFileEvent>,
        cancel: CancellationToken,
    ) -> Self {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle(event).await;
                    }
                    None => {
                        tracing::debug!("log event channel closed");
                        break;
                    }
                },
            }
        }

        tracing::info!(count = self.aggregator.count(), "monitor stopped");
        self
    }
}
