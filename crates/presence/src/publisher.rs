//! Renders and publishes player counts.

use crate::sink::{DisplaySink, PublishError};
use crate::template::DisplayTemplate;

/// Pairs a template and maximum player count with a display sink.
pub struct Publisher {
    template: DisplayTemplate,
    max_players: u32,
    sink: Box<dyn DisplaySink>,
}

impl Publisher {
    pub fn new(template: DisplayTemplate, max_players: u32, sink: impl DisplaySink) -> Self {
        Self {
            template,
            max_players,
            sink: Box::new(sink),
        }
    }

    /// Returns the label for `count` without publishing it.
    pub fn label(&self, count: i64) -> String {
        self.template.render(count, self.max_players)
    }

    /// Publishes the label for `count`.
    ///
    /// Failures are logged and returned; callers must not roll back their
    /// own state on error.
    pub async fn publish(&self, count: i64) -> Result<(), PublishError> {
        let label = self.label(count);
        match self.sink.publish(&label).await {
            Ok(()) => {
                tracing::info!(count, label = %label, "published player count");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(count, error = %e, "failed to publish player count");
                Err(e)
            }
        }
    }
}
