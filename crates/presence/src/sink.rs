//! Display sinks: where rendered labels go.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

/// A boxed future returned by [`DisplaySink::publish`].
pub type PublishFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>>;

/// Errors produced while publishing a label.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("label rejected: {0}")]
    Rejected(String),
}

/// Capability to display a label somewhere outside the process.
///
/// Implementors must not retry internally; a failed publish is reported and
/// the next count update publishes again.
pub trait DisplaySink: Send + Sync + 'static {
    fn publish<'a>(&'a self, label: &'a str) -> PublishFuture<'a>;
}

/// Emits labels through `tracing` only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DisplaySink for LogSink {
    fn publish<'a>(&'a self, label: &'a str) -> PublishFuture<'a> {
        Box::pin(async move {
            tracing::info!(label, "display label updated");
            Ok(())
        })
    }
}

/// Writes the latest label to a file, replacing it atomically.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DisplaySink for FileSink {
    fn publish<'a>(&'a self, label: &'a str) -> PublishFuture<'a> {
        Box::pin(async move {
            if label.contains('\n') {
                return Err(PublishError::Rejected(format!(
                    "label spans multiple lines: {label:?}"
                )));
            }

            let staging = self.staging_path();
            tokio::fs::write(&staging, format!("{label}\n")).await?;
            tokio::fs::rename(&staging, &self.path).await?;
            tracing::debug!(path = %self.path.display(), "label file written");
            Ok(())
        })
    }
}

/// Publishes to every inner sink in order.
///
/// All sinks are attempted even if an earlier one fails; the first error is
/// returned.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn DisplaySink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl DisplaySink) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DisplaySink for MultiSink {
    fn publish<'a>(&'a self, label: &'a str) -> PublishFuture<'a> {
        Box::pin(async move {
            let mut first_err = None;
            for sink in &self.sinks {
                if let Err(e) = sink.publish(label).await {
                    first_err.get_or_insert(e);
                }
            }
            first_err.map_or(Ok(()), Err)
        })
    }
}
