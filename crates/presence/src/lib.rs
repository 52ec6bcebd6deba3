//! Player count presentation: label templates and display sinks.
//!
//! A [`Publisher`] renders the current and maximum player counts through a
//! [`DisplayTemplate`] and hands the label to a [`DisplaySink`]. Sinks are
//! the seam where an outer integration (chat bot nickname, status page,
//! ...) plugs in.

mod publisher;
mod sink;
mod template;

pub use publisher::Publisher;
pub use sink::{DisplaySink, FileSink, LogSink, MultiSink, PublishError, PublishFuture};
pub use template::{DEFAULT_TEMPLATE, DisplayTemplate};
