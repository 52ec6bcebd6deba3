//! Server round log format: line parsing, timestamps, connection events.
//!
//! Round logs are newline-separated records of four pipe-delimited fields:
//!
//! ```text
//! 2024-01-01 10:00:00.000 | Connection update | Networking | Player 76561198000000000 connected
//! ```
//!
//! Nothing in this crate performs I/O. Lines that do not fit the format are
//! reported as `None` and are expected to be skipped by callers.

mod classify;
mod record;
mod timestamp;

pub use classify::{CONNECTION_EVENT, ConnectionDelta, NETWORKING_SUBEVENT, classify};
pub use record::{LogRecord, parse_line};
pub use timestamp::{TimestampError, parse_timestamp};
