//! Connection event classification.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::LogRecord;

/// Event name carried by player connection lines.
pub const CONNECTION_EVENT: &str = "Connection update";

/// Subevent name carried by player connection lines.
pub const NETWORKING_SUBEVENT: &str = "Networking";

// Word boundaries are ASCII-only: a non-ASCII letter next to the keyword
// still counts as a boundary.
static CONNECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)connected(?-u:\b)").expect("connected pattern is valid")
});

static DISCONNECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)disconnected(?-u:\b)").expect("disconnected pattern is valid")
});

/// Effect of a single log record on the player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionDelta {
    Connected,
    Disconnected,
    Neutral,
}

impl ConnectionDelta {
    /// Signed change in player count: `+1`, `-1` or `0`.
    pub fn value(self) -> i64 {
        match self {
            Self::Connected => 1,
            Self::Disconnected => -1,
            Self::Neutral => 0,
        }
    }
}

/// Decides whether a record is a player connect, a player disconnect, or
/// neither.
pub fn classify(record: &LogRecord) -> ConnectionDelta {
    if record.event() != CONNECTION_EVENT || record.subevent() != NETWORKING_SUBEVENT {
        return ConnectionDelta::Neutral;
    }

    let data = record.data();
    if !data.to_lowercase().contains("player") {
        return ConnectionDelta::Neutral;
    }

    // "connected" has no word boundary inside "disconnected", so the two
    // checks are mutually exclusive for a line mentioning only one of them.
    if CONNECTED_RE.is_match(data) {
        ConnectionDelta::Connected
    } else if DISCONNECTED_RE.is_match(data) {
        ConnectionDelta::Disconnected
    } else {
        ConnectionDelta::Neutral
    }
}
