//! Structured log records.

use chrono::NaiveDateTime;

use crate::timestamp::parse_timestamp;

/// One parsed line of a round log.
///
/// Only produced by [`parse_line`], so every field is non-empty and the
/// timestamp is a valid calendar instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    timestamp: NaiveDateTime,
    event: String,
    subevent: String,
    data: String,
}

impl LogRecord {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn subevent(&self) -> &str {
        &self.subevent
    }

    /// Free-text payload. May itself contain `|` characters.
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Parses one raw log line into a [`LogRecord`].
///
/// The line is split on its first three `|` characters and every field is
/// trimmed. Returns `None` for blank lines, continuation lines, lines with
/// fewer than three separators, empty fields, or a bad timestamp.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let mut fields = line.splitn(4, '|').map(str::trim);
    let (Some(timestamp), Some(event), Some(subevent), Some(data)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return None;
    };

    if [timestamp, event, subevent, data].iter().any(|f| f.is_empty()) {
        return None;
    }

    Some(LogRecord {
        timestamp: parse_timestamp(timestamp).ok()?,
        event: event.to_string(),
        subevent: subevent.to_string(),
        data: data.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONNECT: &str = "2024-01-01 10:00:00.000 | Connection update | Networking | Player 76561198000000000 connected";

    #[test]
    fn parses_well_formed_line() {
        let record = parse_line(CONNECT).unwrap();
        assert_eq!(
            record.timestamp(),
            parse_timestamp("2024-01-01 10:00:00.000").unwrap()
        );
        assert_eq!(record.event(), "Connection update");
        assert_eq!(record.subevent(), "Networking");
        assert_eq!(record.data(), "Player 76561198000000000 connected");
    }

    #[test]
    fn trims_every_field() {
        let record =
            parse_line("  2024-01-01 10:00:00.000\t|  Logger |Started   |  round began \r").unwrap();
        assert_eq!(record.event(), "Logger");
        assert_eq!(record.subevent(), "Started");
        assert_eq!(record.data(), "round began");
    }

    #[test]
    fn extra_separators_stay_in_data() {
        let record = parse_line("2024-01-01 10:00:00.000 | Admin | Command | say a | b").unwrap();
        assert_eq!(record.data(), "say a | b");
    }

    #[test]
    fn rejects_too_few_separators() {
        assert!(parse_line("").is_none());
        assert!(parse_line("just some text").is_none());
        assert!(parse_line("2024-01-01 10:00:00.000 | Connection update").is_none());
        assert!(
            parse_line("2024-01-01 10:00:01.500 | Connection update | Player connected").is_none()
        );
    }

    #[test]
    fn rejects_empty_fields() {
        assert!(parse_line("2024-01-01 10:00:00.000 | | Networking | data").is_none());
        assert!(parse_line("2024-01-01 10:00:00.000 | Event | Networking |   ").is_none());
        assert!(parse_line(" | Event | Networking | data").is_none());
    }

    #[test]
    fn rejects_bad_timestamp() {
        assert!(parse_line("yesterday | Connection update | Networking | Player connected").is_none());
        assert!(
            parse_line("2024-02-30 10:00:00.000 | Connection update | Networking | Player connected")
                .is_none()
        );
    }
}
