//! Watermarked batch aggregation.

use chrono::{Local, NaiveDateTime};
use scpwatch_log_format::{classify, parse_line};

/// How [`apply_batch`] treats record timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Count every record regardless of age.
    Bootstrap,
    /// Count only records strictly newer than `watermark`.
    Incremental { watermark: NaiveDateTime },
}

/// Result of aggregating one batch of log text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Net change in player count.
    pub delta: i64,
    /// Newest timestamp among the counted records.
    pub newest: Option<NaiveDateTime>,
    /// Records that passed the watermark filter.
    pub counted: usize,
    /// Non-blank lines that could not be parsed.
    pub malformed: usize,
}

impl BatchOutcome {
    /// Returns the watermark to store after this batch. Never moves backwards.
    pub fn advance(&self, watermark: NaiveDateTime) -> NaiveDateTime {
        match self.newest {
            Some(newest) if newest > watermark => newest,
            _ => watermark,
        }
    }
}

/// Parses, filters and classifies every line of `contents`.
pub fn apply_batch(contents: &str, mode: BatchMode) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for line in contents.split('\n') {
        let Some(record) = parse_line(line) else {
            if !line.trim().is_empty() {
                outcome.malformed += 1;
            }
            continue;
        };

        if let BatchMode::Incremental { watermark } = mode
            && record.timestamp() <= watermark
        {
            continue;
        }

        outcome.counted += 1;
        outcome.delta += classify(&record).value();
        outcome.newest = outcome.newest.max(Some(record.timestamp()));
    }

    outcome
}

/// Running player count plus the watermark of the newest record seen.
///
/// Owned by a single consumer; both fields change together in [`apply`].
///
/// [`apply`]: Aggregator::apply
#[derive(Debug, Clone)]
pub struct Aggregator {
    count: i64,
    watermark: NaiveDateTime,
}

impl Aggregator {
    /// Creates an aggregator from a bootstrap count and a starting watermark.
    pub fn new(initial_count: i64, watermark: NaiveDateTime) -> Self {
        Self {
            count: initial_count,
            watermark,
        }
    }

    /// Creates an aggregator whose watermark is the current local time, so
    /// only records logged after startup are counted incrementally.
    pub fn starting_now(initial_count: i64) -> Self {
        Self::new(initial_count, Local::now().naive_local())
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn watermark(&self) -> NaiveDateTime {
        self.watermark
    }

    /// Applies a full re-read of a log file in incremental mode.
    pub fn apply(&mut self, contents: &str) -> BatchOutcome {
        let outcome = apply_batch(
            contents,
            BatchMode::Incremental {
                watermark: self.watermark,
            },
        );

        self.count += outcome.delta;
        self.watermark = outcome.advance(self.watermark);

        if outcome.malformed > 0 {
            tracing::debug!(malformed = outcome.malformed, "skipped unparsable log lines");
        }
        if self.count < 0 {
            tracing::warn!(
                count = self.count,
                delta = outcome.delta,
                "player count is negative, more disconnects than connects observed"
            );
        }

        outcome
    }
}
