// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Time-window parsing and validation.
//!
//! A window is a half-open interval `[start, end)` of UTC instants. Both
//! bounds are optional on the command line: a missing start means "one hour
//! before now" and a missing end means "now". The window remembers which
//! bounds were defaulted so the empty-window message can echo the computed
//! instants back to the user instead of rejecting a range they never typed.
//!
//! One instant representation is used throughout: `chrono::DateTime<Utc>`.
//! Epoch milliseconds exist only at the log-API boundary, via
//! [`TimeWindow::start_millis`] and [`TimeWindow::end_millis`].

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// The accepted bound format: `YYYY-MM-DD HH:mm:ss`, interpreted as UTC.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A validated half-open query window `[start, end)` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    start_defaulted: bool,
    end_defaulted: bool,
}

impl TimeWindow {
    /// Parse and validate the optional bounds against `now`.
    ///
    /// `now` is a parameter rather than being sampled here so callers (and
    /// tests) control the clock; the CLI passes `Utc::now()`.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, WindowError> {
        let (start, start_defaulted) = match start {
            Some(text) => (parse_bound("start", text)?, false),
            None => (now - Duration::hours(1), true),
        };
        let (end, end_defaulted) = match end {
            Some(text) => (parse_bound("end", text)?, false),
            None => (now, true),
        };

        if end <= start {
            return Err(WindowError::Empty { start, end, start_defaulted, end_defaulted });
        }

        Ok(Self { start, end, start_defaulted, end_defaulted })
    }

    /// Inclusive lower bound.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Lower bound as epoch milliseconds, for the log-API request.
    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// Upper bound as epoch milliseconds, for the log-API request.
    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

fn parse_bound(bound: &'static str, text: &str) -> Result<DateTime<Utc>, WindowError> {
    NaiveDateTime::parse_from_str(text, TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| WindowError::Unparseable { bound, value: text.to_string() })
}

/// A window that could not be built from the requested bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// A bound string did not match [`TIME_FORMAT`].
    Unparseable {
        /// Which bound was rejected, `"start"` or `"end"`.
        bound: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The bounds parsed but the interval is empty (`end <= start`).
    Empty {
        /// The computed lower bound.
        start: DateTime<Utc>,
        /// The computed upper bound.
        end: DateTime<Utc>,
        /// Whether the lower bound came from the one-hour-ago default.
        start_defaulted: bool,
        /// Whether the upper bound came from the now default.
        end_defaulted: bool,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable { bound, value } => write!(
                f,
                "invalid {bound} time \"{value}\": expected YYYY-MM-DD HH:mm:ss (UTC)"
            ),
            Self::Empty { start, end, start_defaulted, end_defaulted } => {
                write!(f, "invalid time window: end {}", end.format(TIME_FORMAT))?;
                if *end_defaulted {
                    write!(f, " (defaulted to now)")?;
                }
                write!(f, " is not after start {}", start.format(TIME_FORMAT))?;
                if *start_defaulted {
                    write!(f, " (defaulted to one hour before now)")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn instant(text: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(text, TIME_FORMAT).unwrap().and_utc()
    }

    #[test]
    fn explicit_bounds_are_parsed_as_utc() {
        let now = instant("2024-06-01 12:00:00");
        let window =
            TimeWindow::resolve(Some("2024-01-01 00:00:00"), Some("2024-01-01 01:30:00"), now)
                .unwrap();
        assert_eq!(window.start(), instant("2024-01-01 00:00:00"));
        assert_eq!(window.end(), instant("2024-01-01 01:30:00"));
        assert_eq!(window.start_millis(), 1_704_067_200_000);
        assert_eq!(window.end_millis(), 1_704_067_200_000 + 90 * 60 * 1000);
    }

    #[test]
    fn missing_bounds_default_to_the_last_hour() {
        let now = instant("2024-06-01 12:00:00");
        let window = TimeWindow::resolve(None, None, now).unwrap();
        assert_eq!(window.start(), instant("2024-06-01 11:00:00"));
        assert_eq!(window.end(), now);
    }

    #[rstest]
    #[case::wrong_shape("2024/01/01 00:00:00")]
    #[case::date_only("2024-01-01")]
    #[case::iso_8601("2024-01-01T00:00:00Z")]
    #[case::nonsense("an hour ago")]
    fn malformed_bounds_are_rejected_with_the_expected_format(#[case] text: &str) {
        let now = instant("2024-06-01 12:00:00");
        let err = TimeWindow::resolve(Some(text), None, now).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(text), "{message}");
        assert!(message.contains("YYYY-MM-DD HH:mm:ss"), "{message}");
    }

    #[test]
    fn equal_bounds_are_an_empty_window() {
        let now = instant("2024-06-01 12:00:00");
        let err = TimeWindow::resolve(
            Some("2024-01-01 00:00:00"),
            Some("2024-01-01 00:00:00"),
            now,
        )
        .unwrap_err();
        assert!(matches!(err, WindowError::Empty { .. }));
        assert!(err.to_string().contains("is not after start 2024-01-01 00:00:00"));
    }

    #[test]
    fn inverted_bounds_are_an_empty_window() {
        let now = instant("2024-06-01 12:00:00");
        let err = TimeWindow::resolve(
            Some("2024-01-02 00:00:00"),
            Some("2024-01-01 00:00:00"),
            now,
        )
        .unwrap_err();
        assert!(matches!(err, WindowError::Empty { .. }));
    }

    #[test]
    fn empty_window_message_echoes_a_defaulted_start() {
        // An end before the defaulted start: the user never typed the start,
        // so the message must state what it was computed to be.
        let now = instant("2024-06-01 12:00:00");
        let err =
            TimeWindow::resolve(None, Some("2024-06-01 10:00:00"), now).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("start 2024-06-01 11:00:00"), "{message}");
        assert!(message.contains("defaulted to one hour before now"), "{message}");
    }

    #[test]
    fn empty_window_message_echoes_a_defaulted_end() {
        let now = instant("2024-06-01 12:00:00");
        let err = TimeWindow::resolve(Some("2024-06-01 13:00:00"), None, now).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("end 2024-06-01 12:00:00"), "{message}");
        assert!(message.contains("defaulted to now"), "{message}");
    }
}
