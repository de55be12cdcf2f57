// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Decoding of Enhanced Monitoring payloads.
//!
//! Each log event carries one JSON document: a `timestamp` field in RFC 3339
//! form plus one member per metric group. The group members are kept as raw
//! [`serde_json::Value`]s; field selection happens later, against the group
//! taxonomy, so this module does not need to know the per-OS schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// One decoded Enhanced Monitoring sample.
#[derive(Debug, Clone)]
pub struct OsMetricRecord {
    raw_timestamp: String,
    instant: DateTime<Utc>,
    groups: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
struct RawRecord {
    timestamp: String,
    #[serde(flatten)]
    groups: serde_json::Map<String, Value>,
}

impl OsMetricRecord {
    /// Decode a log-event message into a record.
    pub fn parse(message: &str) -> Result<Self, RecordError> {
        let raw: RawRecord = serde_json::from_str(message).map_err(RecordError::Json)?;
        let instant = DateTime::parse_from_rfc3339(&raw.timestamp)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(|_| RecordError::Timestamp { value: raw.timestamp.clone() })?;
        Ok(Self { raw_timestamp: raw.timestamp, instant, groups: raw.groups })
    }

    /// The timestamp exactly as it appeared in the payload. Output documents
    /// are keyed by this string, not by a re-rendered instant.
    pub fn raw_timestamp(&self) -> &str {
        &self.raw_timestamp
    }

    /// The payload timestamp as an instant, for window comparisons.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Look up a metric group's raw value, if the payload carried it.
    pub fn group(&self, name: &str) -> Option<&Value> {
        self.groups.get(name)
    }
}

/// A log-event message that could not be decoded into a record.
#[derive(Debug)]
pub enum RecordError {
    /// The message was not a JSON document of the expected shape.
    Json(serde_json::Error),
    /// The `timestamp` member was not an RFC 3339 instant.
    Timestamp {
        /// The rejected timestamp text.
        value: String,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed metrics payload: {err}"),
            Self::Timestamp { value } => {
                write!(f, "malformed metrics timestamp \"{value}\"")
            }
        }
    }
}

impl std::error::Error for RecordError {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_timestamp_and_groups() {
        let message = json!({
            "engine": "MYSQL",
            "timestamp": "2024-01-01T00:05:00Z",
            "cpuUtilization": {"user": 1.5, "idle": 97.0},
            "loadAverageMinute": {"one": 0.1, "five": 0.2, "fifteen": 0.3},
        })
        .to_string();

        let record = OsMetricRecord::parse(&message).unwrap();
        assert_eq!(record.raw_timestamp(), "2024-01-01T00:05:00Z");
        assert_eq!(
            record.instant(),
            DateTime::parse_from_rfc3339("2024-01-01T00:05:00Z").unwrap()
        );
        assert_eq!(record.group("cpuUtilization").unwrap()["user"], json!(1.5));
        assert!(record.group("diskIO").is_none());
    }

    #[test]
    fn keeps_the_raw_timestamp_text_verbatim() {
        // Offset timestamps compare as instants but render as written.
        let message = json!({
            "timestamp": "2024-01-01T09:05:00+09:00",
            "memory": {"free": 42},
        })
        .to_string();

        let record = OsMetricRecord::parse(&message).unwrap();
        assert_eq!(record.raw_timestamp(), "2024-01-01T09:05:00+09:00");
        assert_eq!(
            record.instant(),
            DateTime::parse_from_rfc3339("2024-01-01T00:05:00Z").unwrap()
        );
    }

    #[test]
    fn rejects_non_json_messages() {
        let err = OsMetricRecord::parse("not json").unwrap_err();
        assert!(matches!(err, RecordError::Json(_)));
    }

    #[test]
    fn rejects_payloads_without_a_timestamp() {
        let err = OsMetricRecord::parse(r#"{"memory": {}}"#).unwrap_err();
        assert!(matches!(err, RecordError::Json(_)));
    }

    #[test]
    fn rejects_unparseable_timestamps() {
        let message = json!({"timestamp": "yesterday", "memory": {}}).to_string();
        let err = OsMetricRecord::parse(&message).unwrap_err();
        assert!(matches!(err, RecordError::Timestamp { .. }));
        assert!(err.to_string().contains("yesterday"));
    }
}
