// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Assembly of collected samples into the output document.
//!
//! The document is a single JSON object with one member per sample, keyed by
//! the sample's verbatim payload timestamp, in collection order:
//!
//! ```text
//! {
//!   "2024-01-01T00:05:00Z": {
//!     "cpuUtilization": {
//!       "user": 1.5
//!     }
//!   }
//! }
//! ```

use serde_json::Value;

use crate::collect::MetricSample;

/// The samples of one query, ready to print.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    group: &'static str,
    samples: Vec<MetricSample>,
}

impl OutputDocument {
    /// Wrap collected samples of `group` into a document.
    pub fn new(group: &'static str, samples: Vec<MetricSample>) -> Self {
        Self { group, samples }
    }

    /// Number of samples in the document.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the query collected no samples at all.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The document as a JSON value, timestamps in collection order.
    pub fn to_json(&self) -> Value {
        let mut doc = serde_json::Map::new();
        for sample in &self.samples {
            let mut entry = serde_json::Map::new();
            entry.insert(self.group.to_string(), sample.values.clone());
            doc.insert(sample.timestamp.clone(), Value::Object(entry));
        }
        Value::Object(doc)
    }

    /// Pretty-print the document.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.to_json())
            .expect("a JSON value always serializes")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nests_values_under_timestamp_then_group() {
        let document = OutputDocument::new(
            "cpuUtilization",
            vec![
                MetricSample {
                    timestamp: "2024-01-01T00:05:00Z".into(),
                    values: json!({"user": 1.5}),
                },
                MetricSample {
                    timestamp: "2024-01-01T00:06:00Z".into(),
                    values: json!({"user": 2.5}),
                },
            ],
        );

        assert_eq!(
            document.to_json(),
            json!({
                "2024-01-01T00:05:00Z": {"cpuUtilization": {"user": 1.5}},
                "2024-01-01T00:06:00Z": {"cpuUtilization": {"user": 2.5}},
            })
        );
    }

    #[test]
    fn renders_in_collection_order() {
        // Timestamps deliberately out of lexical order; the document must
        // keep collection order, not re-sort.
        let document = OutputDocument::new(
            "memory",
            vec![
                MetricSample { timestamp: "b".into(), values: json!({"free": 2}) },
                MetricSample { timestamp: "a".into(), values: json!({"free": 1}) },
            ],
        );

        let rendered = document.render();
        let b = rendered.find("\"b\"").unwrap();
        let a = rendered.find("\"a\"").unwrap();
        assert!(b < a, "{rendered}");
    }

    #[test]
    fn empty_documents_render_as_an_empty_object() {
        let document = OutputDocument::new("memory", Vec::new());
        assert!(document.is_empty());
        assert_eq!(document.render(), "{}");
    }

    #[test]
    fn per_device_samples_nest_their_arrays() {
        let document = OutputDocument::new(
            "diskIO",
            vec![MetricSample {
                timestamp: "2024-01-01T00:05:00Z".into(),
                values: json!([{"device": "rdsdev", "tps": 12.5}]),
            }],
        );

        assert_eq!(
            document.to_json(),
            json!({
                "2024-01-01T00:05:00Z": {
                    "diskIO": [{"device": "rdsdev", "tps": 12.5}],
                }
            })
        );
    }
}
