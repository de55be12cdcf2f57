// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The collection loop: pages through a monitoring log stream oldest-first,
//! decodes each payload, and extracts the selected fields.
//!
//! Three things bound the loop. Reaching a record at or past the window end
//! stops collection, since the stream is chronological. Collecting
//! [`MAX_SAMPLES`] stops it. And a page whose forward token matches the one
//! just used (or is absent) marks the stream as exhausted; the log API
//! signals the end by repeating the token, not by omitting it.

use serde_json::Value;

use crate::error::QueryError;
use crate::record::OsMetricRecord;
use crate::source::{LogReadError, OsMetricsLog};
use crate::taxonomy::{GroupShape, MetricSelection};
use crate::window::TimeWindow;

/// The most samples a single query will collect.
pub const MAX_SAMPLES: usize = 2000;

/// One extracted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// The payload timestamp, verbatim.
    pub timestamp: String,
    /// The selected values: an object for a scalar group, an array of
    /// per-device objects for a per-device group.
    pub values: Value,
}

/// Collect up to [`MAX_SAMPLES`] samples of `selection` from the stream named
/// `resource_id`, restricted to `window`.
///
/// Events that do not decode as monitoring payloads are skipped with a
/// warning; a missing stream is reported as Enhanced Monitoring being
/// disabled for the instance.
pub async fn collect_samples(
    log: &impl OsMetricsLog,
    resource_id: &str,
    window: &TimeWindow,
    selection: &MetricSelection,
) -> Result<Vec<MetricSample>, QueryError> {
    let mut samples = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = log.page(resource_id, window, token.as_deref()).await.map_err(|err| {
            match err {
                LogReadError::StreamMissing => {
                    QueryError::MonitoringNotEnabled { resource_id: resource_id.to_string() }
                }
                LogReadError::Upstream(err) => QueryError::Upstream(err),
            }
        })?;
        tracing::debug!(events = page.messages.len(), "fetched log page");

        for message in &page.messages {
            let record = match OsMetricRecord::parse(message) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping undecodable log event");
                    continue;
                }
            };
            if record.instant() >= window.end() {
                return Ok(samples);
            }
            if let Some(values) = extract(&record, selection) {
                samples.push(MetricSample {
                    timestamp: record.raw_timestamp().to_string(),
                    values,
                });
                if samples.len() >= MAX_SAMPLES {
                    tracing::warn!(
                        cap = MAX_SAMPLES,
                        "sample cap reached, narrow the time window to see the rest"
                    );
                    return Ok(samples);
                }
            }
        }

        match page.forward_token {
            Some(next) if token.as_deref() != Some(next.as_str()) => token = Some(next),
            _ => return Ok(samples),
        }
    }
}

/// Extract the selected fields from one record, or `None` when the record
/// does not carry the selected group.
fn extract(record: &OsMetricRecord, selection: &MetricSelection) -> Option<Value> {
    let group = record.group(selection.group().name)?;
    match selection.group().shape {
        GroupShape::Scalar => {
            let source = group.as_object()?;
            Some(Value::Object(pick(source, &[], selection.fields())))
        }
        GroupShape::PerDevice { identity } => {
            let devices = group.as_array()?;
            let picked = devices
                .iter()
                .filter_map(Value::as_object)
                .map(|device| Value::Object(pick(device, identity, selection.fields())))
                .collect();
            Some(Value::Array(picked))
        }
    }
}

/// Copy `identity` then `fields` out of `source`, keeping that order and
/// dropping names the payload does not carry.
fn pick(
    source: &serde_json::Map<String, Value>,
    identity: &[&str],
    fields: &[&str],
) -> serde_json::Map<String, Value> {
    let mut picked = serde_json::Map::new();
    for field in identity.iter().chain(fields) {
        if let Some(value) = source.get(*field) {
            picked.insert((*field).to_string(), value.clone());
        }
    }
    picked
}
