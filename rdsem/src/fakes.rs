// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! In-memory implementations of the source traits.
//!
//! These drive the pipeline without AWS: a fixed instance table in place of
//! the instance lookup, and a scripted page sequence in place of the log
//! reader. They are compiled for this crate's own tests and for downstream
//! crates that enable the `test-util` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::source::{
    InstanceDescription, InstanceLookup, LogPage, LogReadError, OsMetricsLog, UpstreamError,
};
use crate::window::TimeWindow;

/// An [`InstanceLookup`] over a fixed table of instances.
///
/// # Examples
///
/// ```
/// use rdsem::fakes::StaticInstanceStore;
///
/// let lookup = StaticInstanceStore::new()
///     .with_instance("prod-db", "db-AAA111", "mysql");
/// ```
#[derive(Debug, Default)]
pub struct StaticInstanceStore {
    instances: HashMap<String, InstanceDescription>,
    failure: Option<String>,
}

impl StaticInstanceStore {
    /// An empty store; every lookup reports no such instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance with the given resource id and engine.
    pub fn with_instance(self, identifier: &str, resource_id: &str, engine: &str) -> Self {
        self.with_description(
            identifier,
            InstanceDescription {
                resource_id: Some(resource_id.to_string()),
                engine: Some(engine.to_string()),
            },
        )
    }

    /// Add an instance with an arbitrary description, for degenerate shapes
    /// such as a missing resource id.
    pub fn with_description(mut self, identifier: &str, description: InstanceDescription) -> Self {
        self.instances.insert(identifier.to_string(), description);
        self
    }

    /// Make every lookup fail with an upstream error carrying `message`.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }
}

impl InstanceLookup for StaticInstanceStore {
    async fn describe(
        &self,
        instance: &str,
    ) -> Result<Option<InstanceDescription>, UpstreamError> {
        if let Some(message) = &self.failure {
            return Err(UpstreamError::new(message.clone()));
        }
        Ok(self.instances.get(instance).cloned())
    }
}

/// An [`OsMetricsLog`] serving scripted pages for one stream.
///
/// Tokens mimic the log API: the token returned after page `i` is
/// `cursor-{i + 1}`, and reading past the last page yields an empty page
/// whose token no longer advances. Reads of any other stream name report the
/// stream as missing. The window argument is ignored, so callers' own bounds
/// checks are exercised.
#[derive(Debug, Default)]
pub struct ScriptedLogStream {
    stream: String,
    pages: Vec<Vec<String>>,
    missing: bool,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedLogStream {
    /// A stream with no pages yet; add them with [`Self::with_page`].
    pub fn new(stream: &str) -> Self {
        Self { stream: stream.to_string(), ..Self::default() }
    }

    /// A stream that does not exist, as when Enhanced Monitoring was never
    /// enabled for the instance.
    pub fn missing(stream: &str) -> Self {
        Self { stream: stream.to_string(), missing: true, ..Self::default() }
    }

    /// Append one page of event messages.
    pub fn with_page(
        mut self,
        messages: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.pages.push(messages.into_iter().map(Into::into).collect());
        self
    }

    /// Make every read fail with an upstream error carrying `message`.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// How many page reads have been served, for termination assertions.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl OsMetricsLog for ScriptedLogStream {
    async fn page(
        &self,
        stream: &str,
        _window: &TimeWindow,
        token: Option<&str>,
    ) -> Result<LogPage, LogReadError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(message) = &self.failure {
            return Err(LogReadError::Upstream(UpstreamError::new(message.clone())));
        }
        if self.missing || stream != self.stream {
            return Err(LogReadError::StreamMissing);
        }

        let index = match token {
            None => 0,
            Some(token) => token
                .strip_prefix("cursor-")
                .and_then(|index| index.parse::<usize>().ok())
                .unwrap_or_else(|| panic!("unrecognized cursor {token:?}")),
        };
        if index < self.pages.len() {
            Ok(LogPage {
                messages: self.pages[index].clone(),
                forward_token: Some(format!("cursor-{}", index + 1)),
            })
        } else {
            // Exhausted: empty page, token stops advancing.
            Ok(LogPage {
                messages: Vec::new(),
                forward_token: Some(format!("cursor-{}", self.pages.len())),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> TimeWindow {
        let now = chrono::DateTime::parse_from_rfc3339("2024-01-01T02:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        TimeWindow::resolve(None, None, now).unwrap()
    }

    #[tokio::test]
    async fn tokens_stop_advancing_once_pages_run_out() {
        let log = ScriptedLogStream::new("db-X").with_page(["one"]).with_page(["two"]);

        let first = log.page("db-X", &window(), None).await.unwrap();
        assert_eq!(first.messages, ["one"]);
        let token = first.forward_token.unwrap();

        let second = log.page("db-X", &window(), Some(&token)).await.unwrap();
        assert_eq!(second.messages, ["two"]);
        let token = second.forward_token.unwrap();

        let done = log.page("db-X", &window(), Some(&token)).await.unwrap();
        assert!(done.messages.is_empty());
        assert_eq!(done.forward_token.as_deref(), Some(token.as_str()));
        assert_eq!(log.calls(), 3);
    }

    #[tokio::test]
    async fn other_stream_names_are_missing() {
        let log = ScriptedLogStream::new("db-X").with_page(["one"]);
        let err = log.page("db-Y", &window(), None).await.unwrap_err();
        assert!(matches!(err, LogReadError::StreamMissing));
    }
}
