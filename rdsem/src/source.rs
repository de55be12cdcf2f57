// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Seams between the query pipeline and the AWS APIs.
//!
//! The pipeline in [`resolve`](crate::resolve) and [`collect`](crate::collect)
//! is written against the [`InstanceLookup`] and [`OsMetricsLog`] traits, not
//! against SDK clients, so it can be driven end to end by the in-memory
//! implementations in the `fakes` module. The CLI provides the real
//! implementations over the RDS and CloudWatch Logs clients.

use std::fmt;
use std::future::Future;

use crate::window::TimeWindow;

/// The log group Enhanced Monitoring publishes into. One stream per
/// monitored instance, named by the instance's monitoring resource id.
pub const OS_METRICS_LOG_GROUP: &str = "RDSOSMetrics";

/// What a database-instance lookup reports about one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceDescription {
    /// The immutable resource id, which names the instance's log stream.
    pub resource_id: Option<String>,
    /// The engine name, e.g. `mysql` or `sqlserver-se`.
    pub engine: Option<String>,
}

/// Looks up a database instance by its user-facing identifier.
pub trait InstanceLookup {
    /// Describe one instance, or `None` when no instance has that identifier.
    fn describe(
        &self,
        instance: &str,
    ) -> impl Future<Output = Result<Option<InstanceDescription>, UpstreamError>> + Send;
}

/// One page of log events in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPage {
    /// The event messages on this page, oldest first.
    pub messages: Vec<String>,
    /// The token for the page after this one. The log API repeats the same
    /// token verbatim once the stream is exhausted rather than ending the
    /// sequence, so callers must compare tokens across calls.
    pub forward_token: Option<String>,
}

/// Reads pages of a monitoring log stream, oldest events first.
pub trait OsMetricsLog {
    /// Fetch one page of `stream` restricted to `window`, resuming from
    /// `token` when one is given.
    fn page(
        &self,
        stream: &str,
        window: &TimeWindow,
        token: Option<&str>,
    ) -> impl Future<Output = Result<LogPage, LogReadError>> + Send;
}

/// A failed page read.
#[derive(Debug)]
pub enum LogReadError {
    /// The log stream does not exist.
    StreamMissing,
    /// Any other failure from the log API.
    Upstream(UpstreamError),
}

impl fmt::Display for LogReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamMissing => f.write_str("log stream not found"),
            Self::Upstream(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for LogReadError {}

/// An error surfaced by an AWS call, carried opaquely.
///
/// The pipeline never inspects these beyond printing them; classification
/// (not-found faults and missing streams) happens in the adapters, which see
/// the typed SDK errors. SDK error types put the detail in their source
/// chain rather than their own message, so `Display` prints the whole chain.
#[derive(Debug)]
pub struct UpstreamError(Box<dyn std::error::Error + Send + Sync>);

impl UpstreamError {
    /// Wrap any error, or a plain message, as an upstream failure.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(cause) = source {
            write!(f, ": {cause}")?;
            source = cause.source();
        }
        Ok(())
    }
}

impl std::error::Error for UpstreamError {}
