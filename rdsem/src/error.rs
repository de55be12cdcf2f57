// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The error type reported to users of the query pipeline.

use std::fmt;

use crate::source::UpstreamError;
use crate::taxonomy::SelectionError;
use crate::window::WindowError;

/// Any failure while resolving an instance or collecting its metrics.
#[derive(Debug)]
pub enum QueryError {
    /// No database instance has the requested identifier.
    InstanceNotFound {
        /// The identifier that matched nothing.
        instance: String,
    },
    /// The instance exists but has no monitoring log stream.
    MonitoringNotEnabled {
        /// The resource id whose stream was missing.
        resource_id: String,
    },
    /// The requested time window was rejected.
    Window(WindowError),
    /// The requested group or metric names were rejected.
    Selection(SelectionError),
    /// An AWS call failed.
    Upstream(UpstreamError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstanceNotFound { .. } => f.write_str(
                "DBInstance not found. Please check the DBInstance Identifier and try again.",
            ),
            Self::MonitoringNotEnabled { resource_id } => write!(
                f,
                "No Enhanced Monitoring data found for resource id {resource_id}. \
                 Please check that Enhanced Monitoring is enabled and try again."
            ),
            Self::Window(err) => err.fmt(f),
            Self::Selection(err) => err.fmt(f),
            Self::Upstream(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<WindowError> for QueryError {
    fn from(err: WindowError) -> Self {
        Self::Window(err)
    }
}

impl From<SelectionError> for QueryError {
    fn from(err: SelectionError) -> Self {
        Self::Selection(err)
    }
}

impl From<UpstreamError> for QueryError {
    fn from(err: UpstreamError) -> Self {
        Self::Upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_not_found_uses_the_canonical_wording() {
        let err = QueryError::InstanceNotFound { instance: "prod-db".into() };
        assert_eq!(
            err.to_string(),
            "DBInstance not found. Please check the DBInstance Identifier and try again."
        );
    }

    #[test]
    fn monitoring_not_enabled_names_the_resource_id() {
        let err = QueryError::MonitoringNotEnabled { resource_id: "db-ABC123".into() };
        let message = err.to_string();
        assert!(message.contains("db-ABC123"), "{message}");
        assert!(message.contains("Enhanced Monitoring is enabled"), "{message}");
    }
}
