// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Resolution of a user-facing instance identifier to its monitoring
//! identity: the resource id naming the log stream and the OS family
//! governing which metric groups exist.

use crate::error::QueryError;
use crate::source::{InstanceLookup, UpstreamError};
use crate::taxonomy::OsFamily;

/// The monitoring identity of one database instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInstance {
    /// The resource id, which names the instance's log stream.
    pub resource_id: String,
    /// The engine name as reported by the lookup.
    pub engine: String,
    /// The OS family implied by the engine.
    pub os: OsFamily,
}

/// Resolve `instance` through `lookup`.
///
/// A lookup that reports no such instance becomes
/// [`QueryError::InstanceNotFound`]; a described instance with no resource id
/// is treated as an upstream fault, since the id is what names the stream.
pub async fn resolve_instance(
    lookup: &impl InstanceLookup,
    instance: &str,
) -> Result<ResolvedInstance, QueryError> {
    let Some(description) = lookup.describe(instance).await? else {
        return Err(QueryError::InstanceNotFound { instance: instance.to_string() });
    };

    let resource_id = description.resource_id.ok_or_else(|| {
        UpstreamError::new(format!("instance {instance} was described without a resource id"))
    })?;
    let engine = description.engine.unwrap_or_default();
    let os = OsFamily::from_engine(&engine);

    tracing::info!(
        instance,
        resource_id = %resource_id,
        engine = %engine,
        os = %os,
        "resolved instance"
    );

    Ok(ResolvedInstance { resource_id, engine, os })
}

#[cfg(test)]
mod tests {
    use crate::fakes::StaticInstanceStore;

    use super::*;

    #[tokio::test]
    async fn resolves_a_linux_instance() {
        let lookup = StaticInstanceStore::new().with_instance("prod-db", "db-AAA111", "mysql");
        let resolved = resolve_instance(&lookup, "prod-db").await.unwrap();
        assert_eq!(
            resolved,
            ResolvedInstance {
                resource_id: "db-AAA111".into(),
                engine: "mysql".into(),
                os: OsFamily::Linux,
            }
        );
    }

    #[tokio::test]
    async fn resolves_a_sql_server_instance_as_windows() {
        let lookup =
            StaticInstanceStore::new().with_instance("win-db", "db-BBB222", "sqlserver-se");
        let resolved = resolve_instance(&lookup, "win-db").await.unwrap();
        assert_eq!(resolved.os, OsFamily::Windows);
    }

    #[tokio::test]
    async fn unknown_identifiers_report_instance_not_found() {
        let lookup = StaticInstanceStore::new().with_instance("prod-db", "db-AAA111", "mysql");
        let err = resolve_instance(&lookup, "prod-bd").await.unwrap_err();
        assert!(matches!(err, QueryError::InstanceNotFound { ref instance } if instance == "prod-bd"));
        assert_eq!(
            err.to_string(),
            "DBInstance not found. Please check the DBInstance Identifier and try again."
        );
    }

    #[tokio::test]
    async fn lookup_failures_surface_as_upstream_errors() {
        let lookup = StaticInstanceStore::new().with_failure("rds unavailable");
        let err = resolve_instance(&lookup, "prod-db").await.unwrap_err();
        assert!(matches!(err, QueryError::Upstream(_)));
        assert_eq!(err.to_string(), "rds unavailable");
    }

    #[tokio::test]
    async fn descriptions_without_a_resource_id_are_upstream_faults() {
        use crate::source::InstanceDescription;

        let lookup = StaticInstanceStore::new().with_description(
            "odd-db",
            InstanceDescription { resource_id: None, engine: Some("mysql".into()) },
        );
        let err = resolve_instance(&lookup, "odd-db").await.unwrap_err();
        assert!(matches!(err, QueryError::Upstream(_)));
    }
}
