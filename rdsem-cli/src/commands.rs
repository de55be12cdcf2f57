// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Implementations of the CLI subcommands.

use aws_config::BehaviorVersion;
use chrono::Utc;
use rdsem::{
    GroupShape, MetricSelection, OsFamily, OutputDocument, QueryError, TimeWindow,
    collect_samples, groups, resolve_instance,
};

use crate::aws::{CloudWatchOsMetricsLog, RdsInstanceLookup};

/// Resolve the instance, validate the request, collect, and print the
/// document. Stage order matches the pipeline: resolution first, then the
/// window, then the selection.
pub async fn fetch(
    db_instance: &str,
    metric_group: &str,
    metrics: &[String],
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> Result<(), QueryError> {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let lookup = RdsInstanceLookup::new(&config);
    let resolved = resolve_instance(&lookup, db_instance).await?;
    println!("Resource id: {}", resolved.resource_id);

    let window = TimeWindow::resolve(start_time, end_time, Utc::now())?;
    let selection = MetricSelection::new(resolved.os, metric_group, metrics)?;

    let log = CloudWatchOsMetricsLog::new(&config);
    let samples = collect_samples(&log, &resolved.resource_id, &window, &selection).await?;
    let document = OutputDocument::new(selection.group().name, samples);
    tracing::info!(
        samples = document.len(),
        group = selection.group().name,
        "query complete"
    );

    println!("{}", document.render());
    Ok(())
}

/// Print the metric taxonomy for an OS family, resolved from an instance
/// when one is given.
pub async fn list(db_instance: Option<&str>, os: &str) -> Result<(), QueryError> {
    let family = match db_instance {
        Some(instance) => {
            let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
            let lookup = RdsInstanceLookup::new(&config);
            resolve_instance(&lookup, instance).await?.os
        }
        None if os == "windows" => OsFamily::Windows,
        None => OsFamily::Linux,
    };

    println!("{family} metric groups:");
    for group in groups(family) {
        match group.shape {
            GroupShape::Scalar => println!("\n  {}", group.name),
            GroupShape::PerDevice { identity } => {
                println!("\n  {} (per device, tagged by {})", group.name, identity.join(", "));
            }
        }
        println!("    {}", group.fields.join(", "));
    }
    Ok(())
}
