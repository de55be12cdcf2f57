// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! AWS-backed implementations of the library's source traits.
//!
//! These are thin adapters: each maps one call, classifies the one error the
//! pipeline cares about (the not-found fault, the missing stream), and wraps
//! everything else as an opaque upstream error.

use aws_config::SdkConfig;
use rdsem::{
    InstanceDescription, InstanceLookup, LogPage, LogReadError, OS_METRICS_LOG_GROUP,
    OsMetricsLog, TimeWindow, UpstreamError,
};

/// [`InstanceLookup`] over the RDS `DescribeDBInstances` API.
pub struct RdsInstanceLookup {
    client: aws_sdk_rds::Client,
}

impl RdsInstanceLookup {
    /// Build a lookup from the shared AWS configuration.
    pub fn new(config: &SdkConfig) -> Self {
        Self { client: aws_sdk_rds::Client::new(config) }
    }
}

impl InstanceLookup for RdsInstanceLookup {
    async fn describe(
        &self,
        instance: &str,
    ) -> Result<Option<InstanceDescription>, UpstreamError> {
        let output = match self
            .client
            .describe_db_instances()
            .db_instance_identifier(instance)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let err = err.into_service_error();
                if err.is_db_instance_not_found_fault() {
                    return Ok(None);
                }
                return Err(UpstreamError::new(err));
            }
        };

        Ok(output.db_instances().first().map(|db| InstanceDescription {
            resource_id: db.dbi_resource_id().map(str::to_string),
            engine: db.engine().map(str::to_string),
        }))
    }
}

/// [`OsMetricsLog`] over the CloudWatch Logs `GetLogEvents` API, reading the
/// Enhanced Monitoring log group from the head of the stream.
pub struct CloudWatchOsMetricsLog {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchOsMetricsLog {
    /// Build a log reader from the shared AWS configuration.
    pub fn new(config: &SdkConfig) -> Self {
        Self { client: aws_sdk_cloudwatchlogs::Client::new(config) }
    }
}

impl OsMetricsLog for CloudWatchOsMetricsLog {
    async fn page(
        &self,
        stream: &str,
        window: &TimeWindow,
        token: Option<&str>,
    ) -> Result<LogPage, LogReadError> {
        let output = match self
            .client
            .get_log_events()
            .log_group_name(OS_METRICS_LOG_GROUP)
            .log_stream_name(stream)
            .start_time(window.start_millis())
            .end_time(window.end_millis())
            .start_from_head(true)
            .set_next_token(token.map(str::to_string))
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let err = err.into_service_error();
                if err.is_resource_not_found_exception() {
                    return Err(LogReadError::StreamMissing);
                }
                return Err(LogReadError::Upstream(UpstreamError::new(err)));
            }
        };

        Ok(LogPage {
            messages: output
                .events()
                .iter()
                .filter_map(|event| event.message().map(str::to_string))
                .collect(),
            forward_token: output.next_forward_token().map(str::to_string),
        })
    }
}
