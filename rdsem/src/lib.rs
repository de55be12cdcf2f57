// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use crate::collect::{MAX_SAMPLES, MetricSample, collect_samples};
pub use crate::error::QueryError;
pub use crate::record::{OsMetricRecord, RecordError};
pub use crate::render::OutputDocument;
pub use crate::resolve::{ResolvedInstance, resolve_instance};
pub use crate::source::{
    InstanceDescription, InstanceLookup, LogPage, LogReadError, OS_METRICS_LOG_GROUP,
    OsMetricsLog, UpstreamError,
};
pub use crate::taxonomy::{
    GroupShape, GroupSpec, MetricSelection, OsFamily, SelectionError, find_group, groups,
};
pub use crate::window::{TIME_FORMAT, TimeWindow, WindowError};

pub mod collect;
pub mod error;
pub mod record;
pub mod render;
pub mod resolve;
pub mod source;
pub mod taxonomy;
pub mod window;

/// In-memory sources for driving the pipeline in tests.
///
/// To use this module from another crate, enable the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
pub mod fakes;
