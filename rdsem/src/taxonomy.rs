// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The per-OS metric taxonomy of Enhanced Monitoring payloads.
//!
//! Every monitoring sample carries one sub-object or sub-array per metric
//! group, and the set of groups (and the fields inside each) is fixed per
//! operating-system family. The tables in this module are the reference for
//! what may be requested; anything outside them is rejected up front with a
//! corrective message rather than discovered as a missing key at extraction
//! time.

use std::fmt;

use itertools::Itertools;

/// The operating-system family a DB instance runs on, which decides the
/// metric taxonomy its Enhanced Monitoring stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Every engine except the SQL Server family.
    Linux,
    /// The SQL Server engine family (`sqlserver-*`).
    Windows,
}

impl OsFamily {
    /// Infer the OS family from an RDS engine name such as `mysql` or
    /// `sqlserver-se`.
    pub fn from_engine(engine: &str) -> Self {
        let sqlserver = engine
            .get(.."sqlserver".len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("sqlserver"));
        if sqlserver { Self::Windows } else { Self::Linux }
    }

    /// Human-readable family name, as used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a metric group is laid out inside a monitoring sample, which in turn
/// decides how requested fields are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupShape {
    /// A single object of key/value pairs (e.g. `cpuUtilization`); requested
    /// fields are emitted flat under the group name.
    Scalar,
    /// An array with one element per device (e.g. `diskIO`); every element is
    /// emitted with its identifying fields followed by the requested fields.
    PerDevice {
        /// Fields that identify the device an element describes, always
        /// included in the output regardless of the requested metrics.
        identity: &'static [&'static str],
    },
}

/// One metric group in the taxonomy: its payload key, its shape, and the
/// metric fields it may carry.
#[derive(Debug, Clone, Copy)]
pub struct GroupSpec {
    /// Key of the group inside the decoded sample payload.
    pub name: &'static str,
    /// Scalar or per-device layout.
    pub shape: GroupShape,
    /// Valid metric field names, in the order they are emitted when no
    /// explicit metric list is given.
    pub fields: &'static [&'static str],
}

const LINUX_GROUPS: &[GroupSpec] = &[
    GroupSpec {
        name: "cpuUtilization",
        shape: GroupShape::Scalar,
        fields: &["guest", "idle", "irq", "nice", "steal", "system", "total", "user", "wait"],
    },
    GroupSpec {
        name: "diskIO",
        shape: GroupShape::PerDevice { identity: &["device"] },
        fields: &[
            "avgQueueLen",
            "avgReqSz",
            "await",
            "readIOsPS",
            "readKb",
            "readKbPS",
            "rrqmPS",
            "tps",
            "util",
            "wrqmPS",
            "writeIOsPS",
            "writeKb",
            "writeKbPS",
        ],
    },
    GroupSpec {
        name: "fileSys",
        shape: GroupShape::PerDevice { identity: &["name", "mountPoint"] },
        fields: &["maxFiles", "total", "used", "usedFilePercent", "usedFiles", "usedPercent"],
    },
    GroupSpec {
        name: "loadAverageMinute",
        shape: GroupShape::Scalar,
        fields: &["one", "five", "fifteen"],
    },
    GroupSpec {
        name: "memory",
        shape: GroupShape::Scalar,
        fields: &[
            "active",
            "buffers",
            "cached",
            "dirty",
            "free",
            "hugePagesFree",
            "hugePagesRsvd",
            "hugePagesSize",
            "hugePagesSurp",
            "hugePagesTotal",
            "inactive",
            "mapped",
            "pageTables",
            "slab",
            "total",
            "writeback",
        ],
    },
    GroupSpec {
        name: "network",
        shape: GroupShape::PerDevice { identity: &["interface"] },
        fields: &["rx", "tx"],
    },
    GroupSpec {
        name: "processList",
        shape: GroupShape::PerDevice { identity: &["name", "id"] },
        fields: &["cpuUsedPc", "memoryUsedPc", "parentID", "rss", "tgid", "vss"],
    },
    GroupSpec {
        name: "swap",
        shape: GroupShape::Scalar,
        fields: &["cached", "free", "in", "out", "total"],
    },
    GroupSpec {
        name: "tasks",
        shape: GroupShape::Scalar,
        fields: &["blocked", "running", "sleeping", "stopped", "total", "zombie"],
    },
];

const WINDOWS_GROUPS: &[GroupSpec] = &[
    GroupSpec {
        name: "cpuUtilization",
        shape: GroupShape::Scalar,
        fields: &["idle", "kern", "user"],
    },
    GroupSpec {
        name: "disks",
        shape: GroupShape::PerDevice { identity: &["name"] },
        fields: &[
            "availKb",
            "availPc",
            "rdBytesPS",
            "rdCountPS",
            "totalKb",
            "usedKb",
            "usedPc",
            "wrBytesPS",
            "wrCountPS",
        ],
    },
    GroupSpec {
        name: "memory",
        shape: GroupShape::Scalar,
        fields: &[
            "commitLimitKb",
            "commitPeakKb",
            "commitTotKb",
            "kernNonpagedKb",
            "kernPagedKb",
            "kernTotKb",
            "pageSize",
            "physAvailKb",
            "physTotKb",
            "sqlServerTotKb",
            "sysCacheKb",
        ],
    },
    GroupSpec {
        name: "network",
        shape: GroupShape::PerDevice { identity: &["interface"] },
        fields: &["rdBytesPS", "wrBytesPS"],
    },
    GroupSpec {
        name: "processList",
        shape: GroupShape::PerDevice { identity: &["name", "pid"] },
        fields: &[
            "cpuUsedPc",
            "memUsedPc",
            "ppid",
            "tid",
            "virtKb",
            "workingSetKb",
            "workingSetPrivKb",
            "workingSetShareableKb",
        ],
    },
    GroupSpec {
        name: "system",
        shape: GroupShape::Scalar,
        fields: &["handles", "processes", "threads"],
    },
];

/// All metric groups defined for an OS family.
pub fn groups(os: OsFamily) -> &'static [GroupSpec] {
    match os {
        OsFamily::Linux => LINUX_GROUPS,
        OsFamily::Windows => WINDOWS_GROUPS,
    }
}

/// Look up a group by its payload key. Names are matched exactly; the
/// taxonomy uses the camelCase keys that appear in the payloads themselves.
pub fn find_group(os: OsFamily, name: &str) -> Option<&'static GroupSpec> {
    groups(os).iter().find(|group| group.name == name)
}

/// A validated request: one metric group plus the subset of its fields to
/// emit. Built via [`MetricSelection::new`], so holding one proves the group
/// and every field exist in the taxonomy for the resolved OS family.
#[derive(Debug, Clone)]
pub struct MetricSelection {
    group: &'static GroupSpec,
    fields: Vec<&'static str>,
}

impl MetricSelection {
    /// Validate a requested group and metric list against the taxonomy for
    /// `os`. An empty `metrics` list selects every field of the group, in
    /// taxonomy order; an explicit list keeps the caller's order with
    /// duplicates dropped.
    pub fn new(os: OsFamily, group: &str, metrics: &[String]) -> Result<Self, SelectionError> {
        let Some(spec) = find_group(os, group) else {
            return Err(SelectionError::UnknownGroup { group: group.to_string(), os });
        };

        let mut fields = Vec::new();
        if metrics.is_empty() {
            fields.extend_from_slice(spec.fields);
        } else {
            for metric in metrics {
                let Some(field) = spec.fields.iter().copied().find(|field| *field == *metric)
                else {
                    return Err(SelectionError::UnknownMetric {
                        metric: metric.clone(),
                        group: spec,
                        os,
                    });
                };
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
        }

        Ok(Self { group: spec, fields })
    }

    /// The selected group.
    pub fn group(&self) -> &'static GroupSpec {
        self.group
    }

    /// The metric fields to emit, resolved against the taxonomy.
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }
}

/// A requested group or metric that the taxonomy does not define.
#[derive(Debug, Clone)]
pub enum SelectionError {
    /// The group name is not in the taxonomy for the OS family.
    UnknownGroup {
        /// The rejected group name.
        group: String,
        /// The family whose taxonomy was consulted.
        os: OsFamily,
    },
    /// The metric name is not a field of the (valid) group.
    UnknownMetric {
        /// The rejected metric name.
        metric: String,
        /// The group the metric was requested under.
        group: &'static GroupSpec,
        /// The family whose taxonomy was consulted.
        os: OsFamily,
    },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGroup { group, os } => write!(
                f,
                "unknown metric group \"{group}\" for {os}: expected one of {}",
                groups(*os).iter().map(|group| group.name).join(", ")
            ),
            Self::UnknownMetric { metric, group, os } => write!(
                f,
                "unknown metric \"{metric}\" in group \"{}\" for {os}: expected one of {}",
                group.name,
                group.fields.iter().join(", ")
            ),
        }
    }
}

impl std::error::Error for SelectionError {}
