// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! `list-em-metrics`: retrieve RDS Enhanced Monitoring metrics.

mod aws;
mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "list-em-metrics")]
#[command(about = "Retrieve RDS Enhanced Monitoring metrics from CloudWatch Logs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch samples of one metric group over a time window
    Fetch {
        /// DB instance identifier to fetch metrics for
        #[arg(long)]
        db_instance: String,

        /// Metric group to fetch, e.g. cpuUtilization or diskIO
        #[arg(long)]
        metric_group: String,

        /// Single metric within the group; repeat for several, omit for all
        #[arg(long = "metric")]
        metrics: Vec<String>,

        /// Window start, "YYYY-MM-DD HH:mm:ss" in UTC; defaults to one hour ago
        #[arg(long)]
        start_time: Option<String>,

        /// Window end, "YYYY-MM-DD HH:mm:ss" in UTC; defaults to now
        #[arg(long)]
        end_time: Option<String>,
    },

    /// List the metric groups and fields defined for an OS family
    List {
        /// Infer the OS family from this DB instance
        #[arg(long, conflicts_with = "os")]
        db_instance: Option<String>,

        /// OS family whose taxonomy to print
        #[arg(long, default_value = "linux", value_parser = ["linux", "windows"])]
        os: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Fetch { db_instance, metric_group, metrics, start_time, end_time } => {
            commands::fetch(
                &db_instance,
                &metric_group,
                &metrics,
                start_time.as_deref(),
                end_time.as_deref(),
            )
            .await
        }
        Commands::List { db_instance, os } => commands::list(db_instance.as_deref(), &os).await,
    };

    if let Err(err) = result {
        // Errors go to stdout, like every other user-facing message.
        println!("{err}");
        std::process::exit(1);
    }
}
