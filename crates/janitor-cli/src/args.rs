// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use clap::Parser;
use janitor_config::{
	JanitorConfigLayer, LogFormat, LoggingConfigLayer, RetentionConfigLayer, RetentionPeriod,
	WatchConfigLayer,
};

/// Deletes finished Job pods, and their Jobs, once they are past a grace period.
#[derive(Parser, Debug)]
#[command(name = "kube-janitor", version)]
pub struct Args {
	/// Path to the TOML config file
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Use the local kubeconfig instead of the in-cluster service account
	#[arg(long)]
	pub run_outside_cluster: bool,

	/// Only watch this namespace (default: all namespaces)
	#[arg(long)]
	pub namespace: Option<String>,

	/// Log what would be deleted without deleting anything
	#[arg(long)]
	pub dry_run: bool,

	/// How long to keep succeeded pods; negative or "forever" keeps them
	#[arg(long, value_name = "DURATION", allow_hyphen_values = true)]
	pub keep_successful: Option<RetentionPeriod>,

	/// How long to keep failed pods; negative or "forever" keeps them
	#[arg(long, value_name = "DURATION", allow_hyphen_values = true)]
	pub keep_failures: Option<RetentionPeriod>,

	/// How long to keep pending pods; negative or "forever" keeps them
	#[arg(long, value_name = "DURATION", allow_hyphen_values = true)]
	pub keep_pending: Option<RetentionPeriod>,

	/// Default log filter, overridden by RUST_LOG
	#[arg(long, value_name = "LEVEL")]
	pub log_level: Option<String>,

	/// Log output format: text or json
	#[arg(long, value_name = "FORMAT")]
	pub log_format: Option<LogFormat>,

	/// Run a single cleanup pass and exit
	#[arg(long)]
	pub once: bool,
}

impl Args {
	/// Command-line settings as the highest-precedence config layer.
	///
	/// Boolean switches only override when given.
	pub fn overrides(&self) -> JanitorConfigLayer {
		JanitorConfigLayer {
			watch: Some(WatchConfigLayer {
				namespace: self.namespace.clone(),
				dry_run: self.dry_run.then_some(true),
				run_outside_cluster: self.run_outside_cluster.then_some(true),
				..Default::default()
			}),
			retention: Some(RetentionConfigLayer {
				keep_successful: self.keep_successful,
				keep_failures: self.keep_failures,
				keep_pending: self.keep_pending,
			}),
			logging: Some(LoggingConfigLayer {
				level: self.log_level.clone(),
				format: self.log_format,
			}),
		}
	}
}
