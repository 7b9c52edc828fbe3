// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Watch configuration section.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_RESYNC_PERIOD_SECS: u64 = 30;
const DEFAULT_DELETE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchConfigLayer {
	pub namespace: Option<String>,
	pub dry_run: Option<bool>,
	pub run_outside_cluster: Option<bool>,
	pub resync_period_secs: Option<u64>,
	pub delete_timeout_secs: Option<u64>,
}

impl WatchConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.namespace.is_some() {
			self.namespace = other.namespace;
		}
		if other.dry_run.is_some() {
			self.dry_run = other.dry_run;
		}
		if other.run_outside_cluster.is_some() {
			self.run_outside_cluster = other.run_outside_cluster;
		}
		if other.resync_period_secs.is_some() {
			self.resync_period_secs = other.resync_period_secs;
		}
		if other.delete_timeout_secs.is_some() {
			self.delete_timeout_secs = other.delete_timeout_secs;
		}
	}

	pub fn finalize(self) -> Result<WatchConfig, ConfigError> {
		let config = WatchConfig {
			namespace: self.namespace.unwrap_or_default().trim().to_string(),
			dry_run: self.dry_run.unwrap_or(false),
			run_outside_cluster: self.run_outside_cluster.unwrap_or(false),
			resync_period_secs: self
				.resync_period_secs
				.unwrap_or(DEFAULT_RESYNC_PERIOD_SECS),
			delete_timeout_secs: self
				.delete_timeout_secs
				.unwrap_or(DEFAULT_DELETE_TIMEOUT_SECS),
		};

		if config.resync_period_secs == 0 {
			return Err(ConfigError::Validation(
				"watch.resync_period_secs must be greater than zero".to_string(),
			));
		}
		if config.delete_timeout_secs == 0 {
			return Err(ConfigError::Validation(
				"watch.delete_timeout_secs must be greater than zero".to_string(),
			));
		}

		Ok(config)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchConfig {
	/// Namespace to watch; empty means cluster-wide.
	pub namespace: String,
	pub dry_run: bool,
	pub run_outside_cluster: bool,
	pub resync_period_secs: u64,
	pub delete_timeout_secs: u64,
}

impl WatchConfig {
	/// The namespace filter, or `None` when watching the whole cluster.
	pub fn namespace_filter(&self) -> Option<&str> {
		if self.namespace.is_empty() {
			None
		} else {
			Some(&self.namespace)
		}
	}

	pub fn resync_period(&self) -> Duration {
		Duration::from_secs(self.resync_period_secs)
	}

	/// The periodic full sweep runs at twice the resync period.
	pub fn sweep_interval(&self) -> Duration {
		self.resync_period() * 2
	}

	pub fn delete_timeout(&self) -> Duration {
		Duration::from_secs(self.delete_timeout_secs)
	}
}

impl Default for WatchConfig {
	fn default() -> Self {
		Self {
			namespace: String::new(),
			dry_run: false,
			run_outside_cluster: false,
			resync_period_secs: DEFAULT_RESYNC_PERIOD_SECS,
			delete_timeout_secs: DEFAULT_DELETE_TIMEOUT_SECS,
		}
	}
}
