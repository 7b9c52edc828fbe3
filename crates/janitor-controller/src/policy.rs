// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-phase retention decisions.

use std::fmt;

use chrono::TimeDelta;
use janitor_config::{RetentionConfig, RetentionPeriod};
use janitor_k8s::Pod;

/// Coarse lifecycle state of a Pod, from `status.phase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodPhase {
	Pending,
	Running,
	Succeeded,
	Failed,
	Unknown,
	/// A phase this version does not know about.
	Other(String),
}

impl PodPhase {
	pub fn of(pod: &Pod) -> Self {
		pod
			.status
			.as_ref()
			.and_then(|status| status.phase.as_deref())
			.map(Self::parse)
			.unwrap_or(PodPhase::Unknown)
	}

	pub fn parse(phase: &str) -> Self {
		match phase {
			"Pending" => PodPhase::Pending,
			"Running" => PodPhase::Running,
			"Succeeded" => PodPhase::Succeeded,
			"Failed" => PodPhase::Failed,
			"Unknown" => PodPhase::Unknown,
			other => PodPhase::Other(other.to_string()),
		}
	}

	/// The configured grace period for this phase, or `None` for phases that
	/// are never cleaned up.
	pub fn retention(&self, policy: &RetentionConfig) -> Option<RetentionPeriod> {
		match self {
			PodPhase::Succeeded => Some(policy.keep_successful),
			PodPhase::Failed => Some(policy.keep_failures),
			PodPhase::Pending => Some(policy.keep_pending),
			PodPhase::Running | PodPhase::Unknown | PodPhase::Other(_) => None,
		}
	}
}

impl fmt::Display for PodPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PodPhase::Pending => f.write_str("Pending"),
			PodPhase::Running => f.write_str("Running"),
			PodPhase::Succeeded => f.write_str("Succeeded"),
			PodPhase::Failed => f.write_str("Failed"),
			PodPhase::Unknown => f.write_str("Unknown"),
			PodPhase::Other(other) => f.write_str(other),
		}
	}
}

/// Whether a pod that has spent `age` in `phase` may be deleted.
pub fn is_eligible(phase: &PodPhase, age: TimeDelta, policy: &RetentionConfig) -> bool {
	let Some(period) = phase.retention(policy) else {
		return false;
	};

	// Forever has no duration.
	let Some(grace) = period.as_duration() else {
		return false;
	};

	match TimeDelta::from_std(grace) {
		Ok(grace) => age >= grace,
		// Longer than chrono can represent: never reached.
		Err(_) => false,
	}
}
