// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Removal of a Pod and its parent Job.
//!
//! The two deletions are independent API calls. A failure of one is logged and
//! never prevents the other; nothing is retried here, the next reconciliation
//! pass picks the object up again if it still exists.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use janitor_k8s::{K8sClient, K8sError};
use tracing::{info, warn};

use crate::types::ParentJob;

/// Result of one half of a Pod/Job deletion.
#[derive(Debug)]
pub enum StepOutcome {
	Deleted,
	/// Dry run: the deletion was only logged.
	Simulated,
	Failed(K8sError),
}

impl StepOutcome {
	pub fn is_success(&self) -> bool {
		!matches!(self, StepOutcome::Failed(_))
	}
}

#[derive(Debug)]
pub struct DeletionOutcome {
	pub pod: StepOutcome,
	pub job: StepOutcome,
}

impl DeletionOutcome {
	pub fn is_success(&self) -> bool {
		self.pod.is_success() && self.job.is_success()
	}
}

/// Deletes Pod/Job pairs, or only logs them in dry-run mode.
pub struct Deleter {
	client: Arc<dyn K8sClient>,
	dry_run: bool,
	timeout: Duration,
}

impl Deleter {
	/// `timeout` bounds each individual API call.
	pub fn new(client: Arc<dyn K8sClient>, dry_run: bool, timeout: Duration) -> Self {
		Self {
			client,
			dry_run,
			timeout,
		}
	}

	/// Delete `pod_name` and then its parent `job`, both in `job.namespace`.
	pub async fn delete(&self, pod_name: &str, job: &ParentJob) -> DeletionOutcome {
		if self.dry_run {
			info!(pod = %pod_name, namespace = %job.namespace, "dry-run: pod would have been deleted");
			info!(job = %job.name, namespace = %job.namespace, "dry-run: job would have been deleted");
			return DeletionOutcome {
				pod: StepOutcome::Simulated,
				job: StepOutcome::Simulated,
			};
		}

		info!(pod = %pod_name, namespace = %job.namespace, "Deleting pod");
		let pod = match self
			.bounded(self.client.delete_pod(pod_name, &job.namespace))
			.await
		{
			Ok(()) => StepOutcome::Deleted,
			Err(e) => {
				warn!(pod = %pod_name, job = %job.name, namespace = %job.namespace, error = %e, "Failed to delete pod");
				StepOutcome::Failed(e)
			}
		};

		info!(job = %job.name, namespace = %job.namespace, "Deleting job");
		let job_outcome = match self
			.bounded(self.client.delete_job(&job.name, &job.namespace))
			.await
		{
			Ok(()) => StepOutcome::Deleted,
			Err(e) => {
				warn!(job = %job.name, namespace = %job.namespace, error = %e, "Failed to delete job");
				StepOutcome::Failed(e)
			}
		};

		DeletionOutcome {
			pod,
			job: job_outcome,
		}
	}

	async fn bounded<F>(&self, call: F) -> Result<(), K8sError>
	where
		F: Future<Output = Result<(), K8sError>>,
	{
		tokio::time::timeout(self.timeout, call)
			.await
			.unwrap_or_else(|_| Err(K8sError::Timeout))
	}
}
