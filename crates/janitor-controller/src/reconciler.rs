// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The per-Pod reconciliation pipeline.
//!
//! Resolve the owning Job, measure the time since the Pod stopped being ready,
//! check the retention policy for its phase and delete the Pod/Job pair when
//! eligible. The pipeline is idempotent: running it again on a Pod that has
//! already been deleted only produces logged API errors.

use std::borrow::Borrow;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use janitor_config::RetentionConfig;
use janitor_k8s::Pod;
use tracing::{debug, trace};

use crate::age::time_since_phase_end;
use crate::deleter::{Deleter, DeletionOutcome};
use crate::informer::PodEventHandler;
use crate::ownership::OwnershipResolver;
use crate::policy::{is_eligible, PodPhase};
use crate::types::ParentJob;

/// What the pipeline did with one Pod.
#[derive(Debug)]
pub enum ReconcileOutcome {
	/// No owning Job; not a batch pod.
	NotOwned,
	/// Owned by a Job but not (yet) eligible for deletion.
	Retained { phase: PodPhase, age: TimeDelta },
	/// Deletion was attempted (or simulated).
	Deleted {
		job: ParentJob,
		outcome: DeletionOutcome,
	},
}

/// Counts for one full pass over a set of Pods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
	pub scanned: usize,
	pub not_owned: usize,
	pub retained: usize,
	pub deleted: usize,
	/// Deletions where at least one half failed.
	pub failed: usize,
}

impl PassSummary {
	fn record(&mut self, outcome: &ReconcileOutcome) {
		self.scanned += 1;
		match outcome {
			ReconcileOutcome::NotOwned => self.not_owned += 1,
			ReconcileOutcome::Retained { .. } => self.retained += 1,
			ReconcileOutcome::Deleted { outcome, .. } => {
				if outcome.is_success() {
					self.deleted += 1;
				} else {
					self.failed += 1;
				}
			}
		}
	}
}

pub struct Reconciler {
	resolver: OwnershipResolver,
	retention: RetentionConfig,
	deleter: Deleter,
}

impl Reconciler {
	pub fn new(resolver: OwnershipResolver, retention: RetentionConfig, deleter: Deleter) -> Self {
		Self {
			resolver,
			retention,
			deleter,
		}
	}

	pub fn resolver(&self) -> &OwnershipResolver {
		&self.resolver
	}

	pub fn retention(&self) -> &RetentionConfig {
		&self.retention
	}

	pub async fn process(&self, pod: &Pod) -> ReconcileOutcome {
		self.process_at(pod, Utc::now()).await
	}

	/// Run the pipeline for `pod` as if the current time were `now`.
	pub async fn process_at(&self, pod: &Pod, now: DateTime<Utc>) -> ReconcileOutcome {
		let Some(job_name) = self.resolver.resolve(pod) else {
			return ReconcileOutcome::NotOwned;
		};

		let pod_name = pod.metadata.name.as_deref().unwrap_or_default();
		let namespace = pod.metadata.namespace.clone().unwrap_or_default();
		let phase = PodPhase::of(pod);
		let age = time_since_phase_end(pod, now);

		if !is_eligible(&phase, age, &self.retention) {
			trace!(pod = %pod_name, job = %job_name, %phase, age_secs = age.num_seconds(), "retaining pod");
			return ReconcileOutcome::Retained { phase, age };
		}

		let job = ParentJob::new(namespace, job_name);
		debug!(pod = %pod_name, job = %job, %phase, age_secs = age.num_seconds(), "pod eligible for deletion");
		let outcome = self.deleter.delete(pod_name, &job).await;
		ReconcileOutcome::Deleted { job, outcome }
	}

	/// Run the pipeline over every pod in `pods`, one at a time.
	pub async fn sweep<I>(&self, pods: I) -> PassSummary
	where
		I: IntoIterator,
		I::Item: Borrow<Pod>,
	{
		let now = Utc::now();
		let mut summary = PassSummary::default();
		for pod in pods {
			let outcome = self.process_at(pod.borrow(), now).await;
			summary.record(&outcome);
		}
		summary
	}
}

#[async_trait]
impl PodEventHandler for Reconciler {
	async fn on_add(&self, pod: Arc<Pod>) {
		self.process(&pod).await;
	}

	async fn on_update(&self, old: Arc<Pod>, new: Arc<Pod>) {
		if old != new {
			self.process(&new).await;
		}
	}
}
