// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::K8sError;
use crate::types::{Pod, PodEventStream, ServerVersion};

/// Trait for K8s client operations.
///
/// This abstraction allows for easy mocking in tests while providing
/// a clean interface for the operations the janitor needs. Implementations
/// must be safe to call concurrently from the watch and sweep workers.
#[async_trait]
pub trait K8sClient: Send + Sync {
	/// Query the API server version.
	async fn server_version(&self) -> Result<ServerVersion, K8sError>;

	/// List pods in a namespace, or cluster-wide when `namespace` is `None`.
	async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, K8sError>;

	/// Open a long-lived watch on pods in a namespace, or cluster-wide.
	///
	/// The stream starts with the full initial listing and reconnects on
	/// transport errors.
	fn watch_pods(&self, namespace: Option<&str>) -> PodEventStream;

	/// Delete a pod by name from the specified namespace.
	async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), K8sError>;

	/// Delete a job by name from the specified namespace.
	async fn delete_job(&self, name: &str, namespace: &str) -> Result<(), K8sError>;
}
