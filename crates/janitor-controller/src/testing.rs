// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pod builders shared by unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use janitor_k8s::{
	K8sClient, K8sError, ObjectMeta, OwnerReference, Pod, PodCondition, PodEventStream, PodStatus,
	ServerVersion, Time,
};

pub fn pod(name: &str, phase: &str) -> Pod {
	Pod {
		metadata: ObjectMeta {
			name: Some(name.to_string()),
			namespace: Some("default".to_string()),
			..Default::default()
		},
		status: Some(PodStatus {
			phase: Some(phase.to_string()),
			..Default::default()
		}),
		..Default::default()
	}
}

pub fn owner(kind: &str, name: &str) -> OwnerReference {
	OwnerReference {
		api_version: "batch/v1".to_string(),
		kind: kind.to_string(),
		name: name.to_string(),
		uid: format!("uid-{name}"),
		..Default::default()
	}
}

pub fn with_owners(mut pod: Pod, owners: Vec<OwnerReference>) -> Pod {
	pod.metadata.owner_references = Some(owners);
	pod
}

pub fn with_annotation(mut pod: Pod, key: &str, value: &str) -> Pod {
	pod
		.metadata
		.annotations
		.get_or_insert_with(BTreeMap::new)
		.insert(key.to_string(), value.to_string());
	pod
}

pub fn condition(type_: &str, status: &str, at: Option<DateTime<Utc>>) -> PodCondition {
	PodCondition {
		type_: type_.to_string(),
		status: status.to_string(),
		last_transition_time: at.map(Time),
		..Default::default()
	}
}

pub fn with_conditions(mut pod: Pod, conditions: Vec<PodCondition>) -> Pod {
	pod
		.status
		.get_or_insert_with(Default::default)
		.conditions = Some(conditions);
	pod
}

/// Records delete calls; every delete succeeds.
#[derive(Default)]
pub struct RecordingClient {
	deleted: Mutex<Vec<String>>,
}

impl RecordingClient {
	/// Deleted objects as `pod/<ns>/<name>` or `job/<ns>/<name>`, in call order.
	pub fn deleted(&self) -> Vec<String> {
		self.deleted.lock().unwrap().clone()
	}
}

#[async_trait]
impl K8sClient for RecordingClient {
	async fn server_version(&self) -> Result<ServerVersion, K8sError> {
		Ok(ServerVersion {
			major: "1".to_string(),
			minor: "28".to_string(),
			..Default::default()
		})
	}

	async fn list_pods(&self, _namespace: Option<&str>) -> Result<Vec<Pod>, K8sError> {
		Ok(Vec::new())
	}

	fn watch_pods(&self, _namespace: Option<&str>) -> PodEventStream {
		futures::stream::pending().boxed()
	}

	async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), K8sError> {
		self.deleted.lock().unwrap().push(format!("pod/{namespace}/{name}"));
		Ok(())
	}

	async fn delete_job(&self, name: &str, namespace: &str) -> Result<(), K8sError> {
		self.deleted.lock().unwrap().push(format!("job/{namespace}/{name}"));
		Ok(())
	}
}
