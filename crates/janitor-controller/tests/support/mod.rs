// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared fixtures for controller integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use janitor_k8s::{
	K8sClient, K8sError, ObjectMeta, OwnerReference, Pod, PodCondition, PodEvent, PodEventStream,
	PodStatus, ServerVersion, Time,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub const LEGACY_ANNOTATION: &str = "kubernetes.io/created-by";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	DeletePod { namespace: String, name: String },
	DeleteJob { namespace: String, name: String },
}

impl Call {
	pub fn pod(namespace: &str, name: &str) -> Self {
		Call::DeletePod {
			namespace: namespace.to_string(),
			name: name.to_string(),
		}
	}

	pub fn job(namespace: &str, name: &str) -> Self {
		Call::DeleteJob {
			namespace: namespace.to_string(),
			name: name.to_string(),
		}
	}
}

/// In-memory cluster.
///
/// Deleting an object removes it; deleting it again fails with not-found.
/// Every delete call is recorded, successful or not.
pub struct MockK8sClient {
	version: Option<ServerVersion>,
	listing: Vec<Pod>,
	pods: Mutex<HashSet<(String, String)>>,
	jobs: Mutex<HashSet<(String, String)>>,
	calls: Mutex<Vec<Call>>,
	forbidden_pods: HashSet<String>,
	watch_events: Mutex<Option<Vec<PodEvent>>>,
	delete_delay: Option<Duration>,
}

impl MockK8sClient {
	pub fn new() -> Self {
		Self {
			version: Some(version("1", "28")),
			listing: Vec::new(),
			pods: Mutex::new(HashSet::new()),
			jobs: Mutex::new(HashSet::new()),
			calls: Mutex::new(Vec::new()),
			forbidden_pods: HashSet::new(),
			watch_events: Mutex::new(None),
			delete_delay: None,
		}
	}

	pub fn with_version(mut self, major: &str, minor: &str) -> Self {
		self.version = Some(version(major, minor));
		self
	}

	/// Make the version query fail.
	pub fn without_version(mut self) -> Self {
		self.version = None;
		self
	}

	/// Add a pod to the cluster and to the list response.
	pub fn with_pod(mut self, pod: Pod) -> Self {
		self.pods.get_mut().unwrap().insert(key(&pod));
		self.listing.push(pod);
		self
	}

	pub fn with_job(mut self, namespace: &str, name: &str) -> Self {
		self
			.jobs
			.get_mut()
			.unwrap()
			.insert((namespace.to_string(), name.to_string()));
		self
	}

	/// Deleting this pod fails with a permission error.
	pub fn forbid_pod_delete(mut self, name: &str) -> Self {
		self.forbidden_pods.insert(name.to_string());
		self
	}

	/// Events served by the first watch; the stream then stays open.
	pub fn with_watch_events(self, events: Vec<PodEvent>) -> Self {
		*self.watch_events.lock().unwrap() = Some(events);
		self
	}

	pub fn with_delete_delay(mut self, delay: Duration) -> Self {
		self.delete_delay = Some(delay);
		self
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap().clone()
	}

	pub fn pod_exists(&self, namespace: &str, name: &str) -> bool {
		self
			.pods
			.lock()
			.unwrap()
			.contains(&(namespace.to_string(), name.to_string()))
	}

	pub fn job_exists(&self, namespace: &str, name: &str) -> bool {
		self
			.jobs
			.lock()
			.unwrap()
			.contains(&(namespace.to_string(), name.to_string()))
	}

	async fn delay(&self) {
		if let Some(delay) = self.delete_delay {
			tokio::time::sleep(delay).await;
		}
	}
}

#[async_trait]
impl K8sClient for MockK8sClient {
	async fn server_version(&self) -> Result<ServerVersion, K8sError> {
		self.version.clone().ok_or_else(|| K8sError::ApiError {
			message: "connection refused".to_string(),
		})
	}

	async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, K8sError> {
		Ok(self
			.listing
			.iter()
			.filter(|pod| namespace.is_none() || pod.metadata.namespace.as_deref() == namespace)
			.cloned()
			.collect())
	}

	fn watch_pods(&self, _namespace: Option<&str>) -> PodEventStream {
		let events = self.watch_events.lock().unwrap().take().unwrap_or_default();
		futures::stream::iter(events.into_iter().map(Ok))
			.chain(futures::stream::pending())
			.boxed()
	}

	async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), K8sError> {
		self.calls.lock().unwrap().push(Call::pod(namespace, name));
		self.delay().await;

		if self.forbidden_pods.contains(name) {
			return Err(K8sError::ApiError {
				message: format!("pods \"{name}\" is forbidden"),
			});
		}
		if self
			.pods
			.lock()
			.unwrap()
			.remove(&(namespace.to_string(), name.to_string()))
		{
			Ok(())
		} else {
			Err(K8sError::PodNotFound {
				name: name.to_string(),
			})
		}
	}

	async fn delete_job(&self, name: &str, namespace: &str) -> Result<(), K8sError> {
		self.calls.lock().unwrap().push(Call::job(namespace, name));
		self.delay().await;

		if self
			.jobs
			.lock()
			.unwrap()
			.remove(&(namespace.to_string(), name.to_string()))
		{
			Ok(())
		} else {
			Err(K8sError::JobNotFound {
				name: name.to_string(),
			})
		}
	}
}

fn key(pod: &Pod) -> (String, String) {
	(
		pod.metadata.namespace.clone().unwrap_or_default(),
		pod.metadata.name.clone().unwrap_or_default(),
	)
}

pub fn version(major: &str, minor: &str) -> ServerVersion {
	ServerVersion {
		major: major.to_string(),
		minor: minor.to_string(),
		git_version: format!("v{major}.{minor}.0"),
		..Default::default()
	}
}

pub fn pod(namespace: &str, name: &str, phase: &str) -> Pod {
	Pod {
		metadata: ObjectMeta {
			name: Some(name.to_string()),
			namespace: Some(namespace.to_string()),
			..Default::default()
		},
		status: Some(PodStatus {
			phase: Some(phase.to_string()),
			..Default::default()
		}),
		..Default::default()
	}
}

pub fn not_ready_since(mut pod: Pod, at: DateTime<Utc>) -> Pod {
	pod.status.get_or_insert_with(Default::default).conditions = Some(vec![PodCondition {
		type_: "Ready".to_string(),
		status: "False".to_string(),
		last_transition_time: Some(Time(at)),
		..Default::default()
	}]);
	pod
}

pub fn owned_by_job(mut pod: Pod, job: &str) -> Pod {
	pod.metadata.owner_references = Some(vec![OwnerReference {
		api_version: "batch/v1".to_string(),
		kind: "Job".to_string(),
		name: job.to_string(),
		uid: format!("uid-{job}"),
		..Default::default()
	}]);
	pod
}

pub fn created_by_job(pod: Pod, job: &str) -> Pod {
	let namespace = pod.metadata.namespace.clone().unwrap_or_default();
	let value = serde_json::json!({
		"kind": "SerializedReference",
		"apiVersion": "v1",
		"reference": {
			"kind": "Job",
			"namespace": namespace,
			"name": job,
			"uid": format!("uid-{job}"),
			"apiVersion": "batch",
			"resourceVersion": "1",
		},
	});
	with_annotation(pod, LEGACY_ANNOTATION, &value.to_string())
}

pub fn with_annotation(mut pod: Pod, key: &str, value: &str) -> Pod {
	pod
		.metadata
		.annotations
		.get_or_insert_with(BTreeMap::new)
		.insert(key.to_string(), value.to_string());
	pod
}

/// A Job pod in `namespace` that finished `ago` before now.
pub fn finished_job_pod(
	namespace: &str,
	name: &str,
	phase: &str,
	job: &str,
	ago: chrono::TimeDelta,
) -> Pod {
	not_ready_since(owned_by_job(pod(namespace, name, phase), job), Utc::now() - ago)
}

/// One log event seen by a [`LogCapture`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
	pub level: Level,
	pub message: String,
	pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
	pub fn field(&self, name: &str) -> Option<&str> {
		self
			.fields
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}
}

/// Layer that records every event for later assertions.
#[derive(Clone, Default)]
pub struct LogCapture {
	events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
	/// Route events on the current thread into this capture until the guard
	/// is dropped.
	pub fn install(&self) -> tracing::subscriber::DefaultGuard {
		tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
	}

	pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
		self
			.events
			.lock()
			.unwrap()
			.iter()
			.filter(|event| event.level == level)
			.cloned()
			.collect()
	}
}

impl<S: Subscriber> Layer<S> for LogCapture {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let mut visitor = FieldRecorder::default();
		event.record(&mut visitor);
		self.events.lock().unwrap().push(CapturedEvent {
			level: *event.metadata().level(),
			message: visitor.message,
			fields: visitor.fields,
		});
	}
}

#[derive(Default)]
struct FieldRecorder {
	message: String,
	fields: Vec<(String, String)>,
}

impl Visit for FieldRecorder {
	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.message = value.to_string();
		} else {
			self.fields.push((field.name().to_string(), value.to_string()));
		}
	}

	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			self.message = format!("{value:?}");
		} else {
			self.fields.push((field.name().to_string(), format!("{value:?}")));
		}
	}
}
