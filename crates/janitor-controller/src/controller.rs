// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Controller lifecycle: startup, watch, periodic sweep and shutdown.

use std::sync::Arc;
use std::time::Duration;

use janitor_config::{JanitorConfig, RetentionConfig};
use janitor_k8s::{K8sClient, Pod};
use kube::runtime::reflector::Store;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::compat::OwnershipScheme;
use crate::deleter::Deleter;
use crate::error::ControllerError;
use crate::informer::{PodEventHandler, PodInformer};
use crate::ownership::OwnershipResolver;
use crate::reconciler::{PassSummary, Reconciler};

/// Runtime settings for a [`Controller`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
	/// Namespace to watch; `None` watches every namespace.
	pub namespace: Option<String>,
	pub dry_run: bool,
	pub retention: RetentionConfig,
	pub sweep_interval: Duration,
	pub delete_timeout: Duration,
}

impl ControllerConfig {
	pub fn from_config(config: &JanitorConfig) -> Self {
		Self {
			namespace: config.watch.namespace_filter().map(str::to_string),
			dry_run: config.watch.dry_run,
			retention: config.retention,
			sweep_interval: config.watch.sweep_interval(),
			delete_timeout: config.watch.delete_timeout(),
		}
	}
}

impl Default for ControllerConfig {
	fn default() -> Self {
		Self::from_config(&JanitorConfig::default())
	}
}

/// The janitor controller.
///
/// Built once per process by [`Controller::start`], which fixes the ownership
/// scheme for the lifetime of the controller.
pub struct Controller {
	client: Arc<dyn K8sClient>,
	config: ControllerConfig,
	reconciler: Arc<Reconciler>,
}

impl Controller {
	/// Query the API server version and assemble the reconciliation pipeline.
	///
	/// Fails if the version cannot be retrieved; there is no retry.
	pub async fn start(
		client: Arc<dyn K8sClient>,
		config: ControllerConfig,
	) -> Result<Self, ControllerError> {
		let version = client
			.server_version()
			.await
			.map_err(ControllerError::ServerVersion)?;
		let scheme = OwnershipScheme::from_server_version(&version);

		info!(
			major = %version.major,
			minor = %version.minor,
			git_version = %version.git_version,
			?scheme,
			"Connected to API server"
		);

		let deleter = Deleter::new(client.clone(), config.dry_run, config.delete_timeout);
		let reconciler = Reconciler::new(
			OwnershipResolver::new(scheme),
			config.retention,
			deleter,
		);

		Ok(Self {
			client,
			config,
			reconciler: Arc::new(reconciler),
		})
	}

	pub fn config(&self) -> &ControllerConfig {
		&self.config
	}

	pub fn reconciler(&self) -> &Reconciler {
		&self.reconciler
	}

	pub fn scheme(&self) -> OwnershipScheme {
		self.reconciler.resolver().scheme()
	}

	/// Watch pods and sweep the local cache until `shutdown` fires.
	///
	/// Returns early if the watch stream ends. Deletions still in flight when
	/// the controller stops are abandoned.
	pub async fn run(self, shutdown: CancellationToken) {
		let informer = PodInformer::new();
		let store = informer.store();
		let events = self.client.watch_pods(self.config.namespace.as_deref());
		let handler: Arc<dyn PodEventHandler> = self.reconciler.clone();

		info!(
			namespace = self.config.namespace.as_deref().unwrap_or("<all>"),
			"Listening for changes..."
		);

		let mut watch = tokio::spawn(informer.run(events, handler, shutdown.clone()));
		let sweep = tokio::spawn(periodic_sweep(
			store,
			self.reconciler.clone(),
			self.config.sweep_interval,
			shutdown.clone(),
		));

		tokio::select! {
			_ = shutdown.cancelled() => {
				info!("Shutting down controller");
			}
			result = &mut watch => {
				if let Err(e) = result {
					warn!(error = %e, "Pod watch task failed");
				}
			}
		}

		watch.abort();
		sweep.abort();
	}

	/// Run a single pass over a fresh listing, without watching.
	pub async fn run_once(&self) -> Result<PassSummary, ControllerError> {
		let pods = self
			.client
			.list_pods(self.config.namespace.as_deref())
			.await
			.map_err(ControllerError::ListPods)?;

		let summary = self.reconciler.sweep(&pods).await;
		log_summary("one-shot", &summary);
		Ok(summary)
	}
}

async fn periodic_sweep(
	store: Store<Pod>,
	reconciler: Arc<Reconciler>,
	interval: Duration,
	shutdown: CancellationToken,
) {
	tokio::select! {
		_ = shutdown.cancelled() => return,
		ready = store.wait_until_ready() => {
			if ready.is_err() {
				warn!("Pod cache closed before initial sync");
				return;
			}
		}
	}

	debug!(interval_secs = interval.as_secs(), "periodic sweep started");
	loop {
		tokio::select! {
			_ = tokio::time::sleep(interval) => {
				let summary = reconciler.sweep(store.state()).await;
				log_summary("periodic", &summary);
			}
			_ = shutdown.cancelled() => {
				debug!("periodic sweep shutting down");
				break;
			}
		}
	}
}

fn log_summary(pass: &str, summary: &PassSummary) {
	info!(
		pass,
		scanned = summary.scanned,
		not_owned = summary.not_owned,
		retained = summary.retained,
		deleted = summary.deleted,
		failed = summary.failed,
		"Sweep completed"
	);
}
