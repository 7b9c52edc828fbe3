// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use kube::{
	api::{Api, DeleteParams, ListParams},
	config::{Config, KubeConfigOptions},
	runtime::{watcher, WatchStreamExt},
	Client,
};
use tracing::{debug, instrument};

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::types::{PodEventStream, ServerVersion};

/// How the client locates the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
	/// Service account mounted into the pod.
	#[default]
	InCluster,
	/// Kubeconfig from `KUBECONFIG` or `~/.kube/config`.
	Kubeconfig,
}

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a new KubeClient for the given connection mode.
	pub async fn connect(mode: ConnectMode) -> Result<Self, K8sError> {
		let config = match mode {
			ConnectMode::InCluster => Config::incluster()?,
			ConnectMode::Kubeconfig => Config::from_kubeconfig(&KubeConfigOptions::default()).await?,
		};
		let client = Client::try_from(config)?;
		debug!(?mode, "K8s client initialized");
		Ok(Self { client })
	}

	fn pods(&self, namespace: Option<&str>) -> Api<Pod> {
		match namespace {
			Some(ns) => Api::namespaced(self.client.clone(), ns),
			None => Api::all(self.client.clone()),
		}
	}
}

#[async_trait]
impl K8sClient for KubeClient {
	async fn server_version(&self) -> Result<ServerVersion, K8sError> {
		let info = self.client.apiserver_version().await?;
		Ok(info)
	}

	async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, K8sError> {
		let pod_list = self.pods(namespace).list(&ListParams::default()).await?;
		Ok(pod_list.items)
	}

	fn watch_pods(&self, namespace: Option<&str>) -> PodEventStream {
		watcher(self.pods(namespace), watcher::Config::default())
			.default_backoff()
			.map_err(K8sError::from)
			.boxed()
	}

	#[instrument(skip(self))]
	async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), K8sError> {
		let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
		match pods.delete(name, &DeleteParams::default()).await {
			Ok(_) => Ok(()),
			Err(kube::Error::Api(err)) if err.code == 404 => {
				Err(K8sError::PodNotFound { name: name.into() })
			}
			Err(e) => Err(e.into()),
		}
	}

	#[instrument(skip(self))]
	async fn delete_job(&self, name: &str, namespace: &str) -> Result<(), K8sError> {
		let jobs: Api<Job> = Api::namespaced(self.client.clone(), namespace);
		match jobs.delete(name, &DeleteParams::default()).await {
			Ok(_) => Ok(()),
			Err(kube::Error::Api(err)) if err.code == 404 => {
				Err(K8sError::JobNotFound { name: name.into() })
			}
			Err(e) => Err(e.into()),
		}
	}
}
