// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors that can occur during K8s operations.
#[derive(Error, Debug)]
pub enum K8sError {
	#[error("K8s API error: {message}")]
	ApiError { message: String },

	#[error("Pod not found: {name}")]
	PodNotFound { name: String },

	#[error("Job not found: {name}")]
	JobNotFound { name: String },

	#[error("Operation timed out")]
	Timeout,

	#[error("Watch error: {message}")]
	WatchError { message: String },

	#[error("K8s client configuration error: {message}")]
	ConfigError { message: String },
}

impl K8sError {
	/// Whether the target object no longer exists.
	pub fn is_not_found(&self) -> bool {
		matches!(
			self,
			K8sError::PodNotFound { .. } | K8sError::JobNotFound { .. }
		)
	}
}

impl From<kube::Error> for K8sError {
	fn from(err: kube::Error) -> Self {
		K8sError::ApiError {
			message: err.to_string(),
		}
	}
}

impl From<kube::runtime::watcher::Error> for K8sError {
	fn from(err: kube::runtime::watcher::Error) -> Self {
		K8sError::WatchError {
			message: err.to_string(),
		}
	}
}

impl From<kube::config::KubeconfigError> for K8sError {
	fn from(err: kube::config::KubeconfigError) -> Self {
		K8sError::ConfigError {
			message: err.to_string(),
		}
	}
}

impl From<kube::config::InClusterError> for K8sError {
	fn from(err: kube::config::InClusterError) -> Self {
		K8sError::ConfigError {
			message: err.to_string(),
		}
	}
}
