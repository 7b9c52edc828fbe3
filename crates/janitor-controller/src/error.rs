// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Controller error types.
//!
//! Only startup and one-shot listing can fail; steady-state errors are logged
//! where they happen.

use janitor_k8s::K8sError;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
	/// The API server version could not be determined.
	#[error("Failed to retrieve API server version: {0}")]
	ServerVersion(#[source] K8sError),

	/// Listing pods for a one-shot pass failed.
	#[error("Failed to list pods: {0}")]
	ListPods(#[source] K8sError),
}
