// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! K8s client abstraction for the batch workload janitor.
//!
//! This crate provides:
//! - A trait-based K8s client abstraction for testability
//! - Production implementation using the kube crate
//! - Re-exports of the Pod, Job and watch event types the janitor consumes

mod client;
mod error;
mod kube_client;
mod types;

pub use client::K8sClient;
pub use error::K8sError;
pub use kube_client::{ConnectMode, KubeClient};
pub use types::{
	Job, ObjectMeta, OwnerReference, Pod, PodCondition, PodEvent, PodEventStream, PodStatus,
	ServerVersion, Time,
};
