// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use futures::stream::BoxStream;

use crate::error::K8sError;

pub use k8s_openapi::api::batch::v1::Job;
pub use k8s_openapi::api::core::v1::{Pod, PodCondition, PodStatus};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference, Time};
pub use k8s_openapi::apimachinery::pkg::version::Info as ServerVersion;

/// A single change notification from the Pod watch.
pub type PodEvent = kube::runtime::watcher::Event<Pod>;

/// A pinned stream of Pod watch events.
///
/// Transport errors are yielded inline; the stream itself keeps reconnecting.
pub type PodEventStream = BoxStream<'static, Result<PodEvent, K8sError>>;
