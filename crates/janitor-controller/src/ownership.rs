// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolution of the Job that created a Pod.

use janitor_k8s::Pod;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::compat::OwnershipScheme;

/// Annotation used by legacy API servers to record a Pod's creator.
pub const CREATED_BY_ANNOTATION: &str = "kubernetes.io/created-by";

const JOB_KIND: &str = "Job";

/// Parsed value of the `kubernetes.io/created-by` annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatedByAnnotation {
	pub kind: String,
	pub api_version: String,
	pub reference: SerializedReference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SerializedReference {
	pub kind: String,
	pub namespace: String,
	pub name: String,
	pub uid: String,
	pub api_version: String,
	pub resource_version: String,
}

impl CreatedByAnnotation {
	pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(raw)
	}
}

/// Finds the parent Job of a Pod using a fixed [`OwnershipScheme`].
#[derive(Debug, Clone, Copy)]
pub struct OwnershipResolver {
	scheme: OwnershipScheme,
}

impl OwnershipResolver {
	pub fn new(scheme: OwnershipScheme) -> Self {
		Self { scheme }
	}

	pub fn scheme(&self) -> OwnershipScheme {
		self.scheme
	}

	/// The name of the Job that owns `pod`, or `None` if it is not a Job pod.
	pub fn resolve(&self, pod: &Pod) -> Option<String> {
		match self.scheme {
			OwnershipScheme::Legacy => resolve_from_annotation(pod),
			OwnershipScheme::Modern => resolve_from_owner_references(pod),
		}
	}
}

fn resolve_from_annotation(pod: &Pod) -> Option<String> {
	let pod_name = pod.metadata.name.as_deref().unwrap_or_default();

	let Some(raw) = pod
		.metadata
		.annotations
		.as_ref()
		.and_then(|annotations| annotations.get(CREATED_BY_ANNOTATION))
	else {
		debug!(pod = %pod_name, "pod has no created-by annotation");
		return None;
	};

	let created_by = match CreatedByAnnotation::parse(raw) {
		Ok(created_by) => created_by,
		Err(e) => {
			warn!(pod = %pod_name, error = %e, "failed to unmarshal created-by annotation");
			return None;
		}
	};

	let reference = created_by.reference;
	if reference.kind == JOB_KIND && !reference.name.is_empty() {
		Some(reference.name)
	} else {
		None
	}
}

// With several Job owners (not produced by the Job controller) the last one
// wins.
fn resolve_from_owner_references(pod: &Pod) -> Option<String> {
	pod
		.metadata
		.owner_references
		.as_ref()?
		.iter()
		.rev()
		.find(|owner| owner.kind == JOB_KIND)
		.map(|owner| owner.name.clone())
		.filter(|name| !name.is_empty())
}
