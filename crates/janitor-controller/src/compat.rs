// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API server compatibility detection.
//!
//! Old API servers do not populate `ownerReferences` on Job pods; the owning
//! Job is only recorded in the `kubernetes.io/created-by` annotation. The
//! scheme is chosen once at startup and never recomputed.

use janitor_k8s::ServerVersion;
use tracing::warn;

/// Which metadata records the Job that created a Pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipScheme {
	/// JSON reference in the `kubernetes.io/created-by` annotation.
	Legacy,
	/// Structured `metadata.ownerReferences`.
	Modern,
}

impl OwnershipScheme {
	pub fn from_server_version(version: &ServerVersion) -> Self {
		Self::from_version_parts(&version.major, &version.minor)
	}

	/// Historical cutoff: legacy iff `major < 2 && minor < 8`.
	///
	/// Not a semantic version comparison: each component is checked against
	/// its own bound, so `1.9` is modern.
	pub fn from_version_parts(major: &str, minor: &str) -> Self {
		let major = parse_major(major);
		let minor = parse_minor(minor);

		if major < 2 && minor < 8 {
			OwnershipScheme::Legacy
		} else {
			OwnershipScheme::Modern
		}
	}

	pub fn is_legacy(&self) -> bool {
		matches!(self, OwnershipScheme::Legacy)
	}
}

fn parse_major(raw: &str) -> i64 {
	raw.parse().unwrap_or_else(|_| {
		warn!(major = %raw, "failed to parse major version");
		0
	})
}

/// Minor versions carry suffixes such as `7+`; use the first run of digits.
fn parse_minor(raw: &str) -> i64 {
	let digits: String = raw
		.chars()
		.skip_while(|c| !c.is_ascii_digit())
		.take_while(|c| c.is_ascii_digit())
		.collect();

	if digits.is_empty() {
		warn!(minor = %raw, "failed to parse minor version");
		return 0;
	}

	// Only overflow can fail here; saturate.
	digits.parse().unwrap_or(i64::MAX)
}
