// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, TimeDelta, Utc};
use janitor_k8s::Pod;

const READY_CONDITION: &str = "Ready";
const CONDITION_FALSE: &str = "False";

/// Time elapsed since the pod's `Ready` condition last became `False`.
///
/// Returns zero when there is no such condition (the pod never reported
/// readiness, or is still ready), or when the condition carries no transition
/// timestamp. The result is negative if the timestamp lies in the future.
pub fn time_since_phase_end(pod: &Pod, now: DateTime<Utc>) -> TimeDelta {
	pod
		.status
		.as_ref()
		.and_then(|status| status.conditions.as_ref())
		.and_then(|conditions| {
			conditions
				.iter()
				.find(|c| c.type_ == READY_CONDITION && c.status == CONDITION_FALSE)
		})
		.and_then(|condition| condition.last_transition_time.as_ref())
		.map(|transitioned| now.signed_duration_since(transitioned.0))
		.unwrap_or_else(TimeDelta::zero)
}
