// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::{Deserialize, Serialize};

use crate::sections::{LoggingConfigLayer, RetentionConfigLayer, WatchConfigLayer};

/// One source's view of the configuration. Absent sections and fields defer
/// to lower-precedence sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JanitorConfigLayer {
	pub watch: Option<WatchConfigLayer>,
	pub retention: Option<RetentionConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

impl JanitorConfigLayer {
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.watch, other.watch, WatchConfigLayer::merge);
		merge_section(
			&mut self.retention,
			other.retention,
			RetentionConfigLayer::merge,
		);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	if let Some(overlay) = other {
		match base {
			Some(existing) => merge(existing, overlay),
			None => *base = Some(overlay),
		}
	}
}
