// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retention configuration section.
//!
//! Each pod phase the janitor cleans up has its own grace period. A period is
//! written as a humantime duration (`15m`, `1h15m`, `0s`); a negative value
//! (`-1s`) or `forever` keeps objects in that phase indefinitely.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_RETENTION: Duration = Duration::from_secs(15 * 60);

/// How long to keep an object after it left the ready state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RetentionPeriod {
	/// Never delete.
	Forever,
	/// Delete once the object has been in its phase for at least this long.
	After(Duration),
}

impl RetentionPeriod {
	/// The grace duration, or `None` for [`RetentionPeriod::Forever`].
	pub fn as_duration(&self) -> Option<Duration> {
		match self {
			RetentionPeriod::Forever => None,
			RetentionPeriod::After(d) => Some(*d),
		}
	}

	pub fn is_forever(&self) -> bool {
		matches!(self, RetentionPeriod::Forever)
	}
}

impl Default for RetentionPeriod {
	fn default() -> Self {
		RetentionPeriod::After(DEFAULT_RETENTION)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid retention period '{input}': {reason}")]
pub struct ParseRetentionError {
	pub input: String,
	pub reason: String,
}

fn parse_magnitude(input: &str, raw: &str) -> Result<Duration, ParseRetentionError> {
	// Bare integers are seconds, so `0` and `-1` work without a unit.
	if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
		return input
			.parse::<u64>()
			.map(Duration::from_secs)
			.map_err(|e| ParseRetentionError {
				input: raw.to_string(),
				reason: e.to_string(),
			});
	}

	humantime::parse_duration(input).map_err(|e| ParseRetentionError {
		input: raw.to_string(),
		reason: e.to_string(),
	})
}

impl FromStr for RetentionPeriod {
	type Err = ParseRetentionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		if trimmed.is_empty() {
			return Err(ParseRetentionError {
				input: s.to_string(),
				reason: "empty value".to_string(),
			});
		}

		if trimmed.eq_ignore_ascii_case("forever") || trimmed.eq_ignore_ascii_case("never") {
			return Ok(RetentionPeriod::Forever);
		}

		if let Some(magnitude) = trimmed.strip_prefix('-') {
			let duration = parse_magnitude(magnitude.trim(), s)?;
			// -0 is still zero, not negative.
			if duration.is_zero() {
				return Ok(RetentionPeriod::After(Duration::ZERO));
			}
			return Ok(RetentionPeriod::Forever);
		}

		parse_magnitude(trimmed, s).map(RetentionPeriod::After)
	}
}

impl TryFrom<String> for RetentionPeriod {
	type Error = ParseRetentionError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<RetentionPeriod> for String {
	fn from(value: RetentionPeriod) -> Self {
		value.to_string()
	}
}

impl fmt::Display for RetentionPeriod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RetentionPeriod::Forever => f.write_str("forever"),
			RetentionPeriod::After(d) => write!(f, "{}", humantime::format_duration(*d)),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetentionConfigLayer {
	pub keep_successful: Option<RetentionPeriod>,
	pub keep_failures: Option<RetentionPeriod>,
	pub keep_pending: Option<RetentionPeriod>,
}

impl RetentionConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.keep_successful.is_some() {
			self.keep_successful = other.keep_successful;
		}
		if other.keep_failures.is_some() {
			self.keep_failures = other.keep_failures;
		}
		if other.keep_pending.is_some() {
			self.keep_pending = other.keep_pending;
		}
	}

	pub fn finalize(self) -> RetentionConfig {
		RetentionConfig {
			keep_successful: self.keep_successful.unwrap_or_default(),
			keep_failures: self.keep_failures.unwrap_or_default(),
			keep_pending: self.keep_pending.unwrap_or_default(),
		}
	}
}

/// Per-phase grace periods. Immutable once the janitor has started.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetentionConfig {
	pub keep_successful: RetentionPeriod,
	pub keep_failures: RetentionPeriod,
	pub keep_pending: RetentionPeriod,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_is_fifteen_minutes() {
		let config = RetentionConfig::default();
		assert_eq!(
			config.keep_successful,
			RetentionPeriod::After(Duration::from_secs(900))
		);
		assert_eq!(config.keep_failures, config.keep_successful);
		assert_eq!(config.keep_pending, config.keep_successful);
	}

	#[test]
	fn test_parse_humantime() {
		assert_eq!(
			"1h15m".parse::<RetentionPeriod>().unwrap(),
			RetentionPeriod::After(Duration::from_secs(75 * 60))
		);
		assert_eq!(
			"30s".parse::<RetentionPeriod>().unwrap(),
			RetentionPeriod::After(Duration::from_secs(30))
		);
	}

	#[test]
	fn test_parse_zero() {
		assert_eq!(
			"0".parse::<RetentionPeriod>().unwrap(),
			RetentionPeriod::After(Duration::ZERO)
		);
		assert_eq!(
			"0s".parse::<RetentionPeriod>().unwrap(),
			RetentionPeriod::After(Duration::ZERO)
		);
		assert_eq!(
			"-0s".parse::<RetentionPeriod>().unwrap(),
			RetentionPeriod::After(Duration::ZERO)
		);
	}

	#[test]
	fn test_parse_negative_is_forever() {
		assert_eq!(
			"-1s".parse::<RetentionPeriod>().unwrap(),
			RetentionPeriod::Forever
		);
		assert_eq!(
			"-1".parse::<RetentionPeriod>().unwrap(),
			RetentionPeriod::Forever
		);
		assert_eq!(
			"-2h".parse::<RetentionPeriod>().unwrap(),
			RetentionPeriod::Forever
		);
	}

	#[test]
	fn test_parse_keywords() {
		assert!("forever".parse::<RetentionPeriod>().unwrap().is_forever());
		assert!("NEVER".parse::<RetentionPeriod>().unwrap().is_forever());
	}

	#[test]
	fn test_as_duration() {
		assert_eq!(RetentionPeriod::Forever.as_duration(), None);
		assert_eq!(
			"90s".parse::<RetentionPeriod>().unwrap().as_duration(),
			Some(Duration::from_secs(90))
		);
	}

	#[test]
	fn test_parse_rejects_garbage() {
		assert!("".parse::<RetentionPeriod>().is_err());
		assert!("soon".parse::<RetentionPeriod>().is_err());
		assert!("-abc".parse::<RetentionPeriod>().is_err());
	}

	#[test]
	fn test_display() {
		assert_eq!(RetentionPeriod::Forever.to_string(), "forever");
		assert_eq!(
			RetentionPeriod::After(Duration::from_secs(900)).to_string(),
			"15m"
		);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = RetentionConfigLayer {
			keep_successful: Some(RetentionPeriod::Forever),
			keep_failures: Some(RetentionPeriod::After(Duration::from_secs(60))),
			keep_pending: None,
		};
		let overlay = RetentionConfigLayer {
			keep_successful: Some(RetentionPeriod::After(Duration::ZERO)),
			keep_failures: None,
			keep_pending: Some(RetentionPeriod::Forever),
		};
		base.merge(overlay);
		assert_eq!(
			base.keep_successful,
			Some(RetentionPeriod::After(Duration::ZERO))
		);
		assert_eq!(
			base.keep_failures,
			Some(RetentionPeriod::After(Duration::from_secs(60)))
		);
		assert_eq!(base.keep_pending, Some(RetentionPeriod::Forever));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let toml_str = r#"
keep_successful = "1h"
keep_pending = "-1s"
"#;
		let layer: RetentionConfigLayer = toml::from_str(toml_str).unwrap();
		assert_eq!(
			layer.keep_successful,
			Some(RetentionPeriod::After(Duration::from_secs(3600)))
		);
		assert!(layer.keep_failures.is_none());
		assert_eq!(layer.keep_pending, Some(RetentionPeriod::Forever));
	}

	#[test]
	fn test_deserialize_layer_rejects_invalid_period() {
		let result: Result<RetentionConfigLayer, _> = toml::from_str(r#"keep_failures = "later""#);
		assert!(result.is_err());
	}

	#[test]
	fn test_serde_roundtrip() {
		let config = RetentionConfig {
			keep_successful: RetentionPeriod::After(Duration::from_secs(90)),
			keep_failures: RetentionPeriod::Forever,
			keep_pending: RetentionPeriod::After(Duration::ZERO),
		};
		let toml_str = toml::to_string(&config).unwrap();
		let parsed: RetentionConfig = toml::from_str(&toml_str).unwrap();
		assert_eq!(config, parsed);
	}
}
