// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files, environment variables and
//! command-line overrides.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::JanitorConfigLayer;
use crate::sections::{
	LogFormat, LoggingConfigLayer, RetentionConfigLayer, RetentionPeriod, WatchConfigLayer,
};

/// Default location of the system config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/kube-janitor/config.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	CommandLine = 90,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<JanitorConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<JanitorConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(JanitorConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<JanitorConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(JanitorConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: JanitorConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: JANITOR_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<JanitorConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(JanitorConfigLayer {
			watch: Some(load_watch_from_env()?),
			retention: Some(load_retention_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

/// A pre-built layer, used for flags given on the command line.
pub struct OverrideSource {
	layer: JanitorConfigLayer,
}

impl OverrideSource {
	pub fn new(layer: JanitorConfigLayer) -> Self {
		Self { layer }
	}
}

impl ConfigSource for OverrideSource {
	fn name(&self) -> &'static str {
		"command-line"
	}

	fn precedence(&self) -> Precedence {
		Precedence::CommandLine
	}

	fn load(&self) -> Result<JanitorConfigLayer, ConfigError> {
		Ok(self.layer.clone())
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T>(name: &str) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	match env_var(name) {
		Some(v) => v
			.parse()
			.map(Some)
			.map_err(|e: T::Err| ConfigError::InvalidValue {
				key: name.to_string(),
				message: e.to_string(),
			}),
		None => Ok(None),
	}
}

fn load_watch_from_env() -> Result<WatchConfigLayer, ConfigError> {
	Ok(WatchConfigLayer {
		namespace: env_var("JANITOR_NAMESPACE"),
		dry_run: env_bool("JANITOR_DRY_RUN"),
		run_outside_cluster: env_bool("JANITOR_RUN_OUTSIDE_CLUSTER"),
		resync_period_secs: env_parse::<u64>("JANITOR_RESYNC_PERIOD_SECS")?,
		delete_timeout_secs: env_parse::<u64>("JANITOR_DELETE_TIMEOUT_SECS")?,
	})
}

fn load_retention_from_env() -> Result<RetentionConfigLayer, ConfigError> {
	Ok(RetentionConfigLayer {
		keep_successful: env_parse::<RetentionPeriod>("JANITOR_KEEP_SUCCESSFUL")?,
		keep_failures: env_parse::<RetentionPeriod>("JANITOR_KEEP_FAILURES")?,
		keep_pending: env_parse::<RetentionPeriod>("JANITOR_KEEP_PENDING")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("JANITOR_LOG_LEVEL"),
		format: env_parse::<LogFormat>("JANITOR_LOG_FORMAT")?,
	})
}
