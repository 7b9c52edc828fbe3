// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the batch workload janitor.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file,
//!   environment, command line)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`JANITOR_*`)
//!
//! # Usage
//!
//! ```ignore
//! use janitor_config::{load_config, JanitorConfigLayer};
//!
//! let config = load_config(None, JanitorConfigLayer::default())?;
//! println!("keeping succeeded pods for {}", config.retention.keep_successful);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::JanitorConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, OverrideSource, Precedence, TomlSource,
	SYSTEM_CONFIG_PATH,
};

use std::path::PathBuf;

use tracing::debug;

/// Fully resolved janitor configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JanitorConfig {
	pub watch: WatchConfig,
	pub retention: RetentionConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Command-line overrides
/// 2. Environment variables (`JANITOR_*`)
/// 3. Config file (`config_path`, or `/etc/kube-janitor/config.toml`)
/// 4. Built-in defaults
pub fn load_config(
	config_path: Option<PathBuf>,
	overrides: JanitorConfigLayer,
) -> Result<JanitorConfig, ConfigError> {
	let toml_source = match config_path {
		Some(path) => TomlSource::new(path),
		None => TomlSource::system(),
	};

	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(toml_source),
		Box::new(EnvSource),
		Box::new(OverrideSource::new(overrides)),
	])
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<JanitorConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = JanitorConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: JanitorConfigLayer) -> Result<JanitorConfig, ConfigError> {
	Ok(JanitorConfig {
		watch: layer.watch.unwrap_or_default().finalize()?,
		retention: layer.retention.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	})
}
