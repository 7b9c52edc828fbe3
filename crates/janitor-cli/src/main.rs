// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod args;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use janitor_config::{JanitorConfig, LogFormat, LoggingConfig};
use janitor_controller::{Controller, ControllerConfig};
use janitor_k8s::{ConnectMode, KubeClient};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = janitor_config::load_config(args.config.clone(), args.overrides())
		.context("Failed to load configuration")?;

	init_tracing(&config.logging);
	log_settings(&config);

	let mode = if config.watch.run_outside_cluster {
		ConnectMode::Kubeconfig
	} else {
		ConnectMode::InCluster
	};
	let client = KubeClient::connect(mode)
		.await
		.context("Failed to create Kubernetes client")?;

	let controller = Controller::start(Arc::new(client), ControllerConfig::from_config(&config))
		.await
		.context("Failed to start controller")?;

	if args.once {
		controller.run_once().await?;
		return Ok(());
	}

	let shutdown = CancellationToken::new();
	let mut controller_task = tokio::spawn(controller.run(shutdown.clone()));

	tokio::select! {
		_ = shutdown_signal() => {
			info!("Received shutdown signal");
			shutdown.cancel();
		}
		result = &mut controller_task => {
			result.context("Controller task failed")?;
			info!("Controller stopped");
			return Ok(());
		}
	}

	controller_task.await.context("Controller task failed")?;
	info!("Shutdown complete");
	Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
	let registry = tracing_subscriber::registry().with(filter);

	match logging.format {
		LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
		LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

fn log_settings(config: &JanitorConfig) {
	if config.watch.dry_run {
		info!("Performing dry run");
	}
	info!(
		namespace = config.watch.namespace_filter().unwrap_or("<all>"),
		keep_successful = %config.retention.keep_successful,
		keep_failures = %config.retention.keep_failures,
		keep_pending = %config.retention.keep_pending,
		sweep_interval_secs = config.watch.sweep_interval().as_secs(),
		"Starting kube-janitor"
	);
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::warn!(error = %e, "Failed to listen for ctrl-c");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(e) => {
				tracing::warn!(error = %e, "Failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {}
		_ = terminate => {}
	}
}
