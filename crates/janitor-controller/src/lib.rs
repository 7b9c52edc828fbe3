// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retention decisions and reconciliation loop for finished batch workloads.
//!
//! # Architecture
//!
//! Every observed Pod flows through the same pipeline:
//!
//! - [`OwnershipResolver`] finds the owning Job (legacy annotation or owner
//!   references, chosen once from the API server version)
//! - [`time_since_phase_end`] measures how long the Pod has not been ready
//! - [`is_eligible`] applies the per-phase [`RetentionConfig`]
//! - [`Deleter`] removes the Pod and then its Job, or logs what it would do
//!
//! The [`Controller`] feeds the pipeline from two independent triggers: live
//! watch notifications through the [`PodInformer`], and a periodic sweep over
//! the informer's local cache.

pub mod age;
pub mod compat;
pub mod controller;
pub mod deleter;
pub mod error;
pub mod informer;
pub mod ownership;
pub mod policy;
pub mod reconciler;
pub mod types;

#[cfg(test)]
mod testing;

pub use age::time_since_phase_end;
pub use compat::OwnershipScheme;
pub use controller::{Controller, ControllerConfig};
pub use deleter::{Deleter, DeletionOutcome, StepOutcome};
pub use error::ControllerError;
pub use informer::{PodEventHandler, PodInformer};
pub use janitor_config::{RetentionConfig, RetentionPeriod};
pub use ownership::{CreatedByAnnotation, OwnershipResolver, CREATED_BY_ANNOTATION};
pub use policy::{is_eligible, PodPhase};
pub use reconciler::{PassSummary, ReconcileOutcome, Reconciler};
pub use types::ParentJob;
