// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local Pod cache fed by the watch stream, with add/update notifications.
//!
//! Each applied object is classified against the cache *before* the cache is
//! updated: an object the cache has never seen is an add, a known object is an
//! update carrying both snapshots. After a reconnect the watch re-lists
//! everything; the cache keeps serving the previous state until the re-list
//! completes, so known objects come back as updates rather than adds.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use janitor_k8s::{Pod, PodEvent, PodEventStream};
use kube::runtime::reflector::{store::Writer, ObjectRef, Store};
use kube::runtime::watcher::Event;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Receives Pod notifications from a [`PodInformer`].
///
/// Calls happen one at a time, in watch order.
#[async_trait]
pub trait PodEventHandler: Send + Sync {
	/// A Pod the cache did not know about.
	async fn on_add(&self, pod: Arc<Pod>);

	/// A new snapshot of a known Pod. `old` and `new` may be identical.
	async fn on_update(&self, old: Arc<Pod>, new: Arc<Pod>);
}

pub struct PodInformer {
	writer: Writer<Pod>,
	store: Store<Pod>,
}

impl PodInformer {
	pub fn new() -> Self {
		let writer = Writer::default();
		let store = writer.as_reader();
		Self { writer, store }
	}

	/// A read handle on the cache, usable from other tasks.
	pub fn store(&self) -> Store<Pod> {
		self.store.clone()
	}

	/// Apply one watch event to the cache and notify `handler`.
	pub async fn handle_event(&mut self, event: PodEvent, handler: &dyn PodEventHandler) {
		match &event {
			Event::Apply(pod) | Event::InitApply(pod) => {
				let previous = self.store.get(&ObjectRef::from_obj(pod));
				self.writer.apply_watcher_event(&event);
				let current = Arc::new(pod.clone());
				match previous {
					None => handler.on_add(current).await,
					Some(old) => handler.on_update(old, current).await,
				}
			}
			Event::Delete(pod) => {
				debug!(pod = ?pod.metadata.name, "pod removed from cache");
				self.writer.apply_watcher_event(&event);
			}
			Event::Init => {
				debug!("pod listing started");
				self.writer.apply_watcher_event(&event);
			}
			Event::InitDone => {
				self.writer.apply_watcher_event(&event);
				info!(pods = self.store.len(), "Pod cache synced");
			}
		}
	}

	/// Drive the informer until the stream ends or `shutdown` fires.
	pub async fn run(
		mut self,
		mut events: PodEventStream,
		handler: Arc<dyn PodEventHandler>,
		shutdown: CancellationToken,
	) {
		loop {
			tokio::select! {
				_ = shutdown.cancelled() => {
					debug!("pod informer shutting down");
					break;
				}
				next = events.next() => match next {
					Some(Ok(event)) => self.handle_event(event, handler.as_ref()).await,
					Some(Err(e)) => warn!(error = %e, "Pod watch error, retrying"),
					None => {
						warn!("Pod watch stream ended");
						break;
					}
				},
			}
		}
	}
}

impl Default for PodInformer {
	fn default() -> Self {
		Self::new()
	}
}
