/* src/registry/watch.rs */

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::AbortHandle;

use super::RegistryStore;
use crate::events::RegistryEvent;
use crate::signal::{self, SignalError, Watcher};

pub(super) struct WatchState {
	watcher: Watcher,
	abort_handle: AbortHandle,
}

impl WatchState {
	fn stop(self) {
		self.watcher.stop();
		self.abort_handle.abort();
	}
}

impl RegistryStore {
	/// Starts watching the main file. Settled changes mark the store stale
	/// and publish [`RegistryEvent::Changed`]; nothing is reloaded here.
	pub(super) fn attach_watcher(&self) -> Result<(), SignalError> {
		if !self.config.watch || self.mutex.is_destroyed() {
			return Ok(());
		}
		self.detach_watcher();

		let config = signal::Config {
			debounce: self.config.debounce,
			..signal::Config::default()
		};
		let watcher = Watcher::new(&self.config.paths.main, config)?;
		let mut rx = watcher.subscribe();
		let stale = Arc::clone(&self.stale);
		let events = Arc::clone(&self.events);

		let handle = tokio::spawn(async move {
			loop {
				match rx.recv().await {
					Ok(_) | Err(RecvError::Lagged(_)) => {
						stale.store(true, Ordering::SeqCst);
						tracing::debug!("emit changed");
						events.emit(RegistryEvent::Changed);
					}
					Err(RecvError::Closed) => break,
				}
			}
		});

		*self.watch_state.lock() = Some(WatchState {
			watcher,
			abort_handle: handle.abort_handle(),
		});
		Ok(())
	}

	/// Stops watching; a pending debounce window is dropped.
	pub(super) fn detach_watcher(&self) {
		if let Some(state) = self.watch_state.lock().take() {
			state.stop();
		}
	}

	/// Attaches again after the watched file was replaced. Failure leaves
	/// the store working without change tracking.
	pub(super) fn reattach_watcher(&self) {
		if let Err(e) = self.attach_watcher() {
			tracing::error!("failed to watch {:?}: {}", self.config.paths.main, e);
		}
	}
}
