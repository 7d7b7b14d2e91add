/* src/registry/mod.rs */

//!
//! The registry store: the shared recently-used file, its in-memory parse,
//! and the operations consumers run against both.
//!
//! Every public operation is one critical section behind a FIFO
//! [`Mutex`]. External writers are noticed through a debounced watcher that
//! only marks the store stale; the next operation reloads lazily, routing
//! through the [`RecoveryChain`](crate::recovery::RecoveryChain) when the file
//! no longer loads.

mod error;
mod load;
mod maintain;
mod query;
mod remove;
mod watch;

pub use error::RegistryError;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use tokio::fs;

use crate::config::{RegistryPaths, StoreConfig};
use crate::events::{EventHub, RegistryEvent, SubscriptionId};
use crate::mutex::Mutex;
use crate::probe::{FileProbe, Probe};
use crate::recovery::RecoveryChain;
use crate::xbel::BookmarkFile;

use watch::WatchState;

/// File-backed registry of recently used resources.
pub struct RegistryStore {
	config: StoreConfig,
	mutex: Mutex,
	bookmarks: ArcSwap<BookmarkFile>,
	stale: Arc<AtomicBool>,
	events: Arc<EventHub>,
	probe: Arc<dyn Probe>,
	watch_state: parking_lot::Mutex<Option<WatchState>>,
	/// URIs recorded on entering private mode; `None` outside it.
	private: parking_lot::Mutex<Option<HashSet<String>>>,
}

impl RegistryStore {
	/// Opens the registry described by `config`, probing targets with
	/// [`FileProbe`].
	///
	/// The registry directory is created if needed and an unloadable main
	/// file is recovered before this returns. Must be called inside a Tokio
	/// runtime when watching is enabled.
	pub async fn open(config: StoreConfig) -> Result<Self, RegistryError> {
		Self::with_probe(config, Arc::new(FileProbe)).await
	}

	/// Like [`open`](Self::open) with a custom filesystem probe.
	pub async fn with_probe(config: StoreConfig, probe: Arc<dyn Probe>) -> Result<Self, RegistryError> {
		fs::create_dir_all(config.paths.dir()).await?;
		let recovered = RecoveryChain::new(&config.paths).load().await?;
		tracing::debug!(
			"opened {:?} with {} entries ({:?})",
			config.paths.main,
			recovered.file.len(),
			recovered.source
		);

		let store = Self {
			config,
			mutex: Mutex::new(),
			bookmarks: ArcSwap::from_pointee(recovered.file),
			stale: Arc::new(AtomicBool::new(false)),
			events: Arc::new(EventHub::new()),
			probe,
			watch_state: parking_lot::Mutex::new(None),
			private: parking_lot::Mutex::new(None),
		};
		store.attach_watcher()?;
		Ok(store)
	}

	pub fn config(&self) -> &StoreConfig {
		&self.config
	}

	pub fn paths(&self) -> &RegistryPaths {
		&self.config.paths
	}

	/// True when the in-memory view may disagree with disk. The next
	/// operation reloads.
	pub fn is_stale(&self) -> bool {
		self.stale.load(Ordering::SeqCst)
	}

	/// Forces the next operation to reload from disk.
	pub fn mark_stale(&self) {
		self.stale.store(true, Ordering::SeqCst);
	}

	/// True while the change watcher is attached.
	pub fn is_connected(&self) -> bool {
		self.watch_state.lock().is_some()
	}

	/// True while an operation is running or queued.
	pub fn is_busy(&self) -> bool {
		self.mutex.is_locked()
	}

	/// True in private mode (between `enter_private_mode` and
	/// `leave_private_mode`).
	pub fn is_private(&self) -> bool {
		self.private.lock().is_some()
	}

	/// Registers an event handler. Handlers run on the emitting task, after
	/// the operation has released the lock.
	pub fn connect<F>(&self, handler: F) -> SubscriptionId
	where
		F: Fn(&RegistryEvent) + Send + Sync + 'static,
	{
		self.events.connect(handler)
	}

	pub fn disconnect(&self, id: SubscriptionId) -> bool {
		self.events.disconnect(id)
	}

	/// Subscribes to store events through a broadcast channel.
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<RegistryEvent> {
		self.events.subscribe()
	}

	/// Tears the store down.
	///
	/// Detaches the watcher and destroys the mutex: queued operations and
	/// every later call fail with [`RegistryError::Destroyed`]. An operation
	/// already running finishes normally.
	pub fn destroy(&self) {
		self.detach_watcher();
		self.mutex.destroy();
		tracing::debug!("registry store for {:?} destroyed", self.config.paths.main);
	}
}

impl Drop for RegistryStore {
	fn drop(&mut self) {
		self.detach_watcher();
	}
}

impl std::fmt::Debug for RegistryStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegistryStore")
			.field("paths", &self.config.paths)
			.field("entries", &self.bookmarks.load().len())
			.field("stale", &self.is_stale())
			.field("connected", &self.is_connected())
			.field("events", &self.events)
			.finish_non_exhaustive()
	}
}
