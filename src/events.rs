/* src/events.rs */

//!
//! Publish/subscribe for registry events.
//!
//! Handlers registered with [`EventHub::connect`] run synchronously, in
//! registration order, on the task that emits. Async consumers can instead
//! take a broadcast receiver from [`EventHub::subscribe`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use tokio::sync::broadcast;

/// Default broadcast channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Events published by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
	/// The registry file changed on disk; a caller's last view may be stale.
	Changed,
	/// One entry was removed.
	ItemRemoved(String),
	/// Every entry was cleared.
	Purged,
}

/// Token returned by [`EventHub::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

/// Ordered registry of event handlers plus a broadcast channel.
pub struct EventHub {
	handlers: ArcSwap<Vec<(SubscriptionId, Handler)>>,
	next_id: AtomicU64,
	channel: broadcast::Sender<RegistryEvent>,
}

impl EventHub {
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_EVENT_CAPACITY)
	}

	/// Creates a hub whose broadcast channel buffers `capacity` events.
	///
	/// Note: receivers slower than the emit rate lag and lose the oldest
	/// events once the channel fills up.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			handlers: ArcSwap::from_pointee(Vec::new()),
			next_id: AtomicU64::new(1),
			channel: broadcast::channel(capacity).0,
		}
	}

	/// Registers a handler; keep the returned id to disconnect it.
	pub fn connect<F>(&self, handler: F) -> SubscriptionId
	where
		F: Fn(&RegistryEvent) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		let handler: Handler = Arc::new(handler);
		self.handlers.rcu(|current| {
			let mut next = (**current).clone();
			next.push((id, Arc::clone(&handler)));
			next
		});
		id
	}

	/// Removes a handler. Returns false if `id` was not connected.
	pub fn disconnect(&self, id: SubscriptionId) -> bool {
		let previous = self.handlers.rcu(|current| {
			let mut next = (**current).clone();
			next.retain(|(existing, _)| *existing != id);
			next
		});
		previous.iter().any(|(existing, _)| *existing == id)
	}

	/// Returns a receiver for every event emitted from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
		self.channel.subscribe()
	}

	/// Number of connected handlers.
	pub fn handler_count(&self) -> usize {
		self.handlers.load().len()
	}

	/// Delivers `event` to every handler, then to broadcast receivers.
	pub fn emit(&self, event: RegistryEvent) {
		let handlers = self.handlers.load_full();
		for (_, handler) in handlers.iter() {
			handler(&event);
		}
		let _ = self.channel.send(event);
	}
}

impl Default for EventHub {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for EventHub {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventHub")
			.field("handlers", &self.handler_count())
			.field("receivers", &self.channel.receiver_count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use parking_lot::Mutex;

	use super::*;

	#[test]
	fn test_handlers_run_in_registration_order() {
		let hub = EventHub::new();
		let seen = Arc::new(Mutex::new(Vec::new()));

		for tag in ["first", "second"] {
			let seen = Arc::clone(&seen);
			hub.connect(move |event| seen.lock().push((tag, event.clone())));
		}
		hub.emit(RegistryEvent::ItemRemoved("file:///a".to_string()));

		let item = RegistryEvent::ItemRemoved("file:///a".to_string());
		assert_eq!(*seen.lock(), vec![("first", item.clone()), ("second", item)]);
	}

	#[test]
	fn test_disconnect() {
		let hub = EventHub::new();
		let count = Arc::new(AtomicU64::new(0));
		let counter = Arc::clone(&count);
		let id = hub.connect(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		hub.emit(RegistryEvent::Changed);
		assert!(hub.disconnect(id));
		assert!(!hub.disconnect(id));
		hub.emit(RegistryEvent::Changed);

		assert_eq!(count.load(Ordering::SeqCst), 1);
		assert_eq!(hub.handler_count(), 0);
	}

	#[tokio::test]
	async fn test_broadcast_subscribers() {
		let hub = EventHub::new();
		let mut rx = hub.subscribe();
		hub.emit(RegistryEvent::Purged);
		assert_eq!(rx.recv().await.unwrap(), RegistryEvent::Purged);
	}
}
