/* src/registry/remove.rs */

use std::collections::HashSet;

use super::{RegistryError, RegistryStore};
use crate::blacklist::Blacklist;
use crate::events::RegistryEvent;
use crate::mutex::MutexGuard;

impl RegistryStore {
	/// Removes `uri` from the registry.
	///
	/// Returns false, without writing, when the entry is absent; also false
	/// when the updated registry could not be written, in which case the
	/// entry stays. Emits [`RegistryEvent::ItemRemoved`] after the lock is
	/// released.
	pub async fn remove_item(&self, uri: &str) -> Result<bool, RegistryError> {
		let removed = self.remove_items([uri]).await?;
		Ok(!removed.is_empty())
	}

	/// Removes every listed URI that is present, with a single write.
	///
	/// Returns the URIs actually removed, in request order; one
	/// [`RegistryEvent::ItemRemoved`] is emitted for each.
	pub async fn remove_items<I, S>(&self, uris: I) -> Result<Vec<String>, RegistryError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let requested: Vec<String> = uris.into_iter().map(|uri| uri.as_ref().to_string()).collect();

		let guard = self.mutex.lock().await?;
		self.refresh(&guard).await;
		let removed = self.remove_locked(requested, &guard).await;
		drop(guard);

		self.emit_removed(&removed);
		Ok(removed)
	}

	/// Evicts blacklisted entries and, in private mode, every entry added
	/// since private mode was entered.
	///
	/// Runs as one operation: reload if stale, blacklist eviction, then the
	/// private-mode diff. Returns the evicted URIs.
	pub async fn curate(&self, blacklist: &Blacklist) -> Result<Vec<String>, RegistryError> {
		let guard = self.mutex.lock().await?;
		self.refresh(&guard).await;

		let snapshot = self.bookmarks.load_full();
		let mut doomed = Vec::new();
		if !blacklist.is_empty() {
			for bookmark in snapshot.iter() {
				if let Some(item) = self.enrich(bookmark).await {
					if blacklist.matches(&item) {
						doomed.push(item.uri);
					}
				}
			}
		}
		let private = self.private.lock().clone();
		if let Some(known) = private {
			let listed: HashSet<&str> = doomed.iter().map(String::as_str).collect();
			let added: Vec<String> = snapshot
				.uris()
				.filter(|uri| !known.contains(*uri) && !listed.contains(uri))
				.map(str::to_string)
				.collect();
			doomed.extend(added);
		}

		let removed = self.remove_locked(doomed, &guard).await;
		drop(guard);

		if !removed.is_empty() {
			tracing::info!("evicted {} entries from {:?}", removed.len(), self.config.paths.main);
		}
		self.emit_removed(&removed);
		Ok(removed)
	}

	async fn remove_locked(&self, uris: Vec<String>, guard: &MutexGuard<'_>) -> Vec<String> {
		let mut next = (*self.bookmarks.load_full()).clone();
		let removed: Vec<String> = uris.into_iter().filter(|uri| next.remove(uri).is_some()).collect();
		if removed.is_empty() {
			return removed;
		}
		if self.persist(next, guard).await {
			removed
		} else {
			Vec::new()
		}
	}

	fn emit_removed(&self, removed: &[String]) {
		for uri in removed {
			self.events.emit(RegistryEvent::ItemRemoved(uri.clone()));
		}
	}
}
