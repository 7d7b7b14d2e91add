/* src/registry/query.rs */

use super::{RegistryError, RegistryStore};
use crate::item::RecentItem;
use crate::xbel::Bookmark;

impl RegistryStore {
	/// Lists every entry, enriched with live filesystem data.
	///
	/// Reloads first if the file changed on disk. Entries whose URI cannot
	/// be probed at all are left out. Never writes to disk.
	pub async fn get_items(&self) -> Result<Vec<RecentItem>, RegistryError> {
		let guard = self.mutex.lock().await?;
		self.refresh(&guard).await;

		let snapshot = self.bookmarks.load_full();
		let mut items = Vec::with_capacity(snapshot.len());
		for bookmark in snapshot.iter() {
			if let Some(item) = self.enrich(bookmark).await {
				items.push(item);
			}
		}
		Ok(items)
	}

	/// Number of entries in the registry.
	pub async fn count(&self) -> Result<usize, RegistryError> {
		let guard = self.mutex.lock().await?;
		self.refresh(&guard).await;
		Ok(self.bookmarks.load().len())
	}

	/// True if the registry holds `uri`.
	pub async fn contains(&self, uri: &str) -> Result<bool, RegistryError> {
		let guard = self.mutex.lock().await?;
		self.refresh(&guard).await;
		Ok(self.bookmarks.load().contains(uri))
	}

	pub(super) async fn enrich(&self, bookmark: &Bookmark) -> Option<RecentItem> {
		match self.probe.probe(&bookmark.href).await {
			Ok(live) => Some(RecentItem::from_parts(bookmark, live)),
			Err(e) => {
				tracing::debug!("failed to retrieve information for {}: {}", bookmark.href, e);
				None
			}
		}
	}
}
