/* src/registry/load.rs */

use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::RegistryStore;
use crate::mutex::MutexGuard;
use crate::recovery::RecoveryChain;
use crate::xbel::BookmarkFile;

impl RegistryStore {
	/// Reloads from disk if the watcher reported a change since the last load.
	pub(super) async fn refresh(&self, guard: &MutexGuard<'_>) {
		if self.stale.swap(false, Ordering::SeqCst) {
			self.reload(guard).await;
		}
	}

	/// Replaces the in-memory set with the file on disk. A file that does
	/// not load goes through the recovery chain; if even that fails the
	/// store continues with an empty set.
	pub(super) async fn reload(&self, _guard: &MutexGuard<'_>) {
		let main = &self.config.paths.main;
		let error = match BookmarkFile::load(main).await {
			Ok(file) => {
				tracing::trace!("reloaded {} entries from {:?}", file.len(), main);
				self.bookmarks.store(Arc::new(file));
				return;
			}
			Err(e) => e,
		};
		tracing::warn!("not working bookmark file {:?}: {}", main, error);

		// Recovery moves files over the watched path.
		self.detach_watcher();
		let file = match RecoveryChain::new(&self.config.paths).recover().await {
			Ok(recovered) => {
				tracing::info!("recovered {:?} from {:?}", main, recovered.source);
				recovered.file
			}
			Err(e) => {
				tracing::error!("recovery of {:?} failed: {}", main, e);
				BookmarkFile::new()
			}
		};
		self.bookmarks.store(Arc::new(file));
		self.reattach_watcher();
	}

	/// Writes `file` as the new registry. The in-memory set only changes if
	/// the write succeeded.
	pub(super) async fn persist(&self, file: BookmarkFile, _guard: &MutexGuard<'_>) -> bool {
		match file.save(&self.config.paths.main).await {
			Ok(()) => {
				self.bookmarks.store(Arc::new(file));
				true
			}
			Err(e) => {
				tracing::error!("failed to write {:?}: {}", self.config.paths.main, e);
				false
			}
		}
	}
}
