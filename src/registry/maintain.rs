/* src/registry/maintain.rs */

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::fs;

use super::{RegistryError, RegistryStore};
use crate::events::RegistryEvent;
use crate::mutex::MutexGuard;
use crate::xbel::BookmarkFile;

async fn exists(path: &Path) -> bool {
	fs::try_exists(path).await.unwrap_or(false)
}

impl RegistryStore {
	/// Clears the registry: deletes the main file and writes a fresh empty
	/// one. Emits [`RegistryEvent::Purged`] once the new file is in place.
	pub async fn purge_items(&self) -> Result<(), RegistryError> {
		let guard = self.mutex.lock().await?;
		let main = &self.config.paths.main;

		self.detach_watcher();
		match fs::remove_file(main).await {
			Ok(()) => {}
			Err(e) if e.kind() == ErrorKind::NotFound => {}
			Err(e) => tracing::error!("failed to delete {:?}: {}", main, e),
		}
		let purged = match BookmarkFile::new().save(main).await {
			Ok(()) => {
				self.bookmarks.store(Arc::new(BookmarkFile::new()));
				self.stale.store(false, Ordering::SeqCst);
				true
			}
			Err(e) => {
				tracing::error!("failed to write empty {:?}: {}", main, e);
				// Whatever is on disk now is what the next operation sees.
				self.stale.store(true, Ordering::SeqCst);
				false
			}
		};
		self.reattach_watcher();
		drop(guard);

		if purged {
			self.events.emit(RegistryEvent::Purged);
		}
		Ok(())
	}

	/// Copies the main file to the backup path. Returns false when there is
	/// no main file or the copy failed.
	pub async fn backup(&self) -> Result<bool, RegistryError> {
		let guard = self.mutex.lock().await?;
		Ok(self.backup_locked(&guard).await)
	}

	/// Puts the backup in place as the main file.
	///
	/// The current main file is first copied to the interim path so a
	/// restore that turns out broken is undone by the next recovery. The
	/// restored file is loaded before this returns. Returns false when there
	/// is no backup or a copy/move failed.
	pub async fn restore(&self) -> Result<bool, RegistryError> {
		let guard = self.mutex.lock().await?;
		Ok(self.restore_locked(&guard).await)
	}

	/// Starts suspending history: backs the registry up and remembers its
	/// current entries so [`curate`](Self::curate) can evict later additions.
	pub async fn enter_private_mode(&self) -> Result<bool, RegistryError> {
		let guard = self.mutex.lock().await?;
		self.refresh(&guard).await;

		let known: HashSet<String> = self.bookmarks.load().uris().map(str::to_string).collect();
		let backed_up = self.backup_locked(&guard).await;
		*self.private.lock() = Some(known);
		Ok(backed_up)
	}

	/// Ends private mode by restoring the backup taken on entry, discarding
	/// everything recorded in between.
	pub async fn leave_private_mode(&self) -> Result<bool, RegistryError> {
		let guard = self.mutex.lock().await?;
		*self.private.lock() = None;
		Ok(self.restore_locked(&guard).await)
	}

	async fn backup_locked(&self, _guard: &MutexGuard<'_>) -> bool {
		let paths = &self.config.paths;
		if !exists(&paths.main).await {
			return false;
		}

		let copied = match fs::copy(&paths.main, &paths.backup).await {
			Ok(_) => true,
			Err(e) => {
				tracing::error!("failed to back up {:?}: {}", paths.main, e);
				false
			}
		};
		self.reattach_watcher();
		copied
	}

	async fn restore_locked(&self, guard: &MutexGuard<'_>) -> bool {
		let paths = &self.config.paths;
		if !exists(&paths.backup).await {
			return false;
		}

		self.detach_watcher();
		let restored = self.swap_in_backup().await;
		if restored {
			self.reload(guard).await;
			self.stale.store(false, Ordering::SeqCst);
		}
		self.reattach_watcher();
		restored
	}

	async fn swap_in_backup(&self) -> bool {
		let paths = &self.config.paths;
		// Copy, not move: the main path must stay occupied.
		if exists(&paths.main).await {
			if let Err(e) = fs::copy(&paths.main, &paths.interim).await {
				tracing::error!("failed to save interim copy of {:?}: {}", paths.main, e);
				return false;
			}
		}
		if let Err(e) = fs::rename(&paths.backup, &paths.main).await {
			tracing::error!("failed to restore {:?} from {:?}: {}", paths.main, paths.backup, e);
			return false;
		}
		true
	}
}
