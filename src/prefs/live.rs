/* src/prefs/live.rs */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;

use super::{
	ITEM_BLACKLIST, ITEM_COUNT, PRIVATE_MODE, PrefsError, Preferences, SHOW_DELETED_FILES, SettingsProvider,
	WINDOW_WIDTH_PERCENTAGE,
};
use crate::signal::{Config as WatcherConfig, Watcher};

/// Setting keys whose values differ between `old` and `new`.
pub fn changed_keys(old: &Preferences, new: &Preferences) -> Vec<&'static str> {
	let mut keys = Vec::new();
	if old.item_count != new.item_count {
		keys.push(ITEM_COUNT);
	}
	if old.item_blacklist != new.item_blacklist {
		keys.push(ITEM_BLACKLIST);
	}
	if old.show_deleted_files != new.show_deleted_files {
		keys.push(SHOW_DELETED_FILES);
	}
	if old.private_mode != new.private_mode {
		keys.push(PRIVATE_MODE);
	}
	if old.window_width_percentage != new.window_width_percentage {
		keys.push(WINDOW_WIDTH_PERCENTAGE);
	}
	keys
}

struct Shared {
	path: PathBuf,
	current: ArcSwap<Preferences>,
	changed: broadcast::Sender<&'static str>,
}

impl Shared {
	/// Loads the file and publishes one `changed` key per differing value.
	/// A file that fails to load leaves the current values in place.
	async fn reload(&self) -> Result<Vec<&'static str>, PrefsError> {
		let next = Preferences::load_or_default(&self.path).await?;
		let keys = changed_keys(&self.current.load(), &next);
		self.current.store(Arc::new(next));
		for key in &keys {
			let _ = self.changed.send(*key);
		}
		Ok(keys)
	}
}

/// Preferences that follow their file on disk.
///
/// Edits to the TOML file are picked up after the watcher's quiet period and
/// announced per key through [`subscribe`](Self::subscribe).
pub struct LivePreferences {
	shared: Arc<Shared>,
	watcher: Option<Watcher>,
	abort_handle: Option<AbortHandle>,
}

impl LivePreferences {
	/// Loads `path` (defaults if absent) without watching it.
	pub async fn load(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
		let path = path.into();
		let current = Preferences::load_or_default(&path).await?;
		let (changed, _) = broadcast::channel(16);
		Ok(Self {
			shared: Arc::new(Shared {
				path,
				current: ArcSwap::from_pointee(current),
				changed,
			}),
			watcher: None,
			abort_handle: None,
		})
	}

	/// Loads `path` and reloads it whenever it changes.
	pub async fn watch(path: impl Into<PathBuf>, config: WatcherConfig) -> Result<Self, PrefsError> {
		let mut prefs = Self::load(path).await?;
		prefs.start_watching(config)?;
		Ok(prefs)
	}

	/// Attaches a watcher to the preferences file. Must run inside a Tokio
	/// runtime.
	pub fn start_watching(&mut self, config: WatcherConfig) -> Result<(), PrefsError> {
		self.stop_watching();

		let watcher = Watcher::new(&self.shared.path, config)?;
		let mut rx = watcher.subscribe();
		let shared = Arc::clone(&self.shared);

		let handle = tokio::spawn(async move {
			while let Ok(_event) = rx.recv().await {
				match shared.reload().await {
					Ok(keys) if !keys.is_empty() => tracing::debug!("preferences changed: {:?}", keys),
					Ok(_) => {}
					Err(e) => tracing::warn!("keeping previous preferences: {}", e),
				}
			}
		});

		self.abort_handle = Some(handle.abort_handle());
		self.watcher = Some(watcher);
		Ok(())
	}

	pub fn stop_watching(&mut self) {
		if let Some(watcher) = self.watcher.take() {
			watcher.stop();
		}
		if let Some(handle) = self.abort_handle.take() {
			handle.abort();
		}
	}

	pub fn is_watching(&self) -> bool {
		self.watcher.is_some()
	}

	pub fn path(&self) -> &Path {
		&self.shared.path
	}

	/// The current values.
	pub fn get(&self) -> Arc<Preferences> {
		self.shared.current.load_full()
	}

	/// Re-reads the file now. Returns the keys that changed.
	pub async fn reload(&self) -> Result<Vec<&'static str>, PrefsError> {
		self.shared.reload().await
	}

	/// Receives the key of every setting that changes from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<&'static str> {
		self.shared.changed.subscribe()
	}
}

impl Drop for LivePreferences {
	fn drop(&mut self) {
		self.stop_watching();
	}
}

impl SettingsProvider for LivePreferences {
	fn string(&self, key: &str) -> Option<String> {
		self.shared.current.load().string(key)
	}

	fn int(&self, key: &str) -> Option<i64> {
		self.shared.current.load().int(key)
	}

	fn boolean(&self, key: &str) -> Option<bool> {
		self.shared.current.load().boolean(key)
	}
}

impl std::fmt::Debug for LivePreferences {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LivePreferences")
			.field("path", &self.shared.path)
			.field("current", &self.shared.current.load())
			.field("watching", &self.is_watching())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[test]
	fn test_changed_keys() {
		let old = Preferences::default();
		let new = Preferences {
			item_count: 20,
			private_mode: true,
			..Preferences::default()
		};
		assert_eq!(changed_keys(&old, &new), [ITEM_COUNT, PRIVATE_MODE]);
		assert!(changed_keys(&new, &new).is_empty());
	}

	#[tokio::test]
	async fn test_reload_announces_keys() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("prefs.toml");
		let prefs = LivePreferences::load(&path).await.unwrap();
		let mut rx = prefs.subscribe();

		tokio::fs::write(&path, "item-blacklist = \"video\"\n").await.unwrap();
		assert_eq!(prefs.reload().await.unwrap(), [ITEM_BLACKLIST]);
		assert_eq!(rx.recv().await.unwrap(), ITEM_BLACKLIST);
		assert_eq!(prefs.blacklist().terms(), ["video"]);

		tokio::fs::write(&path, "item-count = 0\n").await.unwrap();
		assert!(prefs.reload().await.is_err());
		assert_eq!(prefs.get().item_blacklist, "video");
	}

	#[tokio::test]
	async fn test_watch_follows_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("prefs.toml");
		let config = WatcherConfig {
			debounce: Duration::from_millis(50),
			..WatcherConfig::default()
		};
		let prefs = LivePreferences::watch(&path, config).await.unwrap();
		assert!(prefs.is_watching());
		let mut rx = prefs.subscribe();

		tokio::fs::write(&path, "show-deleted-files = true\n").await.unwrap();
		let key = tokio::time::timeout(Duration::from_secs(5), rx.recv())
			.await
			.expect("no change within 5s")
			.unwrap();
		assert_eq!(key, SHOW_DELETED_FILES);
		assert_eq!(prefs.boolean(SHOW_DELETED_FILES), Some(true));
	}
}
