/* src/signal/watcher.rs */

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher as _};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::target::FileTarget;
use super::worker::process_events;
use super::{Config, Event, Result, SignalError};

const RAW_CAPACITY: usize = 100;
const SETTLED_CAPACITY: usize = 16;

/// Publishes settled change events for one file.
///
/// Must be created inside a Tokio runtime. Dropping it, or calling
/// [`stop`](Self::stop), ends monitoring.
pub struct Watcher {
	_os_watch: RecommendedWatcher,
	debouncer: JoinHandle<()>,
	settled: broadcast::Sender<Event>,
	path: PathBuf,
}

impl Watcher {
	/// Starts watching `path`. The file itself may be absent, but the
	/// directory holding it must exist.
	#[must_use = "monitoring stops when the watcher is dropped"]
	pub fn new(path: impl Into<PathBuf>, config: Config) -> Result<Self> {
		let target = FileTarget::new(path.into())?;
		let dir = target.watch_dir();
		if !dir.is_dir() {
			return Err(SignalError::MissingDirectory(dir.to_path_buf()));
		}

		let (raw_tx, raw_rx) = mpsc::channel(RAW_CAPACITY);
		let mut os_watch = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
			let _ = raw_tx.blocking_send(res);
		})?;
		os_watch.watch(dir, RecursiveMode::NonRecursive)?;

		let path = target.path().to_path_buf();
		let (settled, _) = broadcast::channel(SETTLED_CAPACITY);
		let debouncer = tokio::spawn(process_events(raw_rx, settled.clone(), target, config));

		tracing::debug!("watching {:?}", path);
		Ok(Self {
			_os_watch: os_watch,
			debouncer,
			settled,
			path,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Receives every event settled from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.settled.subscribe()
	}

	/// Stops publishing. A burst still settling is discarded.
	pub fn stop(&self) {
		if !self.debouncer.is_finished() {
			tracing::debug!("stopped watching {:?}", self.path);
		}
		self.debouncer.abort();
	}
}

impl Drop for Watcher {
	fn drop(&mut self) {
		self.debouncer.abort();
	}
}

impl std::fmt::Debug for Watcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Watcher")
			.field("path", &self.path)
			.field("running", &!self.debouncer.is_finished())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[tokio::test]
	async fn test_rejects_missing_directory() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing").join("file.xbel");
		let err = Watcher::new(path, Config::default()).unwrap_err();
		assert!(matches!(err, SignalError::MissingDirectory(ref d) if d.ends_with("missing")));
	}

	#[tokio::test]
	async fn test_reports_write_to_watched_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("watched.xbel");
		let config = Config {
			debounce: Duration::from_millis(50),
			..Config::default()
		};
		let watcher = Watcher::new(&path, config).unwrap();
		let mut events = watcher.subscribe();

		tokio::fs::write(dir.path().join("other.txt"), b"noise").await.unwrap();
		tokio::fs::write(&path, b"<xbel/>").await.unwrap();

		let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
			.await
			.expect("no event within 5s")
			.unwrap();
		assert_eq!(event.path, path);
		assert!(event.merged >= 1);
	}
}
