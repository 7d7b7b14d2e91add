/* src/signal/mod.rs */

//!
//! Change notifications for one file, settled by a quiet period.
//!
//! The OS watch is placed on the file's parent directory, so the file may be
//! deleted, recreated or renamed over without losing track of it. Each burst
//! of raw notifications becomes one [`Event`] once no further notification
//! arrived for [`Config::debounce`].

use std::path::PathBuf;
use std::time::Duration;

mod target;
mod watcher;
mod worker;

pub use watcher::Watcher;

/// Quiet period used by the registry watcher.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
	/// The watched path has no file name component.
	#[error("not a file path: {}", .0.display())]
	NotAFile(PathBuf),

	/// The directory that would hold the file does not exist.
	#[error("directory {} does not exist", .0.display())]
	MissingDirectory(PathBuf),

	#[error("notify error: {0}")]
	Notify(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, SignalError>;

/// Watcher tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Quiet period. Every notification restarts it; an event is published
	/// only once it elapses without further notifications.
	pub debounce: Duration,

	/// Merge the kinds seen during one burst into one (create then modify
	/// stays a create, anything then remove is a remove). When false the
	/// last kind wins.
	pub coalesce: bool,

	/// Publish only these kinds. `None` publishes all of them.
	pub listen_events: Option<Vec<EventKind>>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			debounce: DEFAULT_DEBOUNCE,
			coalesce: true,
			listen_events: None,
		}
	}
}

/// What happened to the watched file during a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// Created, or renamed into place.
	Create,
	Modify,
	/// Deleted, or renamed away.
	Remove,
}

/// One settled burst.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
	pub path: PathBuf,
	pub kind: EventKind,
	/// Number of raw notifications folded into this event.
	pub merged: usize,
}
