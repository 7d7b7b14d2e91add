/* src/registry/error.rs */

use crate::mutex::MutexError;
use crate::signal::SignalError;
use crate::xbel::XbelError;

/// Errors surfaced by [`RegistryStore`](super::RegistryStore).
///
/// Load and write failures inside an operation are handled (recovered or
/// logged) and never reach the caller; only teardown and construction
/// problems do.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	/// The store was destroyed. Terminal; do not retry.
	#[error("registry store is destroyed")]
	Destroyed,

	/// The registry directory could not be created.
	#[error("cannot prepare registry directory: {0}")]
	Io(#[from] std::io::Error),

	/// Not even a fresh registry could be written.
	#[error("registry unavailable: {0}")]
	Unavailable(#[from] XbelError),

	/// The change watcher could not be attached.
	#[error("watch error: {0}")]
	Watch(#[from] SignalError),
}

impl From<MutexError> for RegistryError {
	fn from(err: MutexError) -> Self {
		match err {
			MutexError::Destroyed => Self::Destroyed,
		}
	}
}
