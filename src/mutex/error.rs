/* src/mutex/error.rs */

/// Errors returned by [`Mutex::lock`](super::Mutex::lock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MutexError {
	/// The mutex was torn down. Terminal: retrying will fail the same way.
	#[error("mutex is destroyed")]
	Destroyed,
}
