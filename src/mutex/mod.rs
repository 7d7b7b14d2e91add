/* src/mutex/mod.rs */

//!
//! Asynchronous mutual exclusion with a strict FIFO waiter queue and
//! explicit teardown.
//!
//! Unlike `tokio::sync::Mutex`, this lock guards no data: it serializes whole
//! operations. A released lock is handed directly to the oldest waiter, and
//! [`Mutex::destroy`] rejects every queued and future acquisition.

mod error;

pub use error::MutexError;

use std::collections::VecDeque;
use std::future::Future;

use tokio::sync::oneshot;

#[derive(Debug, Default)]
struct State {
	locked: bool,
	destroyed: bool,
	waiters: VecDeque<oneshot::Sender<()>>,
}

/// FIFO mutex handing the lock to waiters in arrival order.
#[derive(Debug, Default)]
pub struct Mutex {
	state: parking_lot::Mutex<State>,
}

/// Unlock capability returned by [`Mutex::lock`].
///
/// Dropping the guard releases the lock, so every exit path of a critical
/// section (success, `?`, early return, panic) hands it on.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct MutexGuard<'a> {
	mutex: &'a Mutex,
}

impl Drop for MutexGuard<'_> {
	fn drop(&mut self) {
		self.mutex.release();
	}
}

enum Ticket<'a> {
	Granted(MutexGuard<'a>),
	Queued(Waiting<'a>),
	Destroyed,
}

/// A queued acquisition. If dropped after the lock was handed to it but
/// before it was observed, the lock is passed on instead of leaking.
struct Waiting<'a> {
	mutex: &'a Mutex,
	rx: oneshot::Receiver<()>,
	settled: bool,
}

impl<'a> Waiting<'a> {
	async fn wait(&mut self) -> Result<MutexGuard<'a>, MutexError> {
		let granted = (&mut self.rx).await;
		self.settled = true;
		match granted {
			Ok(()) => Ok(MutexGuard { mutex: self.mutex }),
			// Sender dropped: the queue was drained by destroy().
			Err(_) => Err(MutexError::Destroyed),
		}
	}
}

impl Drop for Waiting<'_> {
	fn drop(&mut self) {
		if self.settled {
			return;
		}
		self.rx.close();
		if self.rx.try_recv().is_ok() {
			self.mutex.release();
		}
	}
}

impl Mutex {
	/// Creates an unlocked mutex.
	pub fn new() -> Self {
		Self::default()
	}

	/// Acquires the lock.
	///
	/// The caller's place in the queue is taken when `lock` is called, not
	/// when the returned future is first polled. Fails immediately with
	/// [`MutexError::Destroyed`] after [`destroy`](Self::destroy), and a
	/// pending acquisition fails with the same error when the mutex is
	/// destroyed while it waits.
	pub fn lock(&self) -> impl Future<Output = Result<MutexGuard<'_>, MutexError>> + Send + '_ {
		let ticket = self.enqueue();
		async move {
			match ticket {
				Ticket::Granted(guard) => Ok(guard),
				Ticket::Queued(mut waiting) => waiting.wait().await,
				Ticket::Destroyed => Err(MutexError::Destroyed),
			}
		}
	}

	/// Returns true while some caller holds the lock.
	pub fn is_locked(&self) -> bool {
		self.state.lock().locked
	}

	/// Returns true once [`destroy`](Self::destroy) has been called.
	pub fn is_destroyed(&self) -> bool {
		self.state.lock().destroyed
	}

	/// Number of callers currently waiting for the lock.
	pub fn queued(&self) -> usize {
		let state = self.state.lock();
		state.waiters.iter().filter(|tx| !tx.is_closed()).count()
	}

	/// Tears the mutex down.
	///
	/// Every queued waiter is rejected and later calls to [`lock`](Self::lock)
	/// fail immediately. A holder inside its critical section is not
	/// interrupted, but its release becomes a no-op.
	pub fn destroy(&self) {
		let rejected = {
			let mut state = self.state.lock();
			state.destroyed = true;
			std::mem::take(&mut state.waiters)
		};
		if !rejected.is_empty() {
			tracing::debug!("mutex destroyed with {} pending waiter(s)", rejected.len());
		}
		// Dropping the senders wakes every waiter with an error.
		drop(rejected);
	}

	fn enqueue(&self) -> Ticket<'_> {
		let mut state = self.state.lock();
		if state.destroyed {
			return Ticket::Destroyed;
		}
		if !state.locked {
			state.locked = true;
			return Ticket::Granted(MutexGuard { mutex: self });
		}
		let (tx, rx) = oneshot::channel();
		state.waiters.push_back(tx);
		Ticket::Queued(Waiting {
			mutex: self,
			rx,
			settled: false,
		})
	}

	fn release(&self) {
		let mut state = self.state.lock();
		if state.destroyed {
			return;
		}
		// Hand off without unlocking; skip waiters that gave up.
		while let Some(next) = state.waiters.pop_front() {
			if next.send(()).is_ok() {
				return;
			}
		}
		state.locked = false;
	}
}
