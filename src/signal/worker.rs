/* src/signal/worker.rs */

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use super::target::FileTarget;
use super::{Config, Event, EventKind};

struct DebounceState {
	last_seen: Instant,
	kind: EventKind,
	merged: usize,
}

pub(crate) async fn process_events(
	mut raw_rx: mpsc::Receiver<notify::Result<notify::Event>>,
	user_tx: broadcast::Sender<Event>,
	target: FileTarget,
	config: Config,
) {
	let mut pending: Option<DebounceState> = None;

	loop {
		let deadline = pending.as_ref().map(|state| state.last_seen + config.debounce);

		tokio::select! {
			maybe_event = raw_rx.recv() => {
				match maybe_event {
					Some(Ok(event)) => handle_raw_event(event, &mut pending, &target, &config),
					Some(Err(e)) => tracing::error!("Notify error: {:?}", e),
					None => break,
				}
			}
			_ = quiet_period(deadline) => {
				if let Some(state) = pending.take() {
					flush(state, &user_tx, &target, &config);
				}
			}
		}
	}
}

/// Resolves at `deadline`, or never when nothing is pending.
async fn quiet_period(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => tokio::time::sleep_until(deadline).await,
		None => std::future::pending().await,
	}
}

fn handle_raw_event(
	event: notify::Event,
	pending: &mut Option<DebounceState>,
	target: &FileTarget,
	config: &Config,
) {
	use notify::EventKind as NK;
	use notify::event::{ModifyKind, RenameMode};

	let kind = match event.kind {
		NK::Create(_) => EventKind::Create,
		NK::Modify(ModifyKind::Name(RenameMode::From)) => EventKind::Remove,
		NK::Modify(ModifyKind::Name(RenameMode::To)) => EventKind::Create,
		NK::Modify(_) => EventKind::Modify,
		NK::Remove(_) => EventKind::Remove,
		_ => return,
	};

	if !event.paths.iter().any(|path| target.matches(path)) {
		return;
	}

	let now = Instant::now();
	match pending {
		Some(state) => {
			state.last_seen = now;
			state.merged += 1;

			if !config.coalesce {
				state.kind = kind;
				return;
			}

			match (state.kind, kind) {
				(EventKind::Create, EventKind::Modify) => { /* Keep Create */ }
				(EventKind::Remove, EventKind::Modify) => {
					// Ignore noise
				}
				_ => {
					state.kind = kind;
				}
			}
		}
		None => {
			*pending = Some(DebounceState {
				last_seen: now,
				kind,
				merged: 1,
			});
		}
	}
}

fn flush(state: DebounceState, tx: &broadcast::Sender<Event>, target: &FileTarget, config: &Config) {
	let allowed = match &config.listen_events {
		None => true,
		Some(list) => list.contains(&state.kind),
	};
	if !allowed {
		return;
	}

	tracing::trace!(
		"{:?} settled after {} notification(s): {:?}",
		target.path(),
		state.merged,
		state.kind
	);
	let _ = tx.send(Event {
		path: target.path().to_path_buf(),
		kind: state.kind,
		merged: state.merged,
	});
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;
	use std::time::Duration;

	use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};

	use super::*;

	const WATCHED: &str = "/data/recently-used.xbel";

	fn raw(kind: notify::EventKind, path: &str) -> notify::Result<notify::Event> {
		Ok(notify::Event::new(kind).add_path(PathBuf::from(path)))
	}

	fn modify() -> notify::EventKind {
		notify::EventKind::Modify(ModifyKind::Data(DataChange::Content))
	}

	fn spawn_worker(config: Config) -> (mpsc::Sender<notify::Result<notify::Event>>, broadcast::Receiver<Event>) {
		let (raw_tx, raw_rx) = mpsc::channel(100);
		let (user_tx, user_rx) = broadcast::channel(100);
		let target = FileTarget::new(PathBuf::from(WATCHED)).unwrap();
		tokio::spawn(process_events(raw_rx, user_tx, target, config));
		(raw_tx, user_rx)
	}

	#[tokio::test(start_paused = true)]
	async fn test_burst_yields_one_event() {
		let (raw_tx, mut rx) = spawn_worker(Config::default());

		for _ in 0..10 {
			raw_tx.send(raw(modify(), WATCHED)).await.unwrap();
			tokio::time::sleep(Duration::from_millis(100)).await;
		}
		tokio::time::sleep(Duration::from_millis(400)).await;

		let event = rx.try_recv().unwrap();
		assert_eq!(event.kind, EventKind::Modify);
		assert_eq!(event.merged, 10);
		assert!(rx.try_recv().is_err());
	}

	#[tokio::test(start_paused = true)]
	async fn test_each_notification_restarts_timer() {
		let (raw_tx, mut rx) = spawn_worker(Config::default());

		raw_tx.send(raw(modify(), WATCHED)).await.unwrap();
		tokio::time::sleep(Duration::from_millis(250)).await;
		raw_tx.send(raw(modify(), WATCHED)).await.unwrap();
		tokio::time::sleep(Duration::from_millis(250)).await;
		assert!(rx.try_recv().is_err());

		tokio::time::sleep(Duration::from_millis(100)).await;
		assert_eq!(rx.try_recv().unwrap().merged, 2);
	}

	#[tokio::test(start_paused = true)]
	async fn test_separate_bursts_and_foreign_paths() {
		let (raw_tx, mut rx) = spawn_worker(Config::default());

		raw_tx.send(raw(modify(), "/data/other.xbel")).await.unwrap();
		tokio::time::sleep(Duration::from_millis(400)).await;
		assert!(rx.try_recv().is_err());

		raw_tx
			.send(raw(notify::EventKind::Create(CreateKind::File), WATCHED))
			.await
			.unwrap();
		raw_tx.send(raw(modify(), WATCHED)).await.unwrap();
		tokio::time::sleep(Duration::from_millis(400)).await;
		assert_eq!(rx.try_recv().unwrap().kind, EventKind::Create);

		raw_tx.send(raw(modify(), WATCHED)).await.unwrap();
		raw_tx
			.send(raw(notify::EventKind::Remove(RemoveKind::File), WATCHED))
			.await
			.unwrap();
		tokio::time::sleep(Duration::from_millis(400)).await;
		assert_eq!(rx.try_recv().unwrap().kind, EventKind::Remove);
	}

	#[tokio::test(start_paused = true)]
	async fn test_listen_filter() {
		let config = Config {
			listen_events: Some(vec![EventKind::Remove]),
			..Config::default()
		};
		let (raw_tx, mut rx) = spawn_worker(config);

		raw_tx.send(raw(modify(), WATCHED)).await.unwrap();
		tokio::time::sleep(Duration::from_millis(400)).await;
		assert!(rx.try_recv().is_err());
	}
}
