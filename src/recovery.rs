/* src/recovery.rs */

//!
//! Bounded recovery of an unloadable registry file.
//!
//! When the main file is missing or does not parse, the chain tries, in
//! order: the interim backup (the newest snapshot, taken right before the
//! last restore), then the regular backup, and finally replaces the main file
//! with a fresh empty registry. Each backup is moved over the main file, so it
//! is consumed by the attempt and can never be tried twice.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use crate::config::RegistryPaths;
use crate::xbel::{BookmarkFile, XbelError};

/// A backup the chain can promote to the main file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
	Interim,
	Backup,
}

impl Fallback {
	fn path(self, paths: &RegistryPaths) -> &Path {
		match self {
			Self::Interim => &paths.interim,
			Self::Backup => &paths.backup,
		}
	}
}

/// Where the registry that was finally loaded came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySource {
	/// The main file loaded as is.
	Main,
	/// The promoted interim backup.
	Interim,
	/// The promoted regular backup.
	Backup,
	/// Nothing was loadable; a new empty registry was written.
	Fresh,
}

impl From<Fallback> for RecoverySource {
	fn from(fallback: Fallback) -> Self {
		match fallback {
			Fallback::Interim => Self::Interim,
			Fallback::Backup => Self::Backup,
		}
	}
}

/// A step taken by the chain, recorded for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
	Load(RecoverySource),
	Promote(Fallback),
	Reinitialize,
}

/// Outcome of a chain run.
#[derive(Debug, Clone)]
pub struct Recovered {
	pub file: BookmarkFile,
	pub source: RecoverySource,
	pub steps: Vec<Step>,
}

/// Picks the next backup to promote. Interim wins over the regular backup;
/// a backup already promoted once in this run is never picked again.
pub fn next_fallback(interim_exists: bool, backup_exists: bool, tried: &[Fallback]) -> Option<Fallback> {
	[(Fallback::Interim, interim_exists), (Fallback::Backup, backup_exists)]
		.into_iter()
		.find(|(fallback, exists)| *exists && !tried.contains(fallback))
		.map(|(fallback, _)| fallback)
}

enum State {
	Load(RecoverySource),
	Fallback,
	Promote(Fallback),
	Reinitialize,
}

async fn exists(path: &Path) -> bool {
	fs::try_exists(path).await.unwrap_or(false)
}

/// The recovery state machine over one set of registry paths.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryChain<'a> {
	paths: &'a RegistryPaths,
}

impl<'a> RecoveryChain<'a> {
	pub fn new(paths: &'a RegistryPaths) -> Self {
		Self { paths }
	}

	/// Loads the main file, falling back through the chain on failure.
	pub async fn load(&self) -> Result<Recovered, XbelError> {
		self.run(State::Load(RecoverySource::Main)).await
	}

	/// Runs the chain for a main file that is already known to be unloadable.
	pub async fn recover(&self) -> Result<Recovered, XbelError> {
		self.run(State::Fallback).await
	}

	async fn run(&self, mut state: State) -> Result<Recovered, XbelError> {
		let main = &self.paths.main;
		let mut steps = Vec::new();
		let mut tried = Vec::new();

		loop {
			state = match state {
				State::Load(source) => {
					steps.push(Step::Load(source));
					match BookmarkFile::load(main).await {
						Ok(file) => return Ok(Recovered { file, source, steps }),
						Err(XbelError::NotFound(_)) => {
							tracing::warn!("bookmark file {:?} doesn't exist", main);
							State::Fallback
						}
						Err(e) => {
							tracing::warn!("unusable bookmark file {:?}: {}", main, e);
							State::Fallback
						}
					}
				}
				State::Fallback => {
					let interim = exists(&self.paths.interim).await;
					let backup = exists(&self.paths.backup).await;
					match next_fallback(interim, backup, &tried) {
						Some(fallback) => State::Promote(fallback),
						None => State::Reinitialize,
					}
				}
				State::Promote(fallback) => {
					steps.push(Step::Promote(fallback));
					tried.push(fallback);
					let source = fallback.path(self.paths);
					tracing::warn!("restoring {:?} from {:?}", main, source);
					match fs::rename(source, main).await {
						Ok(()) => State::Load(fallback.into()),
						Err(e) => {
							tracing::error!("failed to move {:?} over {:?}: {}", source, main, e);
							State::Fallback
						}
					}
				}
				State::Reinitialize => {
					steps.push(Step::Reinitialize);
					self.reinitialize().await?;
					tracing::warn!("no working backup found; created a new bookmark file at {:?}", main);
					return Ok(Recovered {
						file: BookmarkFile::new(),
						source: RecoverySource::Fresh,
						steps,
					});
				}
			};
		}
	}

	async fn reinitialize(&self) -> Result<(), XbelError> {
		let main = &self.paths.main;
		match fs::remove_file(main).await {
			Ok(()) => {}
			Err(e) if e.kind() == ErrorKind::NotFound => {}
			Err(e) => tracing::error!("failed to delete broken bookmark file {:?}: {}", main, e),
		}
		BookmarkFile::new().save(main).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::xbel::Bookmark;

	const GARBAGE: &[u8] = b"<xbel version=\"1.0\"><bookmark";

	struct Fixture {
		_dir: tempfile::TempDir,
		paths: RegistryPaths,
	}

	fn fixture() -> Fixture {
		let dir = tempfile::tempdir().unwrap();
		let paths = RegistryPaths::from_main(dir.path().join("recently-used.xbel"));
		Fixture { _dir: dir, paths }
	}

	fn document(uris: &[&str]) -> Vec<u8> {
		uris.iter()
			.map(|uri| Bookmark::new(*uri))
			.collect::<BookmarkFile>()
			.to_bytes()
			.unwrap()
	}

	#[test]
	fn test_fallback_order() {
		assert_eq!(next_fallback(true, true, &[]), Some(Fallback::Interim));
		assert_eq!(next_fallback(false, true, &[]), Some(Fallback::Backup));
		assert_eq!(next_fallback(true, true, &[Fallback::Interim]), Some(Fallback::Backup));
		assert_eq!(next_fallback(true, true, &[Fallback::Interim, Fallback::Backup]), None);
		assert_eq!(next_fallback(false, false, &[]), None);
	}

	#[tokio::test]
	async fn test_healthy_main_loads_directly() {
		let fx = fixture();
		std::fs::write(&fx.paths.main, document(&["file:///a"])).unwrap();

		let recovered = RecoveryChain::new(&fx.paths).load().await.unwrap();
		assert_eq!(recovered.source, RecoverySource::Main);
		assert_eq!(recovered.steps, [Step::Load(RecoverySource::Main)]);
		assert!(recovered.file.contains("file:///a"));
	}

	#[tokio::test]
	async fn test_interim_preferred_and_consumed() {
		let fx = fixture();
		let interim = document(&["file:///interim"]);
		std::fs::write(&fx.paths.main, GARBAGE).unwrap();
		std::fs::write(&fx.paths.interim, &interim).unwrap();
		std::fs::write(&fx.paths.backup, document(&["file:///backup"])).unwrap();

		let recovered = RecoveryChain::new(&fx.paths).load().await.unwrap();
		assert_eq!(recovered.source, RecoverySource::Interim);
		assert!(recovered.file.contains("file:///interim"));
		assert_eq!(std::fs::read(&fx.paths.main).unwrap(), interim);
		assert!(!fx.paths.interim.exists());
		assert!(fx.paths.backup.exists());
	}

	#[tokio::test]
	async fn test_backup_when_no_interim() {
		let fx = fixture();
		let backup = document(&["file:///backup"]);
		std::fs::write(&fx.paths.backup, &backup).unwrap();

		let recovered = RecoveryChain::new(&fx.paths).load().await.unwrap();
		assert_eq!(recovered.source, RecoverySource::Backup);
		assert_eq!(std::fs::read(&fx.paths.main).unwrap(), backup);
		assert!(!fx.paths.backup.exists());
	}

	#[tokio::test]
	async fn test_broken_interim_falls_through_to_backup() {
		let fx = fixture();
		std::fs::write(&fx.paths.interim, GARBAGE).unwrap();
		std::fs::write(&fx.paths.backup, document(&["file:///backup"])).unwrap();

		let recovered = RecoveryChain::new(&fx.paths).recover().await.unwrap();
		assert_eq!(recovered.source, RecoverySource::Backup);
		assert_eq!(
			recovered.steps,
			[
				Step::Promote(Fallback::Interim),
				Step::Load(RecoverySource::Interim),
				Step::Promote(Fallback::Backup),
				Step::Load(RecoverySource::Backup),
			]
		);
	}

	#[tokio::test]
	async fn test_nothing_usable_reinitializes() {
		let fx = fixture();
		std::fs::write(&fx.paths.main, GARBAGE).unwrap();
		std::fs::write(&fx.paths.backup, GARBAGE).unwrap();

		let recovered = RecoveryChain::new(&fx.paths).load().await.unwrap();
		assert_eq!(recovered.source, RecoverySource::Fresh);
		assert!(recovered.file.is_empty());
		assert_eq!(recovered.steps.last(), Some(&Step::Reinitialize));
		assert!(BookmarkFile::load(&fx.paths.main).await.unwrap().is_empty());
		assert!(!fx.paths.backup.exists());
	}

	#[tokio::test]
	async fn test_no_files_at_all() {
		let fx = fixture();

		let recovered = RecoveryChain::new(&fx.paths).load().await.unwrap();
		assert_eq!(recovered.source, RecoverySource::Fresh);
		assert_eq!(
			recovered.steps,
			[Step::Load(RecoverySource::Main), Step::Reinitialize]
		);
		assert!(fx.paths.main.exists());
	}
}
