/* src/config.rs */

//!
//! Paths and tunables handed to [`RegistryStore`](crate::RegistryStore).

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::signal::DEFAULT_DEBOUNCE;

/// File name desktop writers use for the shared registry.
pub const REGISTRY_FILE_NAME: &str = "recently-used.xbel";

/// The three files making up one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPaths {
	/// The shared registry other processes write to.
	pub main: PathBuf,
	/// Explicit snapshot consumed by restore.
	pub backup: PathBuf,
	/// Rollback point taken right before a restore.
	pub interim: PathBuf,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
	let mut name = path.as_os_str().to_owned();
	name.push(suffix);
	PathBuf::from(name)
}

impl RegistryPaths {
	/// Derives `<main>.bak` and `<main>.bak.interims` from the main path.
	pub fn from_main(main: impl Into<PathBuf>) -> Self {
		let main = main.into();
		Self {
			backup: with_suffix(&main, ".bak"),
			interim: with_suffix(&main, ".bak.interims"),
			main,
		}
	}

	/// The per-user registry, `<data dir>/recently-used.xbel`.
	///
	/// Returns `None` when no data directory can be determined.
	pub fn user_default() -> Option<Self> {
		dirs::data_dir().map(|dir| Self::from_main(dir.join(REGISTRY_FILE_NAME)))
	}

	/// Directory holding the registry files.
	pub fn dir(&self) -> &Path {
		match self.main.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		}
	}
}

/// Configuration of a [`RegistryStore`](crate::RegistryStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
	pub paths: RegistryPaths,
	/// Quiet period before an external change marks the store stale.
	pub debounce: Duration,
	/// Whether to watch the main file for external changes.
	pub watch: bool,
}

impl StoreConfig {
	pub fn new(paths: RegistryPaths) -> Self {
		Self {
			paths,
			debounce: DEFAULT_DEBOUNCE,
			watch: true,
		}
	}

	/// Shorthand for `StoreConfig::new(RegistryPaths::from_main(main))`.
	pub fn for_file(main: impl Into<PathBuf>) -> Self {
		Self::new(RegistryPaths::from_main(main))
	}

	pub fn debounce(mut self, debounce: Duration) -> Self {
		self.debounce = debounce;
		self
	}

	pub fn watch(mut self, watch: bool) -> Self {
		self.watch = watch;
		self
	}
}
