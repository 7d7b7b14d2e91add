/* src/signal/target.rs */

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{Result, SignalError};

/// A single file, watched through its parent directory so that the file
/// may be deleted, recreated or renamed over without losing the watch.
#[derive(Debug, Clone)]
pub(crate) struct FileTarget {
	path: PathBuf,
	parent: PathBuf,
	name: OsString,
}

impl FileTarget {
	pub(crate) fn new(path: PathBuf) -> Result<Self> {
		let name = path
			.file_name()
			.map(OsString::from)
			.ok_or_else(|| SignalError::NotAFile(path.clone()))?;
		let parent = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
			_ => PathBuf::from("."),
		};
		Ok(Self { path, parent, name })
	}

	pub(crate) fn path(&self) -> &Path {
		&self.path
	}

	/// Directory handed to the OS watcher.
	pub(crate) fn watch_dir(&self) -> &Path {
		&self.parent
	}

	/// Notifications carry absolute paths; the parent is watched
	/// non-recursively, so the file name identifies the target.
	pub(crate) fn matches(&self, path: &Path) -> bool {
		path.file_name() == Some(self.name.as_os_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_matches_by_name() {
		let target = FileTarget::new(PathBuf::from("/data/recently-used.xbel")).unwrap();
		assert_eq!(target.watch_dir(), Path::new("/data"));
		assert!(target.matches(Path::new("/data/recently-used.xbel")));
		assert!(!target.matches(Path::new("/data/recently-used.xbel.tmp")));
		assert!(!target.matches(Path::new("/data/recently-used.xbel.bak")));
	}

	#[test]
	fn test_relative_and_invalid_paths() {
		let target = FileTarget::new(PathBuf::from("registry.xbel")).unwrap();
		assert_eq!(target.watch_dir(), Path::new("."));
		assert!(FileTarget::new(PathBuf::from("/")).is_err());
	}
}
