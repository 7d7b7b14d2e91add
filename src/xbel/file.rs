/* src/xbel/file.rs */

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::{BookmarkFile, XbelError};

fn io_error(path: &Path, source: std::io::Error) -> XbelError {
	XbelError::Io {
		path: path.to_path_buf(),
		source,
	}
}

/// Sibling path the document is staged at before being renamed into place.
fn staging_path(path: &Path) -> PathBuf {
	let mut name = path.file_name().map(OsString::from).unwrap_or_default();
	name.push(".tmp");
	path.with_file_name(name)
}

impl BookmarkFile {
	/// Reads and parses the document at `path`.
	pub async fn load(path: impl AsRef<Path>) -> Result<Self, XbelError> {
		let path = path.as_ref();
		let bytes = match fs::read(path).await {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				return Err(XbelError::NotFound(path.to_path_buf()));
			}
			Err(e) => return Err(io_error(path, e)),
		};
		Self::from_slice(&bytes)
	}

	/// Writes the whole document to `path`.
	///
	/// The document is staged in a sibling file and renamed over `path`, so
	/// readers observe either the previous or the new content.
	pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), XbelError> {
		let path = path.as_ref();
		let bytes = self.to_bytes()?;
		let staging = staging_path(path);

		fs::write(&staging, &bytes)
			.await
			.map_err(|e| io_error(&staging, e))?;
		if let Err(e) = fs::rename(&staging, path).await {
			let _ = fs::remove_file(&staging).await;
			return Err(io_error(path, e));
		}
		Ok(())
	}
}
