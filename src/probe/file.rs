/* src/probe/file.rs */

use std::io::ErrorKind;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::fs;
use url::Url;

use super::{Probe, ProbeError, ProbeInfo};

/// Probes `file://` URIs with `tokio::fs` metadata. Targets behind other
/// schemes are reported as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProbe;

impl FileProbe {
	pub fn new() -> Self {
		Self
	}
}

fn epoch_secs(time: std::io::Result<SystemTime>) -> u64 {
	time.ok()
		.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
		.map_or(0, |d| d.as_secs())
}

#[async_trait]
impl Probe for FileProbe {
	async fn probe(&self, uri: &str) -> Result<Option<ProbeInfo>, ProbeError> {
		let invalid = |reason: String| ProbeError::InvalidUri {
			uri: uri.to_string(),
			reason,
		};

		let url = Url::parse(uri).map_err(|e| invalid(e.to_string()))?;
		if url.scheme() != "file" {
			return Ok(None);
		}
		let path = url
			.to_file_path()
			.map_err(|()| invalid("not a local path".to_string()))?;

		let meta = match fs::metadata(&path).await {
			Ok(meta) => meta,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(source) => {
				return Err(ProbeError::Io {
					uri: uri.to_string(),
					source,
				});
			}
		};

		Ok(Some(ProbeInfo {
			accessed: epoch_secs(meta.accessed()),
			modified: epoch_secs(meta.modified()),
			content_type: meta.is_dir().then(|| "inode/directory".to_string()),
			display_name: path.file_name().map(|name| name.to_string_lossy().into_owned()),
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_probe_existing_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("photo one.JPG");
		std::fs::write(&path, b"jpeg").unwrap();
		let uri = Url::from_file_path(&path).unwrap();

		let info = FileProbe.probe(uri.as_str()).await.unwrap().unwrap();
		assert_eq!(info.display_name.as_deref(), Some("photo one.JPG"));
		assert_eq!(info.content_type, None);
		assert!(info.modified > 0);
	}

	#[tokio::test]
	async fn test_probe_directory_and_missing() {
		let dir = tempfile::tempdir().unwrap();
		let uri = Url::from_directory_path(dir.path()).unwrap();
		let info = FileProbe.probe(uri.as_str()).await.unwrap().unwrap();
		assert_eq!(info.content_type.as_deref(), Some("inode/directory"));

		let missing = Url::from_file_path(dir.path().join("missing.txt")).unwrap();
		assert_eq!(FileProbe.probe(missing.as_str()).await.unwrap(), None);
		assert_eq!(FileProbe.probe("https://example.org/a.pdf").await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_probe_malformed_uri() {
		let err = FileProbe.probe("not a uri").await.unwrap_err();
		assert!(matches!(err, ProbeError::InvalidUri { .. }));
	}
}
