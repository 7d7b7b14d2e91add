/* src/prefs/error.rs */

use std::path::PathBuf;

/// Errors raised while loading or watching preferences.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
	#[error("io error on {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("parse error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("validation failed: {0}")]
	Validation(#[from] validator::ValidationErrors),

	#[error("watch error: {0}")]
	Watch(#[from] crate::signal::SignalError),
}
