/* src/probe/error.rs */

/// A URI that could not be probed at all.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
	/// The URI does not parse or does not map to a local path.
	#[error("invalid uri {uri}: {reason}")]
	InvalidUri { uri: String, reason: String },

	/// The target exists but its metadata could not be read.
	#[error("io error probing {uri}: {source}")]
	Io {
		uri: String,
		#[source]
		source: std::io::Error,
	},
}
