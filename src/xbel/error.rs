/* src/xbel/error.rs */

use std::path::PathBuf;

/// Errors raised while reading or writing a bookmark document.
#[derive(Debug, thiserror::Error)]
pub enum XbelError {
	/// The document does not exist on disk.
	#[error("bookmark file not found: {}", .0.display())]
	NotFound(PathBuf),

	/// Malformed XML, invalid UTF-8 or an invalid document structure.
	#[error("parse error: {0}")]
	Parse(String),

	/// The first element is not `<xbel>`.
	#[error("unexpected root element <{0}>, expected <xbel>")]
	UnexpectedRoot(String),

	/// The input contained no root element at all.
	#[error("document has no root element")]
	MissingRoot,

	/// A `<bookmark>` element without an `href` attribute.
	#[error("bookmark without href")]
	MissingHref,

	/// Serialization failure.
	#[error("write error: {0}")]
	Write(String),

	/// IO error while reading or persisting the document.
	#[error("io error on {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}
