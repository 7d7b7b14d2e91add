/* src/item.rs */

//!
//! The enriched view of a registry entry handed to consumers.

use crate::probe::ProbeInfo;
use crate::xbel::Bookmark;

/// Content type used when nothing better is known.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A recently used resource, derived at query time.
///
/// Only `uri` is stable. Every other field is partly derived from the live
/// filesystem and may differ between two queries of an unchanged registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentItem {
	pub uri: String,
	/// Whether the target existed when the item was built.
	pub exists: bool,
	pub display_name: String,
	/// Seconds since the epoch; the later of the recorded and live values.
	pub visited: u64,
	pub modified: u64,
	/// Lower-cased suffix of `display_name`, without the dot.
	pub extension: String,
	pub content_type: String,
}

impl RecentItem {
	/// Combines a registry entry with what the filesystem reports.
	///
	/// The display name prefers the recorded title, then the live name, then
	/// the last URI segment. The content type prefers the live value, then the
	/// recorded one, then a guess from the extension.
	pub fn from_parts(bookmark: &Bookmark, live: Option<ProbeInfo>) -> Self {
		let exists = live.is_some();
		let mut visited = bookmark.visited;
		let mut modified = bookmark.modified;
		let mut display_name = bookmark.title.clone().filter(|title| !title.is_empty());
		let mut content_type = None;

		if let Some(info) = live {
			visited = visited.max(info.accessed);
			modified = modified.max(info.modified);
			display_name = display_name.or(info.display_name.filter(|name| !name.is_empty()));
			content_type = info.content_type;
		}

		let display_name = display_name.unwrap_or_else(|| name_from_uri(&bookmark.href));
		let extension = file_extension(&display_name);
		let content_type = content_type
			.or_else(|| bookmark.mime_type.clone())
			.unwrap_or_else(|| guess_content_type(&extension).to_string());

		Self {
			uri: bookmark.href.clone(),
			exists,
			display_name,
			visited,
			modified,
			extension,
			content_type,
		}
	}

	/// Most recent of `visited` and `modified`; the natural sort key.
	pub fn last_used(&self) -> u64 {
		self.visited.max(self.modified)
	}

	/// The part of the content type before the `/`.
	pub fn content_class(&self) -> &str {
		self.content_type.split('/').next().unwrap_or_default()
	}
}

/// Lower-cased text after the last `.`; empty if there is none.
pub fn file_extension(name: &str) -> String {
	match name.rsplit_once('.') {
		Some((_, ext)) => ext.to_lowercase(),
		None => String::new(),
	}
}

/// Guesses a content type from a lower-cased extension.
pub fn guess_content_type(extension: &str) -> &'static str {
	match extension {
		"png" => "image/png",
		"jpg" | "jpeg" => "image/jpeg",
		"gif" => "image/gif",
		"bmp" => "image/bmp",
		"svg" => "image/svg+xml",
		"mp4" => "video/mp4",
		"avi" => "video/avi",
		"mkv" => "video/mkv",
		"webm" => "video/webm",
		"mov" => "video/mov",
		"mp3" => "audio/mp3",
		"wav" => "audio/wav",
		"ogg" => "audio/ogg",
		"flac" => "audio/flac",
		"aac" => "audio/aac",
		_ => FALLBACK_CONTENT_TYPE,
	}
}

/// Percent-decoded last path segment of a URI.
pub fn name_from_uri(uri: &str) -> String {
	let decoded = urlencoding::decode(uri).map_or_else(|_| uri.into(), |s| s);
	match decoded.rsplit_once('/') {
		Some((_, name)) => name.to_string(),
		None => decoded.into_owned(),
	}
}
