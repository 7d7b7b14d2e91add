/* src/xbel/mod.rs */

//!
//! The desktop bookmark-exchange document (`recently-used.xbel`).
//!
//! A [`BookmarkFile`] is an ordered, URI-keyed collection of [`Bookmark`]s.
//! Parsing and serialization always operate on the whole document, so a
//! persisted file is either the complete old set or the complete new set.

mod error;
mod file;
mod read;
mod time;
mod write;

pub use error::XbelError;

/// Namespace of the `bookmark:` extension elements.
pub const BOOKMARK_NAMESPACE: &str = "http://www.freedesktop.org/standards/desktop-bookmarks";
/// Namespace of the `mime:` extension elements.
pub const MIME_NAMESPACE: &str = "http://www.freedesktop.org/standards/shared-mime-info";
/// Owner of the `<metadata>` block holding the extension elements.
pub const METADATA_OWNER: &str = "http://freedesktop.org";

/// An application that registered a bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Application {
	pub name: String,
	pub exec: String,
	/// Last registration, seconds since the epoch.
	pub modified: u64,
	pub count: u32,
}

/// One persisted registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bookmark {
	pub href: String,
	pub title: Option<String>,
	pub description: Option<String>,
	pub mime_type: Option<String>,
	/// Seconds since the epoch; 0 when absent.
	pub added: u64,
	pub modified: u64,
	pub visited: u64,
	pub groups: Vec<String>,
	pub applications: Vec<Application>,
	pub private: bool,
}

impl Bookmark {
	/// Creates a bookmark with only its URI set.
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: href.into(),
			..Self::default()
		}
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
		self.mime_type = Some(mime_type.into());
		self
	}

	/// Sets both the visited and modified stamps.
	pub fn with_times(mut self, visited: u64, modified: u64) -> Self {
		self.visited = visited;
		self.modified = modified;
		self
	}
}

/// Ordered collection of bookmarks, unique by `href`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookmarkFile {
	bookmarks: Vec<Bookmark>,
}

impl BookmarkFile {
	/// Creates an empty document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a complete document.
	pub fn from_slice(input: &[u8]) -> Result<Self, XbelError> {
		read::parse(input)
	}

	/// Serializes the complete document.
	pub fn to_bytes(&self) -> Result<Vec<u8>, XbelError> {
		write::serialize(self)
	}

	pub fn len(&self) -> usize {
		self.bookmarks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bookmarks.is_empty()
	}

	pub fn contains(&self, href: &str) -> bool {
		self.position(href).is_some()
	}

	pub fn get(&self, href: &str) -> Option<&Bookmark> {
		self.bookmarks.iter().find(|b| b.href == href)
	}

	/// Iterates bookmarks in document order.
	pub fn iter(&self) -> std::slice::Iter<'_, Bookmark> {
		self.bookmarks.iter()
	}

	/// URIs in document order.
	pub fn uris(&self) -> impl Iterator<Item = &str> {
		self.bookmarks.iter().map(|b| b.href.as_str())
	}

	/// Inserts a bookmark, replacing an existing one with the same URI in
	/// place. Returns the replaced bookmark.
	pub fn insert(&mut self, bookmark: Bookmark) -> Option<Bookmark> {
		match self.position(&bookmark.href) {
			Some(index) => Some(std::mem::replace(&mut self.bookmarks[index], bookmark)),
			None => {
				self.bookmarks.push(bookmark);
				None
			}
		}
	}

	/// Removes the bookmark for `href`, keeping the order of the rest.
	pub fn remove(&mut self, href: &str) -> Option<Bookmark> {
		self.position(href).map(|index| self.bookmarks.remove(index))
	}

	fn position(&self, href: &str) -> Option<usize> {
		self.bookmarks.iter().position(|b| b.href == href)
	}
}

impl<'a> IntoIterator for &'a BookmarkFile {
	type Item = &'a Bookmark;
	type IntoIter = std::slice::Iter<'a, Bookmark>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl FromIterator<Bookmark> for BookmarkFile {
	fn from_iter<I: IntoIterator<Item = Bookmark>>(iter: I) -> Self {
		let mut file = Self::new();
		for bookmark in iter {
			file.insert(bookmark);
		}
		file
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_insert_replaces_in_place() {
		let mut file: BookmarkFile = [
			Bookmark::new("file:///a"),
			Bookmark::new("file:///b"),
			Bookmark::new("file:///c"),
		]
		.into_iter()
		.collect();

		let old = file.insert(Bookmark::new("file:///b").with_title("B"));
		assert_eq!(old, Some(Bookmark::new("file:///b")));
		assert_eq!(file.uris().collect::<Vec<_>>(), ["file:///a", "file:///b", "file:///c"]);
		assert_eq!(file.get("file:///b").and_then(|b| b.title.as_deref()), Some("B"));
	}

	#[test]
	fn test_remove_keeps_order() {
		let mut file: BookmarkFile = ["file:///a", "file:///b", "file:///c"]
			.into_iter()
			.map(Bookmark::new)
			.collect();

		assert!(file.remove("file:///b").is_some());
		assert!(file.remove("file:///missing").is_none());
		assert_eq!(file.uris().collect::<Vec<_>>(), ["file:///a", "file:///c"]);
	}
}
