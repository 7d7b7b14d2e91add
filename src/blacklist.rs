/* src/blacklist.rs */

//!
//! Terms that keep items out of the registry.

use crate::item::RecentItem;

/// A list of content classes (`image`, `video`, ...) and extensions
/// (`.iso`, `.tmp`, ...) whose items get evicted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
	terms: Vec<String>,
}

impl Blacklist {
	/// Parses a comma separated setting value. Terms are lower-cased and
	/// all whitespace is dropped.
	pub fn parse(value: &str) -> Self {
		let compact: String = value
			.chars()
			.filter(|c| !c.is_whitespace())
			.flat_map(char::to_lowercase)
			.collect();
		let terms = compact
			.split(',')
			.filter(|term| !term.is_empty())
			.map(str::to_string)
			.collect();
		Self { terms }
	}

	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}

	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	/// True if the item's content class or `.extension` is listed.
	pub fn matches(&self, item: &RecentItem) -> bool {
		let class = item.content_class();
		self.terms.iter().any(|term| {
			term == class || term.strip_prefix('.').is_some_and(|ext| !ext.is_empty() && ext == item.extension)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::xbel::Bookmark;

	fn item(uri: &str) -> RecentItem {
		RecentItem::from_parts(&Bookmark::new(uri), None)
	}

	#[test]
	fn test_parse_normalizes() {
		let list = Blacklist::parse(" Image , .ISO,,\t.tmp ");
		assert_eq!(list.terms(), ["image", ".iso", ".tmp"]);
		assert!(Blacklist::parse("  ").is_empty());
	}

	#[test]
	fn test_matches_class_or_extension() {
		let list = Blacklist::parse("image, .iso");
		assert!(list.matches(&item("file:///p/cat.png")));
		assert!(list.matches(&item("file:///d/debian.ISO")));
		assert!(!list.matches(&item("file:///d/notes.txt")));
		assert!(!list.matches(&item("file:///d/README")));
	}
}
