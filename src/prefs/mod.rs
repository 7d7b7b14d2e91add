/* src/prefs/mod.rs */

//!
//! Settings consumed by the registry and its front ends.
//!
//! [`SettingsProvider`] is the key-based interface the core reads through;
//! [`Preferences`] implements it on top of a TOML file using the desktop
//! setting keys (`item-count`, `item-blacklist`, ...), and
//! [`LivePreferences`] keeps it in sync with the file, announcing each
//! changed key.

mod error;
mod live;

pub use error::PrefsError;
pub use live::{LivePreferences, changed_keys};

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use validator::Validate;

use crate::blacklist::Blacklist;

pub const ITEM_COUNT: &str = "item-count";
pub const ITEM_BLACKLIST: &str = "item-blacklist";
pub const SHOW_DELETED_FILES: &str = "show-deleted-files";
pub const PRIVATE_MODE: &str = "private-mode";
pub const WINDOW_WIDTH_PERCENTAGE: &str = "window-width-percentage";

/// Read access to settings by key.
pub trait SettingsProvider {
	fn string(&self, key: &str) -> Option<String>;
	fn int(&self, key: &str) -> Option<i64>;
	fn boolean(&self, key: &str) -> Option<bool>;

	/// The parsed `item-blacklist` setting.
	fn blacklist(&self) -> Blacklist {
		self.string(ITEM_BLACKLIST)
			.map(|value| Blacklist::parse(&value))
			.unwrap_or_default()
	}
}

/// User preferences, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default, rename_all = "kebab-case")]
pub struct Preferences {
	/// Items shown per page.
	#[validate(range(min = 1, max = 100))]
	pub item_count: u32,
	/// Comma separated content classes and `.extensions` to evict.
	pub item_blacklist: String,
	pub show_deleted_files: bool,
	pub private_mode: bool,
	#[validate(range(min = 10, max = 100))]
	pub window_width_percentage: u32,
}

impl Default for Preferences {
	fn default() -> Self {
		Self {
			item_count: 10,
			item_blacklist: String::new(),
			show_deleted_files: false,
			private_mode: false,
			window_width_percentage: 30,
		}
	}
}

impl Preferences {
	/// Parses and validates a TOML document. Missing keys take defaults.
	pub fn from_toml_str(input: &str) -> Result<Self, PrefsError> {
		let prefs: Self = toml::from_str(input)?;
		prefs.validate()?;
		Ok(prefs)
	}

	/// Loads preferences from `path`.
	pub async fn load(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
		let path = path.as_ref();
		let input = tokio::fs::read_to_string(path).await.map_err(|source| PrefsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&input)
	}

	/// Loads preferences from `path`, or the defaults if it does not exist.
	pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
		match Self::load(path).await {
			Err(PrefsError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(Self::default()),
			other => other,
		}
	}
}

impl SettingsProvider for Preferences {
	fn string(&self, key: &str) -> Option<String> {
		match key {
			ITEM_BLACKLIST => Some(self.item_blacklist.clone()),
			_ => None,
		}
	}

	fn int(&self, key: &str) -> Option<i64> {
		match key {
			ITEM_COUNT => Some(i64::from(self.item_count)),
			WINDOW_WIDTH_PERCENTAGE => Some(i64::from(self.window_width_percentage)),
			_ => None,
		}
	}

	fn boolean(&self, key: &str) -> Option<bool> {
		match key {
			SHOW_DELETED_FILES => Some(self.show_deleted_files),
			PRIVATE_MODE => Some(self.private_mode),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_partial_document_takes_defaults() {
		let prefs = Preferences::from_toml_str("item-count = 25\nitem-blacklist = \"image, .iso\"\n").unwrap();
		assert_eq!(prefs.item_count, 25);
		assert_eq!(prefs.window_width_percentage, 30);
		assert_eq!(prefs.int(ITEM_COUNT), Some(25));
		assert_eq!(prefs.boolean(PRIVATE_MODE), Some(false));
		assert_eq!(prefs.string("unknown"), None);
		assert_eq!(prefs.blacklist().terms(), ["image", ".iso"]);
	}

	#[test]
	fn test_rejects_out_of_range_values() {
		let err = Preferences::from_toml_str("item-count = 0").unwrap_err();
		assert!(matches!(err, PrefsError::Validation(_)));

		let err = Preferences::from_toml_str("item-count = \"many\"").unwrap_err();
		assert!(matches!(err, PrefsError::Parse(_)));
	}

	#[tokio::test]
	async fn test_load_or_default() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("prefs.toml");
		assert_eq!(Preferences::load_or_default(&path).await.unwrap(), Preferences::default());

		tokio::fs::write(&path, "private-mode = true\n").await.unwrap();
		assert!(Preferences::load_or_default(&path).await.unwrap().private_mode);
	}
}
