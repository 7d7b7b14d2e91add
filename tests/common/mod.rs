/* tests/common/mod.rs */

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use recents::xbel::{Bookmark, BookmarkFile};
use recents::{RegistryEvent, RegistryPaths, RegistryStore, StoreConfig};

pub struct Fixture {
	pub dir: tempfile::TempDir,
	pub paths: RegistryPaths,
}

impl Fixture {
	pub fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		let paths = RegistryPaths::from_main(dir.path().join("recently-used.xbel"));
		Self { dir, paths }
	}

	/// Store without a watcher, so only the test decides when it goes stale.
	pub async fn open(&self) -> RegistryStore {
		RegistryStore::open(StoreConfig::new(self.paths.clone()).watch(false))
			.await
			.unwrap()
	}

	pub fn file_uri(&self, name: &str) -> String {
		url::Url::from_file_path(self.dir.path().join(name))
			.unwrap()
			.to_string()
	}
}

pub fn document(uris: &[&str]) -> Vec<u8> {
	uris.iter()
		.map(|uri| Bookmark::new(*uri))
		.collect::<BookmarkFile>()
		.to_bytes()
		.unwrap()
}

/// A valid document formatted differently from what the store writes, so a
/// rewrite is detectable byte for byte.
pub fn handwritten(uris: &[&str]) -> Vec<u8> {
	let mut out = String::from("<?xml version=\"1.0\"?>\n<xbel version=\"1.0\">");
	for uri in uris {
		out.push_str(&format!("<bookmark href=\"{uri}\"/>"));
	}
	out.push_str("</xbel>");
	out.into_bytes()
}

pub fn write(path: &Path, bytes: &[u8]) {
	std::fs::write(path, bytes).unwrap();
}

pub fn read(path: &Path) -> Vec<u8> {
	std::fs::read(path).unwrap()
}

pub async fn uris_on_disk(path: &Path) -> Vec<String> {
	BookmarkFile::load(path)
		.await
		.unwrap()
		.uris()
		.map(str::to_string)
		.collect()
}

/// Records every event the store emits.
pub fn record(store: &RegistryStore) -> Arc<Mutex<Vec<RegistryEvent>>> {
	let events = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&events);
	store.connect(move |event| sink.lock().push(event.clone()));
	events
}
