/* demos/basic.rs */

use recents::prefs::{Preferences, SettingsProvider};
use recents::{RegistryEvent, RegistryPaths, RegistryStore, StoreConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// 1. Locate the registry: an explicit path, or the desktop default
	let paths = match std::env::args().nth(1) {
		Some(path) => RegistryPaths::from_main(path),
		None => RegistryPaths::user_default().ok_or("no data directory")?,
	};
	println!("Registry: {:?}", paths.main);

	// 2. Preferences (missing file means defaults)
	let prefs = Preferences::load_or_default("recents.toml").await?;

	// 3. Open and curate
	let store = RegistryStore::open(StoreConfig::new(paths)).await?;
	store.connect(|event| match event {
		RegistryEvent::Changed => println!("registry changed on disk"),
		RegistryEvent::ItemRemoved(uri) => println!("removed {}", uri),
		RegistryEvent::Purged => println!("registry purged"),
	});
	let evicted = store.curate(&prefs.blacklist()).await?;
	println!("Evicted {} blacklisted entries", evicted.len());

	// 4. List, newest first
	let mut items = store.get_items().await?;
	items.sort_by_key(|item| std::cmp::Reverse(item.last_used()));
	let shown = usize::try_from(prefs.item_count).unwrap_or(usize::MAX);
	for item in items
		.iter()
		.filter(|item| item.exists || prefs.show_deleted_files)
		.take(shown)
	{
		println!("{:<40} {}", item.display_name, item.content_type);
	}

	// 5. Watch for a while
	println!("Watching for changes for 10s...");
	tokio::time::sleep(Duration::from_secs(10)).await;

	store.destroy();
	Ok(())
}
