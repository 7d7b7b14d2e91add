/* src/lib.rs */

//!
//! A shared, file-backed registry of recently used resources.
//!
//! The registry lives in one bookmark-exchange (`.xbel`) file that other
//! desktop processes write to at any time. This crate integrates:
//!
//! - **registry**: [`RegistryStore`], the serialized query/command interface.
//! - **mutex**: FIFO async mutual exclusion with explicit teardown.
//! - **signal**: debounced filesystem monitoring of the registry file.
//! - **recovery**: the interim → backup → fresh fallback chain.
//! - **xbel**: reading and writing the on-disk document.
//! - **probe**: live filesystem lookups used to enrich entries.
//!
//! ## Feature Flags
//!
//! - `prefs` (default): TOML-backed [`prefs::Preferences`] implementing the
//!   [`prefs::SettingsProvider`] interface, and [`prefs::LivePreferences`]
//!   which follows the file and announces changed keys.
//! - `full`: Enables all features.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use recents::{RegistryStore, StoreConfig};
//!
//! # async fn run() -> Result<(), recents::RegistryError> {
//! let store = RegistryStore::open(StoreConfig::for_file("/tmp/recently-used.xbel")).await?;
//! for item in store.get_items().await? {
//!     println!("{} ({})", item.display_name, item.content_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod blacklist;
pub mod config;
pub mod events;
pub mod item;
pub mod mutex;
pub mod probe;
pub mod recovery;
pub mod registry;
pub mod signal;
pub mod xbel;

#[cfg(feature = "prefs")]
pub mod prefs;

pub use blacklist::Blacklist;
pub use config::{RegistryPaths, StoreConfig};
pub use events::{RegistryEvent, SubscriptionId};
pub use item::RecentItem;
pub use registry::{RegistryError, RegistryStore};
