/* src/probe/mod.rs */

//!
//! Live filesystem lookups used to enrich registry entries.

mod error;
mod file;
mod memory;

pub use error::ProbeError;
pub use file::FileProbe;
pub use memory::MemoryProbe;

use async_trait::async_trait;

/// What the filesystem currently reports about a URI's target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeInfo {
	/// Last access, seconds since the epoch.
	pub accessed: u64,
	/// Last modification, seconds since the epoch.
	pub modified: u64,
	pub content_type: Option<String>,
	pub display_name: Option<String>,
}

/// Resolves a URI against the live filesystem.
#[async_trait]
pub trait Probe: Send + Sync {
	/// Returns `Ok(None)` when the target does not exist and an error when
	/// the URI cannot be probed at all.
	async fn probe(&self, uri: &str) -> Result<Option<ProbeInfo>, ProbeError>;
}
