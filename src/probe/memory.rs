/* src/probe/memory.rs */

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{Probe, ProbeError, ProbeInfo};

/// A probe answering from a fixed table, useful for tests and for hosts
/// that resolve URIs themselves.
#[derive(Debug, Default)]
pub struct MemoryProbe {
	entries: BTreeMap<String, ProbeInfo>,
	broken: Vec<String>,
}

impl MemoryProbe {
	/// Creates a probe that reports every URI as missing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reports `uri` as existing with `info`.
	pub fn insert(&mut self, uri: &str, info: ProbeInfo) {
		self.entries.insert(uri.to_string(), info);
	}

	/// Makes probing `uri` fail.
	pub fn fail(&mut self, uri: &str) {
		self.broken.push(uri.to_string());
	}
}

#[async_trait]
impl Probe for MemoryProbe {
	async fn probe(&self, uri: &str) -> Result<Option<ProbeInfo>, ProbeError> {
		if self.broken.iter().any(|broken| broken == uri) {
			return Err(ProbeError::InvalidUri {
				uri: uri.to_string(),
				reason: "marked unprobeable".to_string(),
			});
		}
		Ok(self.entries.get(uri).cloned())
	}
}
