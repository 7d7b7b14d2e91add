/* src/xbel/time.rs */

use chrono::{DateTime, SecondsFormat, Utc};

/// Parses an ISO-8601 stamp into seconds since the epoch. Unparsable or
/// pre-epoch stamps read as 0, the value of an absent attribute.
pub(super) fn parse_stamp(value: &str) -> u64 {
	match DateTime::parse_from_rfc3339(value.trim()) {
		Ok(stamp) => u64::try_from(stamp.timestamp()).unwrap_or(0),
		Err(e) => {
			tracing::trace!("ignoring invalid timestamp {:?}: {}", value, e);
			0
		}
	}
}

/// Formats seconds since the epoch the way desktop writers do
/// (`2024-05-01T09:30:00.000000Z`).
pub(super) fn format_stamp(secs: u64) -> String {
	i64::try_from(secs)
		.ok()
		.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
		.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
		.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_stamp_variants() {
		assert_eq!(parse_stamp("1970-01-01T00:01:00Z"), 60);
		assert_eq!(parse_stamp("2024-05-01T09:30:00.123456Z"), 1_714_555_800);
		assert_eq!(parse_stamp("2024-05-01T11:30:00+02:00"), 1_714_555_800);
		assert_eq!(parse_stamp("yesterday"), 0);
	}

	#[test]
	fn test_format_stamp() {
		assert_eq!(format_stamp(1_714_555_800), "2024-05-01T09:30:00.000000Z");
		assert_eq!(parse_stamp(&format_stamp(1_714_555_800)), 1_714_555_800);
	}
}
