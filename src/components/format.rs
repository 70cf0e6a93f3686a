use chrono::{DateTime, Utc};

/// `YYYY-MM-DD HH:MM` in UTC, empty for out-of-range instants.
pub fn format_instant(millis: i64) -> String {
	DateTime::<Utc>::from_timestamp_millis(millis)
		.map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
		.unwrap_or_default()
}
