/// Absolute instants used for publish gating are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Wall-clock time shown on the display and stamped into payloads.
pub type LocalTime = chrono::DateTime<chrono::Local>;

/// `YYYY-MM-DD HH:MM`, shared by the display and the outbound payload.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
