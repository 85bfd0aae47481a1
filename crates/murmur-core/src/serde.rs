// This module shadows the `serde` crate; refer to it as `::serde`.
use ::serde::Serializer;
use chrono::{DateTime, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
/// Sub-millisecond precision is dropped so clients see a stable width.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
