use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Date formats accepted for day-precision values, tried in order.
/// The last one is the `18 Oct 2026` form older snapshots carry.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d %b %Y", "%b %d, %Y"];

/// Parse a calendar date from an ISO date, an RFC 3339 timestamp, or a
/// `18 Oct 2026`-style string.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a timestamp. Day-precision inputs become midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc())
}

/// serde helper for optional dates: null, empty, or unparseable become `None`.
pub fn deserialize_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(s) => {
            let parsed = parse_date(&s);
            if parsed.is_none() && !s.trim().is_empty() {
                tracing::warn!(value = %s, "dropping unparseable due date");
            }
            parsed
        }
        None => None,
    })
}

/// serde helper for timestamps that tolerates legacy formats. Values that
/// cannot be read at all fall back to the current time.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(s) = raw else {
        return Ok(Utc::now());
    };
    Ok(parse_timestamp(&s).unwrap_or_else(|| {
        tracing::warn!(value = %s, "unparseable creation date, using now");
        Utc::now()
    }))
}
