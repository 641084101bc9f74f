use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use regex::Regex;
use tracing::warn;

use crate::error::{MeteoError, Result};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── Abbreviation tables ───────────────────────────────────────────────────────

/// Abbreviations that always denote UTC.
const UTC_ABBREVIATIONS: &[&str] = &["UTC", "GMT", "Z"];

/// Fallback for abbreviations the host zone does not define, with their
/// offset east of UTC in seconds.
const KNOWN_ABBREVIATIONS: &[(&str, i32)] = &[
    ("CET", 3600),
    ("CEST", 7200),
    ("WET", 0),
    ("WEST", 3600),
    ("EET", 7200),
    ("EEST", 10800),
    ("BST", 3600),
];

const TIMESTAMP_PATTERN: &str = r"^(\d{1,2})\.(\d{1,2})\.(\d{4}) (\d{1,2}):(\d{2}) ([A-Za-z]+)$";

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses archive timestamps such as `"2.1.2024 15:04 CET"`.
///
/// The trailing zone abbreviation is resolved first against the host
/// timezone, so `CET`/`CEST` pick the correct side of a DST fold. The fixed
/// table of European abbreviations is only a fallback for abbreviations the
/// host zone does not define, so hosts outside Europe still accept `CET`.
pub struct TimestampParser {
    host_tz: Tz,
    pattern: Regex,
}

impl TimestampParser {
    /// Create a parser resolving abbreviations against `tz_name`.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let host_tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimestampParser: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self {
            host_tz,
            pattern: Regex::new(TIMESTAMP_PATTERN).expect("regex is valid"),
        }
    }

    /// Create a parser bound to the system timezone.
    pub fn from_system() -> Self {
        Self::new(&get_system_timezone())
    }

    pub fn host_tz(&self) -> Tz {
        self.host_tz
    }

    /// Parse `D.M.YYYY H:MM ZONE` into a UTC instant.
    pub fn parse(&self, input: &str) -> Result<DateTime<Utc>> {
        let caps = self
            .pattern
            .captures(input.trim())
            .ok_or_else(|| invalid(input, "expected layout `D.M.YYYY H:MM ZONE`"))?;

        let number = |i: usize| -> Result<u32> {
            caps[i]
                .parse::<u32>()
                .map_err(|e| invalid(input, e.to_string()))
        };

        let (day, month, year) = (number(1)?, number(2)?, number(3)?);
        let (hour, minute) = (number(4)?, number(5)?);

        let date = NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| invalid(input, "date out of range"))?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| invalid(input, "time out of range"))?;

        let zone = &caps[6];
        self.resolve(date.and_time(time), zone).ok_or_else(|| {
            invalid(input, format!("unknown timezone abbreviation \"{}\"", zone))
        })
    }

    fn resolve(&self, naive: NaiveDateTime, zone: &str) -> Option<DateTime<Utc>> {
        if UTC_ABBREVIATIONS.contains(&zone) {
            return Some(Utc.from_utc_datetime(&naive));
        }
        if let Some(dt) = self.resolve_in_host(naive, zone) {
            return Some(dt);
        }
        KNOWN_ABBREVIATIONS
            .iter()
            .find(|(abbr, _)| *abbr == zone)
            .and_then(|(_, secs)| FixedOffset::east_opt(*secs))
            .and_then(|offset| offset.from_local_datetime(&naive).single())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Map `naive` into the host zone and keep the candidate whose
    /// abbreviation is `zone`.
    fn resolve_in_host(&self, naive: NaiveDateTime, zone: &str) -> Option<DateTime<Utc>> {
        let candidates: Vec<DateTime<Tz>> = match self.host_tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => vec![dt],
            LocalResult::Ambiguous(earlier, later) => vec![earlier, later],
            LocalResult::None => Vec::new(),
        };
        candidates
            .into_iter()
            .find(|dt| dt.format("%Z").to_string() == zone)
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::from_system()
    }
}

fn invalid(input: &str, reason: impl Into<String>) -> MeteoError {
    MeteoError::TimestampParse {
        input: input.to_string(),
        reason: reason.into(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
