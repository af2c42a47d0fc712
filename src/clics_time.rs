use chrono::prelude::*;
use chrono::Duration;
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Absolute instant rendered as ISO-8601 with milliseconds and an explicit offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    pub fn in_zone(instant: DateTime<Utc>, timezone: &Tz) -> Self {
        let offset = instant.with_timezone(timezone).offset().fix();
        Timestamp(instant.with_timezone(&offset))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Relative time or length, rendered as `HH:MM:SS.mmm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContestTime(Duration);

impl ContestTime {
    pub fn seconds(seconds: i64) -> Option<Self> {
        checked_seconds(seconds).map(ContestTime)
    }
}

impl From<Duration> for ContestTime {
    fn from(duration: Duration) -> Self {
        ContestTime(duration)
    }
}

impl fmt::Display for ContestTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}

impl Serialize for ContestTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `Duration::seconds` without the panic on values it can't represent.
pub fn checked_seconds(seconds: i64) -> Option<Duration> {
    if seconds.checked_abs()? > i64::MAX / 1_000 {
        return None;
    }
    Some(Duration::seconds(seconds))
}

pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.num_milliseconds();
    let sign = if total_ms < 0 { "-" } else { "" };
    let total_ms = total_ms.abs();
    format!(
        "{}{:02}:{:02}:{:02}.{:03}",
        sign,
        total_ms / 3_600_000,
        (total_ms / 60_000) % 60,
        (total_ms / 1_000) % 60,
        total_ms % 1_000
    )
}

/// Parses `H:MM:SS` with an optional `.mmm` fraction.
pub fn parse_duration(text: &str) -> Option<Duration> {
    lazy_static! {
        static ref DURATION_REGEX: Regex =
            Regex::new(r"^(\d+):([0-5]\d):([0-5]\d)(?:\.(\d{1,3}))?$").unwrap();
    }
    let caps = DURATION_REGEX.captures(text.trim())?;
    let hours: i64 = caps[1].parse().ok()?;
    let minutes: i64 = caps[2].parse().ok()?;
    let seconds: i64 = caps[3].parse().ok()?;
    let millis: i64 = match caps.get(4) {
        Some(fraction) => format!("{:0<3}", fraction.as_str()).parse().ok()?,
        None => 0,
    };
    Some(
        Duration::hours(hours)
            + Duration::minutes(minutes)
            + Duration::seconds(seconds)
            + Duration::milliseconds(millis),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_pad_hours_to_two_digits() {
        assert_eq!(format_duration(Duration::seconds(0)), "00:00:00.000");
        assert_eq!(format_duration(Duration::seconds(5 * 3600)), "05:00:00.000");
        assert_eq!(format_duration(Duration::seconds(3723)), "01:02:03.000");
        assert_eq!(format_duration(Duration::hours(123)), "123:00:00.000");
        assert_eq!(format_duration(Duration::milliseconds(61_005)), "00:01:01.005");
    }

    #[test]
    fn parses_clock_durations() {
        assert_eq!(parse_duration("01:00:00"), Some(Duration::hours(1)));
        assert_eq!(parse_duration("0:30:15"), Some(Duration::seconds(1815)));
        assert_eq!(
            parse_duration("00:00:01.5"),
            Some(Duration::milliseconds(1500))
        );
        assert_eq!(parse_duration("1:60:00"), None);
        assert_eq!(parse_duration("an hour"), None);
    }

    #[test]
    fn timestamps_carry_an_explicit_offset() {
        let instant = Utc.timestamp(1_642_169_400, 0);
        assert_eq!(
            Timestamp::in_zone(instant, &Tz::UTC).to_string(),
            "2022-01-14T14:10:00.000+00:00"
        );
        assert_eq!(
            Timestamp::in_zone(instant, &chrono_tz::Asia::Kolkata).to_string(),
            "2022-01-14T19:40:00.000+05:30"
        );
    }

    #[test]
    fn oversized_second_counts_are_rejected() {
        assert_eq!(checked_seconds(3600), Some(Duration::hours(1)));
        assert_eq!(checked_seconds(-90), Some(Duration::seconds(-90)));
        assert_eq!(checked_seconds(i64::MAX), None);
        assert_eq!(checked_seconds(i64::MIN), None);
        assert!(ContestTime::seconds(9_000_000_000_000_000_000).is_none());
        assert_eq!(
            ContestTime::seconds(-65).map(|t| t.to_string()),
            Some("-00:01:05.000".to_string())
        );
    }
}
