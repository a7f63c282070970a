//! Lightroom time conventions: numeric timestamps count seconds from
//! 2001-01-01T00:00:00Z, capture times are stored as naive ISO-like text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const CAPTURE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const MICROS_PER_SECOND: f64 = 1_000_000.0;

pub fn lightroom_epoch() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2001, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

/// Seconds since the Lightroom epoch, with the sub-second part as a fraction.
pub fn to_lightroom_timestamp(t: DateTime<Utc>) -> f64 {
    let delta = t - lightroom_epoch();
    let secs = delta.num_seconds();
    let nanos = delta.subsec_nanos();
    secs as f64 + f64::from(nanos) / 1e9
}

/// Inverse of [`to_lightroom_timestamp`], exact to the microsecond.
/// Returns `None` for non-finite or out-of-range values.
pub fn from_lightroom_timestamp(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    let mut secs = ts.floor();
    let mut micros = ((ts - secs) * MICROS_PER_SECOND).round();
    if micros >= MICROS_PER_SECOND {
        secs += 1.0;
        micros -= MICROS_PER_SECOND;
    }
    if secs.abs() > i64::MAX as f64 / 2.0 {
        return None;
    }
    let delta = TimeDelta::try_seconds(secs as i64)?
        .checked_add(&TimeDelta::microseconds(micros as i64))?;
    lightroom_epoch().checked_add_signed(delta)
}

pub fn format_capture_time(t: NaiveDateTime) -> String {
    t.format(CAPTURE_TIME_FORMAT).to_string()
}

/// Accepts `2024-01-15T10:30:00`, the same with fractional seconds, or an
/// RFC 3339 string with offset (the local wall-clock part is kept).
pub fn parse_capture_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, CAPTURE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, micro: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_micro_opt(h, mi, s, micro)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_epoch_is_zero() {
        assert_eq!(to_lightroom_timestamp(lightroom_epoch()), 0.0);
        assert_eq!(from_lightroom_timestamp(0.0), Some(lightroom_epoch()));
    }

    #[test]
    fn test_known_offset() {
        // 2001-01-02 is exactly one day after the epoch
        assert_eq!(to_lightroom_timestamp(utc(2001, 1, 2, 0, 0, 0, 0)), 86_400.0);
        // Unix epoch is before the Lightroom epoch
        assert_eq!(
            to_lightroom_timestamp(utc(1970, 1, 1, 0, 0, 0, 0)),
            -978_307_200.0
        );
    }

    #[test]
    fn test_roundtrip_sub_second() {
        for t in [
            utc(2024, 6, 15, 12, 34, 56, 789_123),
            utc(1999, 12, 31, 23, 59, 59, 999_999),
            utc(2001, 1, 1, 0, 0, 0, 1),
            utc(2087, 3, 9, 4, 5, 6, 500_000),
        ] {
            let ts = to_lightroom_timestamp(t);
            assert_eq!(from_lightroom_timestamp(ts), Some(t), "ts = {ts}");
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(from_lightroom_timestamp(f64::NAN), None);
        assert_eq!(from_lightroom_timestamp(f64::INFINITY), None);
    }

    #[test]
    fn test_capture_time_format_and_parse() {
        let t = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let s = format_capture_time(t);
        assert_eq!(s, "2024-01-15T10:30:00");
        assert_eq!(parse_capture_time(&s), Some(t));
        assert_eq!(parse_capture_time("2024-01-15T10:30:00.000"), Some(t));
        assert_eq!(parse_capture_time("2024-01-15T10:30:00+02:00"), Some(t));
        assert_eq!(parse_capture_time("yesterday"), None);
    }
}
