use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const SECS_IN_MIN: i64 = 60;
    pub const SECS_IN_H: i64 = Self::SECS_IN_MIN * 60;
    pub const SECS_IN_D: i64 = Self::SECS_IN_H * 24;

    pub const STANDARD_DATE_FORMAT: &str = "%Y-%m-%d";
    pub const STANDARD_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Epoch values above this are taken to be milliseconds (year ~5138 in seconds).
    const EPOCH_MS_THRESHOLD: i64 = 100_000_000_000;

    const NAIVE_DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    /// Parse a history date/time column into whole seconds since epoch.
    ///
    /// Accepts RFC 3339, naive date-times and plain dates (both read as UTC).
    pub fn parse_to_epoch_secs(raw: &str) -> Option<i64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.timestamp());
        }
        // "2024-01-02 15:30:00+00:00" style (space instead of T)
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
            return Some(dt.timestamp());
        }
        for fmt in Self::NAIVE_DATETIME_FORMATS {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(ndt.and_utc().timestamp());
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, Self::STANDARD_DATE_FORMAT) {
            return date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc().timestamp());
        }
        None
    }

    /// Numeric epoch (seconds or milliseconds) to whole seconds.
    pub fn epoch_number_to_secs(value: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        let whole = value.floor() as i64;
        if whole.abs() >= Self::EPOCH_MS_THRESHOLD {
            Some(whole.div_euclid(1000))
        } else {
            Some(whole)
        }
    }
}

// Time Helper functions

/// Used for display purposes (axis labels, crosshair readout).
pub fn epoch_sec_to_label(epoch_sec: i64, with_time: bool) -> String {
    let Some(dt) = DateTime::<Utc>::from_timestamp(epoch_sec, 0) else {
        return String::from("-");
    };
    if with_time {
        dt.format(TimeUtils::STANDARD_DATETIME_FORMAT).to_string()
    } else {
        dt.format(TimeUtils::STANDARD_DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_date_as_utc_midnight() {
        assert_eq!(TimeUtils::parse_to_epoch_secs("2024-01-02"), Some(1_704_153_600));
    }

    #[test]
    fn parses_offset_datetime() {
        // 15:30 at -05:00 is 20:30 UTC
        assert_eq!(
            TimeUtils::parse_to_epoch_secs("2024-01-02T15:30:00-05:00"),
            Some(1_704_153_600 + 20 * 3600 + 30 * 60)
        );
        assert_eq!(
            TimeUtils::parse_to_epoch_secs("2024-01-02 15:30:00-05:00"),
            Some(1_704_153_600 + 20 * 3600 + 30 * 60)
        );
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        assert_eq!(
            TimeUtils::parse_to_epoch_secs("2024-01-02 01:00:00"),
            Some(1_704_153_600 + 3600)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(TimeUtils::parse_to_epoch_secs("yesterday"), None);
        assert_eq!(TimeUtils::parse_to_epoch_secs("  "), None);
    }

    #[test]
    fn epoch_numbers_in_millis_are_scaled_down() {
        assert_eq!(TimeUtils::epoch_number_to_secs(1_704_153_600.0), Some(1_704_153_600));
        assert_eq!(TimeUtils::epoch_number_to_secs(1_704_153_600_123.0), Some(1_704_153_600));
        assert_eq!(TimeUtils::epoch_number_to_secs(f64::NAN), None);
    }

    #[test]
    fn labels_follow_standard_formats() {
        assert_eq!(epoch_sec_to_label(1_704_153_600, false), "2024-01-02");
        assert_eq!(epoch_sec_to_label(1_704_153_600 + 90 * 60, true), "2024-01-02 01:30");
    }
}
