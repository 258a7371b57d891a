use crate::{WMIError, WMIResult};
use chrono::prelude::*;
use serde::Serialize;
use std::str::FromStr;

/// A wrapper type around chrono's DateTime, which supports parsing from WMI-format strings.
///
/// The format is `yyyymmddHHMMSS.mmmmmmsUUU`, where `sUUU` is the offset from UTC in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WMIDateTime(pub DateTime<FixedOffset>);

impl WMIDateTime {
    fn malformed(s: &str, detail: impl ToString) -> WMIError {
        WMIError::ConversionError {
            property: String::new(),
            reason: "Malformed WMI datetime.",
            detail: format!("{:?}: {}", s, detail.to_string()),
        }
    }
}

impl FromStr for WMIDateTime {
    type Err = WMIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 22 || !s.is_char_boundary(21) {
            return Err(Self::malformed(s, "expected at least 22 chars"));
        }

        let (datetime_part, tz_part) = s.split_at(21);

        let tz_min: i32 = tz_part.parse().map_err(|e| Self::malformed(s, e))?;

        let tz = FixedOffset::east_opt(tz_min * 60)
            .ok_or_else(|| Self::malformed(s, "offset out of range"))?;

        let naive = NaiveDateTime::parse_from_str(datetime_part, "%Y%m%d%H%M%S%.6f")
            .map_err(|e| Self::malformed(s, e))?;

        let dt = tz
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| Self::malformed(s, "ambiguous local time"))?;

        Ok(Self(dt))
    }
}

// Seconds between 1601-01-01 and 1970-01-01.
const EPOCH_DIFFERENCE_SECS: i64 = 11_644_473_600;
const TICKS_PER_SECOND: u64 = 10_000_000;
const NANOS_PER_TICK: u32 = 100;

/// A `FILETIME`: the number of 100-nanosecond intervals since January 1, 1601,
/// split into two 32-bit halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FileTime {
    pub low_date_time: u32,
    pub high_date_time: u32,
}

impl FileTime {
    pub fn from_ticks(ticks: u64) -> Self {
        Self {
            low_date_time: ticks as u32,
            high_date_time: (ticks >> 32) as u32,
        }
    }

    pub fn ticks(&self) -> u64 {
        (u64::from(self.high_date_time) << 32) | u64::from(self.low_date_time)
    }

    /// Convert a wall clock time, returning `None` for times before 1601.
    ///
    /// A `FILETIME` does not carry its time zone, so this is the inverse of [`FileTime::to_naive`].
    pub fn from_naive(dt: &NaiveDateTime) -> Option<Self> {
        let utc = dt.and_utc();
        let secs = u64::try_from(utc.timestamp().checked_add(EPOCH_DIFFERENCE_SECS)?).ok()?;
        let sub_ticks = u64::from(utc.timestamp_subsec_nanos() / NANOS_PER_TICK);

        let ticks = secs.checked_mul(TICKS_PER_SECOND)?.checked_add(sub_ticks)?;

        Some(Self::from_ticks(ticks))
    }

    /// The wall clock time this value represents. Whether this is UTC or local time
    /// depends on how the value was produced.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let ticks = self.ticks();
        let secs = (ticks / TICKS_PER_SECOND) as i64 - EPOCH_DIFFERENCE_SECS;
        let nanos = (ticks % TICKS_PER_SECOND) as u32 * NANOS_PER_TICK;

        DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
    }
}

impl FromStr for FileTime {
    type Err = WMIError;

    /// Parse the decimal tick count rendered by `SWbemDateTime.GetFileTime`.
    fn from_str(s: &str) -> WMIResult<Self> {
        let ticks: u64 = s
            .trim()
            .parse()
            .map_err(|e| WMIError::ConversionError {
                property: String::new(),
                reason: "Failed to parse file time.",
                detail: format!("{:?}: {}", s, e),
            })?;

        Ok(Self::from_ticks(ticks))
    }
}

#[cfg(test)]
mod tests {
    use super::{FileTime, WMIDateTime};
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn it_works_with_negative_offset() {
        let dt: WMIDateTime = "20190113200517.500000-180".parse().unwrap();

        assert_eq!(dt.0.offset().local_minus_utc(), -180 * 60);
        assert_eq!(dt.0.hour(), 20);
        assert_eq!(dt.0.timestamp_subsec_millis(), 500);
        assert_eq!(dt.0.naive_utc().hour(), 23);
    }

    #[test]
    fn it_works_with_positive_offset() {
        let dt: WMIDateTime = "20190113200517.000500+060".parse().unwrap();

        assert_eq!(dt.0.offset().local_minus_utc(), 3600);
        assert_eq!(dt.0.timestamp_subsec_micros(), 500);
        assert_eq!(dt.0.naive_utc().hour(), 19);
    }

    #[test]
    fn it_fails_with_malformed_str() {
        let dt_res: Result<WMIDateTime, _> = "20190113200517".parse();

        assert!(dt_res.is_err());
    }

    #[test]
    fn it_fails_with_malformed_str_with_no_tz() {
        let dt_res: Result<WMIDateTime, _> = "20190113200517.000500".parse();

        assert!(dt_res.is_err());
    }

    #[test]
    fn it_splits_ticks_into_halves() {
        let ft = FileTime::from_ticks(0x01D4_AB8B_1234_5678);

        assert_eq!(ft.high_date_time, 0x01D4_AB8B);
        assert_eq!(ft.low_date_time, 0x1234_5678);
        assert_eq!(ft.ticks(), 0x01D4_AB8B_1234_5678);
    }

    #[test]
    fn it_converts_the_unix_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let ft = FileTime::from_naive(&epoch).unwrap();

        assert_eq!(ft.ticks(), 116_444_736_000_000_000);
        assert_eq!(ft.to_naive().unwrap(), epoch);
    }

    #[test]
    fn it_rejects_times_before_1601() {
        let dt = NaiveDate::from_ymd_opt(1600, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();

        assert_eq!(FileTime::from_naive(&dt), None);
    }

    #[test]
    fn it_parses_decimal_ticks() {
        let ft: FileTime = "132000000000000000".parse().unwrap();
        assert_eq!(ft.ticks(), 132_000_000_000_000_000);

        assert!("".parse::<FileTime>().is_err());
        assert!("-1".parse::<FileTime>().is_err());
        assert!("12abc".parse::<FileTime>().is_err());
    }
}
