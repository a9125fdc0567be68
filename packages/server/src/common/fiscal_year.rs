//! Fiscal-year scoping.
//!
//! The club's year starts on April 1. A member row is "current" only when it
//! was updated on or after the start of the fiscal year containing `now`, and
//! dues payments are scoped to the same window.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalYear {
    offset: FixedOffset,
}

impl FiscalYear {
    /// Fiscal years whose April 1 boundary is midnight at `utc_offset_hours`
    pub fn new(utc_offset_hours: i32) -> Result<Self> {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow!("Invalid UTC offset: {} hours", utc_offset_hours))?;
        Ok(Self { offset })
    }

    /// Start of the fiscal year containing `now`, as a UTC instant
    pub fn start_for(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local = now.with_timezone(&self.offset);
        let year = if local.month() >= 4 {
            local.year()
        } else {
            local.year() - 1
        };

        let boundary = NaiveDate::from_ymd_opt(year, 4, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        let utc = boundary - Duration::seconds(i64::from(self.offset.local_minus_utc()));

        DateTime::from_naive_utc_and_offset(utc, Utc)
    }

    /// Whether `updated_at` falls inside the fiscal year containing `now`
    pub fn is_current(&self, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        updated_at >= self.start_for(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_start_after_april_is_same_year() {
        let fy = FiscalYear::new(0).unwrap();
        assert_eq!(fy.start_for(utc(2026, 10, 15, 12)), utc(2026, 4, 1, 0));
    }

    #[test]
    fn test_start_before_april_is_previous_year() {
        let fy = FiscalYear::new(0).unwrap();
        assert_eq!(fy.start_for(utc(2027, 3, 31, 23)), utc(2026, 4, 1, 0));
    }

    #[test]
    fn test_offset_moves_boundary() {
        let fy = FiscalYear::new(9).unwrap();
        // 2026-03-31T15:00Z is 2026-04-01T00:00 JST
        assert_eq!(fy.start_for(utc(2026, 3, 31, 15)), utc(2026, 3, 31, 15));
        // One hour earlier is still the previous fiscal year in JST
        assert_eq!(fy.start_for(utc(2026, 3, 31, 14)), utc(2025, 3, 31, 15));
    }

    #[test]
    fn test_is_current() {
        let fy = FiscalYear::new(0).unwrap();
        let now = utc(2026, 6, 1, 0);
        assert!(fy.is_current(utc(2026, 4, 1, 0), now));
        assert!(!fy.is_current(utc(2026, 3, 31, 23), now));
    }

    #[test]
    fn test_rejects_out_of_range_offset() {
        assert!(FiscalYear::new(30).is_err());
        assert!(FiscalYear::new(-24).is_err());
    }

    #[test]
    fn test_rejects_offset_that_overflows_seconds() {
        assert!(FiscalYear::new(i32::MAX).is_err());
        assert!(FiscalYear::new(i32::MIN).is_err());
    }
}
