//! Calendar date/time conversions using O(1) algorithms
//!
//! Implements Howard Hinnant's civil_from_days and days_from_civil algorithms.
//! Reference: http://howardhinnant.github.io/date_algorithms.html
//!
//! These algorithms are used in C++20's `<chrono>` library and provide:
//! - O(1) time complexity (no year iteration)
//! - Correct handling of leap years
//! - Valid for all dates in the proleptic Gregorian calendar
//!
//! The weekday comes out of `weekday_from_days`, so the timestamp committed
//! to the clock hardware carries a real day of week, not a placeholder.
//! Valid year range is 1970-2105 (u16 year limit); no timezone logic here —
//! callers fold any fixed offset into the Unix value before converting.

use crate::clock::{CalendarTimestamp, Weekday};

const SECONDS_PER_DAY: u64 = 86400;

/// Check if year is a leap year (Gregorian calendar)
///
/// - Divisible by 4: leap year
/// - EXCEPT divisible by 100: not a leap year
/// - EXCEPT divisible by 400: leap year
#[allow(dead_code)]
pub(crate) fn is_leap_year(year: u16) -> bool {
    (year.is_multiple_of(4) && !year.is_multiple_of(100)) || year.is_multiple_of(400)
}

/// Convert a Unix timestamp to a broken-down calendar timestamp.
///
/// The input is treated as already being in the display timezone: any fixed
/// UTC offset must be added to the Unix value before calling this.
pub fn unix_to_timestamp(unix_secs: u64) -> CalendarTimestamp {
    let days_since_epoch = (unix_secs / SECONDS_PER_DAY) as i32;
    let secs_today = unix_secs % SECONDS_PER_DAY;

    let hour = (secs_today / 3600) as u8;
    let minute = ((secs_today % 3600) / 60) as u8;
    let second = (secs_today % 60) as u8;

    let (year, month, day) = civil_from_days(days_since_epoch);
    let weekday = weekday_from_days(days_since_epoch);

    CalendarTimestamp {
        year,
        month,
        day,
        weekday,
        hour,
        minute,
        second,
    }
}

/// Convert a calendar timestamp back to a Unix timestamp.
///
/// Inverse of [`unix_to_timestamp`]; the weekday field is ignored (it is
/// derived, not authoritative).
pub fn timestamp_to_unix(ts: &CalendarTimestamp) -> u64 {
    let days_since_epoch = days_from_civil(ts.year, ts.month, ts.day);

    (days_since_epoch as u64) * SECONDS_PER_DAY
        + (ts.hour as u64) * 3600
        + (ts.minute as u64) * 60
        + (ts.second as u64)
}

/// Convert days since Unix epoch to civil date (year, month, day)
///
/// Howard Hinnant's civil_from_days algorithm.
/// Reference: http://howardhinnant.github.io/date_algorithms.html
fn civil_from_days(days_since_epoch: i32) -> (u16, u8, u8) {
    // Shift epoch from 1970-01-01 to 0000-03-01 (March 1, year 0)
    // This makes the year start on March 1, placing leap day at end of year
    let z = days_since_epoch + 719468; // 719468 = days from 0000-03-01 to 1970-01-01

    // Calculate era (400-year cycles)
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era [0, 146096]

    // Calculate year of era [0, 399]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;

    let y = (yoe as i32) + era * 400;

    // Day of year [0, 365], counted from March 1
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);

    // Month [0, 11] where 0 = March, 11 = February
    let mp = (5 * doy + 2) / 153;

    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;

    // Month [1, 12] where 1 = January
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u8;

    // January and February belong to the next civil year
    let year = if m <= 2 { y + 1 } else { y };

    (year as u16, m, d)
}

/// Convert civil date (year, month, day) to days since Unix epoch
///
/// Howard Hinnant's days_from_civil algorithm.
fn days_from_civil(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    let m = month as i32;
    let d = day as i32;

    // Adjust year and month to make March = month 0, February = month 11
    let (y, m) = if m <= 2 { (y - 1, m + 9) } else { (y, m - 3) };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32; // year of era [0, 399]
    let doy = (153 * (m as u32) + 2) / 5 + (d as u32) - 1; // day of year [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era [0, 146096]

    era * 146097 + (doe as i32) - 719468 // 719468 = days from 0000-03-01 to 1970-01-01
}

/// Weekday for a day count since the Unix epoch.
///
/// 1970-01-01 was a Thursday; shifting by 3 makes the remainder 0 on
/// Mondays, which maps directly onto the ISO numbering.
fn weekday_from_days(days_since_epoch: i32) -> Weekday {
    let iso = (days_since_epoch + 3).rem_euclid(7) as u8 + 1;
    // iso is always in 1..=7 here
    Weekday::from_number(iso).unwrap_or(Weekday::Monday)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2000)); // Divisible by 400
        assert!(is_leap_year(2024)); // Divisible by 4
        assert!(!is_leap_year(1900)); // Divisible by 100, not 400
        assert!(!is_leap_year(2023)); // Not divisible by 4
        assert!(!is_leap_year(2100)); // Divisible by 100, not 400
    }

    #[test]
    fn test_unix_epoch() {
        let ts = unix_to_timestamp(0);
        assert_eq!(ts.year, 1970);
        assert_eq!(ts.month, 1);
        assert_eq!(ts.day, 1);
        assert_eq!(ts.weekday, Weekday::Thursday);
        assert_eq!(ts.hour, 0);
        assert_eq!(ts.minute, 0);
        assert_eq!(ts.second, 0);
    }

    #[test]
    fn test_known_weekdays() {
        // 2024-01-01 00:00:00 was a Monday
        assert_eq!(unix_to_timestamp(1704067200).weekday, Weekday::Monday);
        // 2000-01-01 was a Saturday
        assert_eq!(unix_to_timestamp(946684800).weekday, Weekday::Saturday);
        // 2038-01-19 (32-bit Unix limit) is a Tuesday
        assert_eq!(unix_to_timestamp(2147483647).weekday, Weekday::Tuesday);
    }

    #[test]
    fn test_round_trip_conversion() {
        // Test various dates in the valid range
        let test_dates = [
            0u64,       // 1970-01-01 00:00:00
            946684800,  // 2000-01-01 00:00:00
            1609459200, // 2021-01-01 00:00:00
            1704067200, // 2024-01-01 00:00:00
            2147483647, // 2038-01-19 03:14:07 (32-bit Unix time limit)
            4102444800, // 2100-01-01 00:00:00
        ];

        for &unix_secs in &test_dates {
            let ts = unix_to_timestamp(unix_secs);
            let converted_back = timestamp_to_unix(&ts);
            assert_eq!(
                unix_secs, converted_back,
                "Round trip failed for timestamp {}",
                unix_secs
            );
        }
    }

    #[test]
    fn test_leap_day_2024() {
        // 2024-02-29 12:30:45 (leap day)
        let ts = unix_to_timestamp(1709209845);
        assert_eq!(ts.year, 2024);
        assert_eq!(ts.month, 2);
        assert_eq!(ts.day, 29);
        assert_eq!(ts.hour, 12);
        assert_eq!(ts.minute, 30);
        assert_eq!(ts.second, 45);
        assert_eq!(ts.weekday, Weekday::Thursday);
    }

    #[test]
    fn test_end_of_century() {
        // 1999-12-31 23:59:59
        let ts = unix_to_timestamp(946684799);
        assert_eq!(ts.year, 1999);
        assert_eq!(ts.month, 12);
        assert_eq!(ts.day, 31);
        assert_eq!(ts.hour, 23);
        assert_eq!(ts.minute, 59);
        assert_eq!(ts.second, 59);
        let unix = timestamp_to_unix(&ts);
        assert_eq!(unix, 946684799);
    }
}
