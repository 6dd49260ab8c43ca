//! Binary render engine
//!
//! Turns one wall-clock sample into everything the outputs need: 6-bit
//! binary patterns for seconds and minutes, a 4-bit pattern for the hour in
//! 12-hour form, the AM/PM indicator, and the formatted display text line.
//!
//! `render` is a pure function: identical input produces a bit-identical
//! frame. It has no failure modes for well-formed input; an out-of-range
//! timestamp is a contract violation of the clock source, not handled here.

use core::fmt::Write;

use heapless::String;

use crate::clock::CalendarTimestamp;

/// Capacity of the display text line ("HH:MM:SS AM" is 11 bytes).
pub const TEXT_CAPACITY: usize = 16;

/// One rendered tick: LED bit patterns plus the display text line.
///
/// Bit order is most-significant first, matching the wiring order of the
/// output lines. Recomputed from scratch every tick; nothing persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Hour in 12-hour form, 4 bits (covers 0-12).
    pub hours: [bool; 4],
    /// Minute, 6 bits (covers 0-59).
    pub minutes: [bool; 6],
    /// Second, 6 bits (covers 0-59).
    pub seconds: [bool; 6],
    /// AM/PM indicator dot: off before noon, on from noon onwards.
    pub pm: bool,
    /// Text line, zero-padded `HH:MM:SS AM`/`PM` in 12-hour form.
    pub text: String<TEXT_CAPACITY>,
}

/// 12-hour conversion.
///
/// Hours 13..=23 fold back to 1..=11 and hour 12 stays 12, but midnight is
/// NOT special-cased: hour 0 renders as 0 ("00:MM:SS AM"), matching the
/// physical dial rather than the conventional "12 AM". Noon is classified
/// PM, so 12:00 displays as "12:00:00 PM".
fn twelve_hour(hour: u8) -> (u8, bool) {
    if hour < 12 {
        (hour, false)
    } else if hour == 12 {
        (12, true)
    } else {
        (hour - 12, true)
    }
}

/// Low N bits of `value`, most-significant first.
fn bits<const N: usize>(value: u8) -> [bool; N] {
    let mut out = [false; N];
    for (i, bit) in out.iter_mut().enumerate() {
        *bit = (value >> (N - 1 - i)) & 1 == 1;
    }
    out
}

/// Render one wall-clock sample into a frame.
pub fn render(now: &CalendarTimestamp) -> Frame {
    let (hours_12, pm) = twelve_hour(now.hour);

    let mut text = String::new();
    // 11 bytes always fit in TEXT_CAPACITY
    let _ = write!(
        text,
        "{:02}:{:02}:{:02} {}",
        hours_12,
        now.minute,
        now.second,
        if pm { "PM" } else { "AM" }
    );

    Frame {
        hours: bits(hours_12),
        minutes: bits(now.minute),
        seconds: bits(now.second),
        pm,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Weekday;

    fn at(hour: u8, minute: u8, second: u8) -> CalendarTimestamp {
        CalendarTimestamp {
            year: 2024,
            month: 1,
            day: 1,
            weekday: Weekday::Monday,
            hour,
            minute,
            second,
        }
    }

    #[test]
    fn test_afternoon_sample() {
        // 13:05:09 -> 01:05:09 PM, bits 0001 / 000101 / 001001
        let frame = render(&at(13, 5, 9));
        assert!(frame.pm);
        assert_eq!(frame.text.as_str(), "01:05:09 PM");
        assert_eq!(frame.hours, [false, false, false, true]);
        assert_eq!(frame.minutes, [false, false, false, true, false, true]);
        assert_eq!(frame.seconds, [false, false, true, false, false, true]);
    }

    #[test]
    fn test_noon_is_pm_twelve() {
        let frame = render(&at(12, 0, 0));
        assert!(frame.pm);
        assert_eq!(frame.text.as_str(), "12:00:00 PM");
        assert_eq!(frame.hours, [true, true, false, false]);
    }

    #[test]
    fn test_midnight_is_not_special_cased() {
        // Hour 0 stays 0 on the dial: "00:MM:SS AM", not "12:MM:SS AM".
        let frame = render(&at(0, 7, 30));
        assert!(!frame.pm);
        assert_eq!(frame.text.as_str(), "00:07:30 AM");
        assert_eq!(frame.hours, [false, false, false, false]);
    }

    #[test]
    fn test_twelve_hour_table() {
        for hour in 0u8..24 {
            let (h12, pm) = twelve_hour(hour);
            assert_eq!(pm, hour >= 12, "PM flag wrong for hour {}", hour);
            match hour {
                0..=11 => assert_eq!(h12, hour),
                12 => assert_eq!(h12, 12),
                _ => assert_eq!(h12, hour - 12),
            }
        }
    }

    #[test]
    fn test_bit_width_covers_full_range() {
        // 59 fits in 6 bits, 12 in 4 bits
        assert_eq!(bits::<6>(59), [true, true, true, false, true, true]);
        assert_eq!(bits::<4>(12), [true, true, false, false]);
        assert_eq!(bits::<6>(0), [false; 6]);
    }

    #[test]
    fn test_render_is_pure() {
        let now = at(21, 42, 17);
        assert_eq!(render(&now), render(&now));
    }
}
