//! Calendar timestamp model
//!
//! A decomposed date/time value shared by the clock source adapter, the NTP
//! client and the render engine. The weekday is derived from the date, never
//! authoritative on its own.

/// Day of the week, ISO-8601 numbering: Monday = 1 .. Sunday = 7.
///
/// This matches the 1-based value the clock hardware expects in its weekday
/// field. Conversion from a day count is in [`crate::calendar`], tested
/// against known reference dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    /// ISO weekday number (Monday = 1 .. Sunday = 7).
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Build from an ISO weekday number. Returns `None` outside 1..=7.
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            7 => Some(Weekday::Sunday),
            _ => None,
        }
    }
}

/// Broken-down wall-clock time.
///
/// Invariants (upheld by the producers, assumed by the render engine):
/// `hour` in 0..=23, `minute` and `second` in 0..=59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub weekday: Weekday,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarTimestamp {
    /// The Unix epoch, 1970-01-01 00:00:00 (a Thursday). Used as the render
    /// fallback when the clock hardware cannot be read.
    pub const EPOCH: CalendarTimestamp = CalendarTimestamp {
        year: 1970,
        month: 1,
        day: 1,
        weekday: Weekday::Thursday,
        hour: 0,
        minute: 0,
        second: 0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_numbering_is_iso() {
        assert_eq!(Weekday::Monday.number(), 1);
        assert_eq!(Weekday::Sunday.number(), 7);
        assert_eq!(Weekday::from_number(4), Some(Weekday::Thursday));
        assert_eq!(Weekday::from_number(0), None);
        assert_eq!(Weekday::from_number(8), None);
    }

    #[test]
    fn test_epoch_constant() {
        assert_eq!(CalendarTimestamp::EPOCH.year, 1970);
        assert_eq!(CalendarTimestamp::EPOCH.weekday, Weekday::Thursday);
    }
}
