#![deny(unsafe_code)]
#![deny(warnings)]
//! Clock source adapter over the STM32 hardware RTC
//!
//! The RTC owns the authoritative wall-clock time: the NTP client writes it
//! once at startup and the render tick reads it every second. The hardware
//! keeps counting across resets (and, with a backup supply, across power
//! cycles), so reads succeed even when no synchronization has happened yet.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use binclock_core::{CalendarTimestamp, Weekday};
use critical_section::Mutex;
use defmt::{error, info, Format};
use embassy_stm32::rtc::{DateTime, DayOfWeek, Rtc};

/// Set once the first NTP-derived timestamp has been committed.
static CLOCK_SYNCED: AtomicBool = AtomicBool::new(false);

/// Global hardware RTC instance
static RTC: Mutex<RefCell<Option<Rtc>>> = Mutex::new(RefCell::new(None));

/// Clock adapter errors
#[derive(Debug, Clone, Copy, Format)]
pub enum RtcError {
    /// Adapter used before [`init`]
    NotInitialized,
    /// RTC hardware rejected the operation
    HardwareError,
}

/// Install the hardware RTC behind the adapter.
///
/// Must be called once during system initialization, before any get or set.
pub fn init(rtc: Rtc) {
    critical_section::with(|cs| {
        RTC.borrow(cs).replace(Some(rtc));
    });
    info!("Hardware RTC installed as clock source");
}

/// Whether at least one synchronized timestamp has been committed.
#[allow(dead_code)]
pub fn is_synced() -> bool {
    CLOCK_SYNCED.load(Ordering::Acquire)
}

/// Commit a calendar timestamp to the RTC hardware.
///
/// Marks the clock synced only if the hardware write succeeds.
pub fn set(ts: &CalendarTimestamp) -> Result<(), RtcError> {
    let datetime = to_datetime(ts)?;

    critical_section::with(|cs| {
        if let Some(rtc) = RTC.borrow(cs).borrow_mut().as_mut() {
            rtc.set_datetime(datetime)
                .map_err(|_| RtcError::HardwareError)?;
            CLOCK_SYNCED.store(true, Ordering::Release);
            Ok(())
        } else {
            Err(RtcError::NotInitialized)
        }
    })
}

/// Read the current calendar timestamp from the RTC hardware.
///
/// Deliberately does not require a prior sync: an unsynchronized clock shows
/// whatever time the hardware has retained.
pub fn get() -> Result<CalendarTimestamp, RtcError> {
    critical_section::with(|cs| {
        if let Some(rtc) = RTC.borrow(cs).borrow_mut().as_mut() {
            let datetime = rtc.now().map_err(|_| RtcError::HardwareError)?;
            Ok(from_datetime(&datetime))
        } else {
            Err(RtcError::NotInitialized)
        }
    })
}

/// Read the clock for rendering, falling back to the Unix epoch.
///
/// The render tick must never fail, so hardware errors are logged here and
/// the epoch is shown instead.
pub fn now_or_epoch() -> CalendarTimestamp {
    match get() {
        Ok(ts) => ts,
        Err(e) => {
            error!("Failed to read RTC: {:?}", e);
            CalendarTimestamp::EPOCH
        }
    }
}

fn to_datetime(ts: &CalendarTimestamp) -> Result<DateTime, RtcError> {
    DateTime::from(
        ts.year,
        ts.month,
        ts.day,
        day_of_week(ts.weekday),
        ts.hour,
        ts.minute,
        ts.second,
        0, // microsecond
    )
    .map_err(|_| RtcError::HardwareError)
}

fn from_datetime(dt: &DateTime) -> CalendarTimestamp {
    CalendarTimestamp {
        year: dt.year(),
        month: dt.month(),
        day: dt.day(),
        weekday: weekday(dt.day_of_week()),
        hour: dt.hour(),
        minute: dt.minute(),
        second: dt.second(),
    }
}

/// ISO weekday (Monday = 1) to the HAL's day-of-week type.
fn day_of_week(w: Weekday) -> DayOfWeek {
    match w {
        Weekday::Monday => DayOfWeek::Monday,
        Weekday::Tuesday => DayOfWeek::Tuesday,
        Weekday::Wednesday => DayOfWeek::Wednesday,
        Weekday::Thursday => DayOfWeek::Thursday,
        Weekday::Friday => DayOfWeek::Friday,
        Weekday::Saturday => DayOfWeek::Saturday,
        Weekday::Sunday => DayOfWeek::Sunday,
    }
}

fn weekday(d: DayOfWeek) -> Weekday {
    match d {
        DayOfWeek::Monday => Weekday::Monday,
        DayOfWeek::Tuesday => Weekday::Tuesday,
        DayOfWeek::Wednesday => Weekday::Wednesday,
        DayOfWeek::Thursday => Weekday::Thursday,
        DayOfWeek::Friday => Weekday::Friday,
        DayOfWeek::Saturday => Weekday::Saturday,
        DayOfWeek::Sunday => Weekday::Sunday,
    }
}
