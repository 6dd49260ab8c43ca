#![deny(unsafe_code)]
#![deny(warnings)]
//! Time synchronization and clock source
//!
//! One SNTP exchange at startup writes the wall-clock time into the STM32
//! hardware RTC; afterwards the render tick reads the RTC every second. The
//! hardware keeps its own time across resets, so a failed sync degrades to
//! "whatever the RTC holds" instead of a dead clock.
//!
//! - **`rtc`**: clock source adapter over the hardware RTC (get/set of a
//!   calendar timestamp, sync flag)
//! - **`sntp`**: the one-shot synchronization client (DNS, UDP, epoch and
//!   timezone conversion, RTC commit)
//!
//! Calendar math and the NTP codec are pure and live in `binclock-core`.

pub mod rtc;
pub mod sntp;

pub use sntp::{synchronize, SyncError, NTP_SERVER, UTC_OFFSET_SECS};
