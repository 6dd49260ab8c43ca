//! Platform-agnostic core logic for the binary clock firmware
//!
//! This crate contains everything the clock does that is not hardware:
//! calendar date/time conversions, the NTP request/reply codec with its
//! epoch arithmetic, and the render engine that turns a wall-clock sample
//! into binary-coded LED patterns and a display text line.
//!
//! It has NO hardware dependencies and is fully testable on the host.
//! Board crates own the sockets, the RTC, the GPIO lines and the display,
//! and call into this crate on every render tick.

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod calendar;
pub mod clock;
pub mod ntp;
pub mod render;

pub use clock::{CalendarTimestamp, Weekday};
pub use render::{render, Frame};
