#![deny(unsafe_code)]
#![deny(warnings)]
//! Binary-coded LED bank
//!
//! Seventeen discrete output lines: 4 hour bits, the AM/PM dot, 6 minute
//! bits and 6 second bits. Each line maps onto one bit of the rendered
//! frame, most-significant first, in wiring order. Every line is rewritten
//! unconditionally on every tick; at 1 Hz there is nothing to gain from
//! diffing against the previous frame.

use binclock_core::Frame;
use embassy_stm32::gpio::{Level, Output};

/// The LED output lines, owned for the process lifetime.
pub struct LedBank {
    hours: [Output<'static>; 4],
    dot: Output<'static>,
    minutes: [Output<'static>; 6],
    seconds: [Output<'static>; 6],
}

impl LedBank {
    /// Bundle the already-configured output pins. Array order is bit order:
    /// most-significant bit first.
    pub fn new(
        hours: [Output<'static>; 4],
        dot: Output<'static>,
        minutes: [Output<'static>; 6],
        seconds: [Output<'static>; 6],
    ) -> Self {
        Self {
            hours,
            dot,
            minutes,
            seconds,
        }
    }

    /// Drive every line from the frame.
    pub fn drive(&mut self, frame: &Frame) {
        for (pin, bit) in self.hours.iter_mut().zip(frame.hours) {
            pin.set_level(Level::from(bit));
        }
        self.dot.set_level(Level::from(frame.pm));
        for (pin, bit) in self.minutes.iter_mut().zip(frame.minutes) {
            pin.set_level(Level::from(bit));
        }
        for (pin, bit) in self.seconds.iter_mut().zip(frame.seconds) {
            pin.set_level(Level::from(bit));
        }
    }
}
