#![deny(unsafe_code)]
#![deny(warnings)]
//! SSD1306 pixel display output
//!
//! One 128x32 OLED over blocking I2C, showing the rendered "HH:MM:SS AM/PM"
//! text line. Each tick clears the whole frame and redraws the line at a
//! fixed offset; partial updates are not worth the bookkeeping at 1 Hz.
//!
//! A broken or absent display must not take the LED clock down with it, so
//! I2C faults are logged and swallowed here rather than propagated.

use binclock_core::Frame;
use defmt::warn;
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle, MonoTextStyleBuilder},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

/// Pixel position of the time text line.
const TEXT_ORIGIN: Point = Point::new(20, 12);

type Oled = Ssd1306<
    I2CInterface<I2c<'static, Blocking>>,
    DisplaySize128x32,
    BufferedGraphicsMode<DisplaySize128x32>,
>;

/// The pixel display surface, owned for the process lifetime.
pub struct ClockDisplay {
    oled: Oled,
    style: MonoTextStyle<'static, BinaryColor>,
}

impl ClockDisplay {
    /// Bring up the display on the given I2C bus.
    ///
    /// An init failure leaves a dead display behind; later draws will log
    /// their flush errors but the clock keeps running.
    pub fn new(i2c: I2c<'static, Blocking>) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut oled = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        if oled.init().is_err() {
            warn!("Display init failed, continuing without it");
        }

        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(BinaryColor::On)
            .build();

        Self { oled, style }
    }

    /// Clear the frame, draw the text line, flush.
    pub fn draw(&mut self, frame: &Frame) {
        self.oled.clear_buffer();
        // Drawing into the buffer is infallible; only the flush can fail.
        let _ = Text::with_baseline(frame.text.as_str(), TEXT_ORIGIN, self.style, Baseline::Top)
            .draw(&mut self.oled);
        if self.oled.flush().is_err() {
            warn!("Display flush failed");
        }
    }
}
