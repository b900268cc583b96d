//! Color constants for the shift-light strip.
//!
//! WS2812 pixels take 8-bit-per-channel RGB; the band values below keep the
//! warm amber bias of the original hardware tuning rather than pure
//! colorimetric yellow/orange.

use smart_leds::RGB8;

use crate::config::strip::BAND_COUNT;

/// RGB color representation re-exported from the `smart_leds` crate.
pub type Rgb = RGB8;

/// Pixel off.
pub const OFF: Rgb = Rgb::new(0, 0, 0);

/// Shift-light green (low band).
pub const GREEN: Rgb = Rgb::new(0, 150, 0);

/// Shift-light yellow (mid band).
pub const YELLOW: Rgb = Rgb::new(170, 60, 0);

/// Shift-light orange (high band).
pub const ORANGE: Rgb = Rgb::new(240, 40, 0);

/// Slightly deeper orange for the last orange band.
pub const ORANGE_DEEP: Rgb = Rgb::new(200, 40, 0);

/// Shift-light red (shift now).
pub const RED: Rgb = Rgb::new(255, 0, 0);

/// Ordered band colors, lowest RPM band first.
pub const BAND_COLORS: [Rgb; BAND_COUNT] = [
    GREEN,
    GREEN,
    GREEN,
    YELLOW,
    YELLOW,
    YELLOW,
    ORANGE,
    ORANGE,
    ORANGE_DEEP,
    RED,
    RED,
    RED,
];
