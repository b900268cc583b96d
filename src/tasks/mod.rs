//! Embassy tasks composing the telemetry pipeline.
//!
//! - `reader`: CAN poll/decode/publish loop (core 0)
//! - `shiftlight`: RPM consumer driving the WS2812 strip (core 1)
//! - `gear`: gear consumer driving the 7-segment indicator (core 1)
//! - `demo`: synthetic telemetry generator (`demo-telemetry` feature)

#[cfg(feature = "demo-telemetry")]
pub mod demo;
pub mod gear;
pub mod reader;
pub mod shiftlight;

use embassy_time::{Duration, Instant};

use shiftlight_pico2::config::bus::DEQUEUE_TIMEOUT_MS;

/// Bounded wait applied to every consumer dequeue.
pub const DEQUEUE_TIMEOUT: Duration = Duration::from_millis(DEQUEUE_TIMEOUT_MS);

/// Microseconds since boot, for diagnostic sink timestamps.
pub fn timestamp_us() -> u64 {
    Instant::now().as_micros()
}
