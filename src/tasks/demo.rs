//! Synthetic telemetry generator for bench use (`demo-telemetry` feature).
//!
//! Publishes a sine RPM sweep and a slow gear stepper into the real queues,
//! so both display consumers run exactly as they would on a live bus.

use defmt::info;
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Instant, Timer};
use micromath::F32;

use shiftlight_pico2::channels;
use shiftlight_pico2::gear::Gear;
use shiftlight_pico2::telemetry::{GearSample, RpmSample};

/// Generation cadence in milliseconds (~20 Hz, comfortably faster than the
/// render loop's dequeue timeout).
const GENERATE_INTERVAL_MS: u64 = 50;

#[embassy_executor::task]
pub async fn demo_telemetry_task(mut watchdog: Watchdog) {
    info!("demo telemetry task started (core 0)");

    let start = Instant::now();

    loop {
        watchdog.feed();

        let t = start.elapsed().as_millis() as f32 / 1000.0;

        // Sweep 800..7400 rpm so the full band ramp is exercised
        let rpm = 800.0 + 6_600.0 * F32(t * 0.4).sin().0.abs();
        channels::publish_rpm(RpmSample { value: rpm as u16 });

        // Step through neutral and the forward gears every few seconds
        let step = (t / 3.0) as u32 % 8;
        let gear = match step {
            0 => Gear::Neutral,
            n => Gear::Forward(n as u8),
        };
        channels::publish_gear(GearSample { value: gear });

        Timer::after_millis(GENERATE_INTERVAL_MS).await;
    }
}
