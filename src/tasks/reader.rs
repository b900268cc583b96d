//! CAN reader task: polls the bus controller, decodes frames of interest,
//! and publishes telemetry samples. Runs alone on core 0.

use core::sync::atomic::{AtomicU32, Ordering};

use defmt::{debug, info, warn};
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Instant, Timer};

use shiftlight_pico2::channels::{self, GEAR_DROPS, RPM_DROPS};
use shiftlight_pico2::config::bus::IDLE_BACKOFF_MS;
use shiftlight_pico2::diag::{self, Severity};
use shiftlight_pico2::telemetry::{TelemetrySample, decode_frame};

use crate::bus::{BUS_FAULTS, CanController};
use crate::tasks::timestamp_us;

/// Frames pulled off the bus (any identifier).
pub static FRAMES_SEEN: AtomicU32 = AtomicU32::new(0);

/// RTR frames seen and ignored.
pub static RTR_FRAMES: AtomicU32 = AtomicU32::new(0);

/// Data frames with an identifier outside the dispatch table.
pub static UNKNOWN_FRAMES: AtomicU32 = AtomicU32::new(0);

/// Recognized frames with a malformed payload.
pub static DECODE_ERRORS: AtomicU32 = AtomicU32::new(0);

/// Interval between pipeline counter reports.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

#[embassy_executor::task]
pub async fn can_reader_task(mut controller: CanController, mut watchdog: Watchdog) {
    info!(
        "CAN reader task started (core 0), payload layout v{}",
        shiftlight_pico2::config::bus::PAYLOAD_LAYOUT_VERSION
    );
    diag::report(Severity::Info, "CAN", "reader started", timestamp_us());

    let mut last_report = Instant::now();

    loop {
        // Liveness checkpoint: one feed per wakeup, idle or busy
        watchdog.feed();

        match controller.poll_frame() {
            None => {
                // Bus idle: suspend instead of busy-spinning
                Timer::after_millis(IDLE_BACKOFF_MS).await;
            }
            Some(frame) => {
                FRAMES_SEEN.fetch_add(1, Ordering::Relaxed);

                if frame.rtr {
                    // No payload, only the requested length is meaningful
                    RTR_FRAMES.fetch_add(1, Ordering::Relaxed);
                    debug!("RTR frame id={:#x} requested len={}", frame.id, frame.dlc);
                } else {
                    match decode_frame(&frame) {
                        Ok(Some(TelemetrySample::Rpm(sample))) => {
                            channels::publish_rpm(sample);
                        }
                        Ok(Some(TelemetrySample::Gear(sample))) => {
                            channels::publish_gear(sample);
                        }
                        Ok(None) => {
                            UNKNOWN_FRAMES.fetch_add(1, Ordering::Relaxed);
                            debug!("ignoring frame id={:#x}", frame.id);
                        }
                        Err(err) => {
                            DECODE_ERRORS.fetch_add(1, Ordering::Relaxed);
                            warn!("decode error: {}", err);
                            diag::report(Severity::Warn, "CAN", "decode error", timestamp_us());
                        }
                    }
                }
            }
        }

        if last_report.elapsed() >= REPORT_INTERVAL {
            info!(
                "pipeline: frames={} rtr={} unknown={} decode_errors={} rpm_drops={} gear_drops={} bus_faults={}",
                FRAMES_SEEN.load(Ordering::Relaxed),
                RTR_FRAMES.load(Ordering::Relaxed),
                UNKNOWN_FRAMES.load(Ordering::Relaxed),
                DECODE_ERRORS.load(Ordering::Relaxed),
                RPM_DROPS.load(Ordering::Relaxed),
                GEAR_DROPS.load(Ordering::Relaxed),
                BUS_FAULTS.load(Ordering::Relaxed),
            );
            last_report = Instant::now();
        }
    }
}
