//! Shift-light renderer task: consumes RPM samples and drives the WS2812
//! strip. Runs on core 1 alongside the gear display.
//!
//! One strip write per sample is the atomic "show" boundary; pixels are
//! never visible in a half-updated state. On dequeue timeout the last
//! rendered pattern persists unless the stale-telemetry policy blanks it.

use defmt::info;
use embassy_rp::peripherals::{DMA_CH0, PIN_16, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::{Peri, bind_interrupts};
use embassy_time::{Instant, with_timeout};

use shiftlight_pico2::channels::RPM_QUEUE;
use shiftlight_pico2::config::strip::{RPM_CALIBRATION, STALE_POLICY, STRIP_LEN};
use shiftlight_pico2::shiftlight::{DARK_FRAME, StripFrame, active_bands, is_stale, paint};

use crate::tasks::DEQUEUE_TIMEOUT;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

#[embassy_executor::task]
pub async fn shift_light_task(
    pio: Peri<'static, PIO0>,
    dma: Peri<'static, DMA_CH0>,
    pin: Peri<'static, PIN_16>,
) {
    let Pio {
        mut common, sm0, ..
    } = Pio::new(pio, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let mut strip: PioWs2812<'_, PIO0, 0, STRIP_LEN> =
        PioWs2812::new(&mut common, sm0, dma, pin, &program);

    info!("shift light task started (core 1)");

    #[cfg(feature = "demo-telemetry")]
    boot_sweep(&mut strip).await;

    let mut frame: StripFrame = DARK_FRAME;
    strip.write(&frame).await;

    let mut last_sample = Instant::now();
    let mut blanked = false;

    loop {
        match with_timeout(DEQUEUE_TIMEOUT, RPM_QUEUE.receive()).await {
            Ok(sample) => {
                last_sample = Instant::now();
                blanked = false;
                let bands = active_bands(sample.value, &RPM_CALIBRATION);
                paint(&mut frame, bands);
                strip.write(&frame).await;
            }
            Err(_timeout) => {
                // Bus silence: hold the last pattern, or blank it once if
                // the stale policy says so
                if !blanked && is_stale(STALE_POLICY, last_sample.elapsed().as_millis()) {
                    strip.write(&DARK_FRAME).await;
                    blanked = true;
                }
            }
        }
    }
}

/// Per-pixel reveal of the band table, bench builds only. Production renders
/// are always single atomic frame updates.
#[cfg(feature = "demo-telemetry")]
async fn boot_sweep(strip: &mut PioWs2812<'_, PIO0, 0, STRIP_LEN>) {
    use embassy_time::Timer;
    use shiftlight_pico2::colors::BAND_COLORS;
    use shiftlight_pico2::config::strip::{BAND_COUNT, DEMO_SWEEP_STEP_MS};

    let mut frame = DARK_FRAME;
    for band in 0..BAND_COUNT {
        frame[band] = BAND_COLORS[band];
        strip.write(&frame).await;
        Timer::after_millis(DEMO_SWEEP_STEP_MS).await;
    }
    strip.write(&DARK_FRAME).await;
}
