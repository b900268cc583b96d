//! Gear display task: consumes gear samples and drives a 7-segment module
//! on GPIO. Runs on core 1 alongside the shift-light renderer.

use defmt::info;
use embassy_rp::gpio::Output;
use embassy_time::with_timeout;

use shiftlight_pico2::channels::GEAR_QUEUE;
use shiftlight_pico2::gear::Gear;

use crate::tasks::DEQUEUE_TIMEOUT;

/// Number of segment lines (a through g).
pub const SEGMENT_COUNT: usize = 7;

/// Common-cathode 7-segment module on GPIO: a high line lights its segment.
/// Exclusively owned by the gear display task.
pub struct SegmentDisplay {
    segments: [Output<'static>; SEGMENT_COUNT],
}

impl SegmentDisplay {
    pub fn new(segments: [Output<'static>; SEGMENT_COUNT]) -> Self {
        Self { segments }
    }

    /// Latch a segment mask (bit 0 = segment `a`) onto the pins.
    fn show(&mut self, mask: u8) {
        for (bit, segment) in self.segments.iter_mut().enumerate() {
            if mask & (1 << bit) != 0 {
                segment.set_high();
            } else {
                segment.set_low();
            }
        }
    }
}

#[embassy_executor::task]
pub async fn gear_display_task(mut display: SegmentDisplay) {
    info!("gear display task started (core 1)");

    // Neutral until the first sample arrives
    display.show(Gear::Neutral.segments());

    loop {
        if let Ok(sample) = with_timeout(DEQUEUE_TIMEOUT, GEAR_QUEUE.receive()).await {
            display.show(sample.value.segments());
        }
        // Timeout: the last indication persists
    }
}
