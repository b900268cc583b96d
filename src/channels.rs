//! Telemetry handoff queues between the reader core and the display core.
//!
//! Two independent bounded FIFO channels, one per sample kind, so a slow
//! gear consumer can never head-of-line-block RPM rendering. The producer
//! side is strictly non-blocking: when a queue is full the newest sample is
//! dropped and counted, preserving bus-read liveness over telemetry
//! completeness.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::bus::TELEMETRY_QUEUE_DEPTH;
use crate::telemetry::{GearSample, RpmSample};

/// Bounded FIFO of RPM samples, reader (core 0) to renderer (core 1).
pub type RpmQueue = Channel<CriticalSectionRawMutex, RpmSample, TELEMETRY_QUEUE_DEPTH>;

/// Bounded FIFO of gear samples, reader (core 0) to gear display (core 1).
pub type GearQueue = Channel<CriticalSectionRawMutex, GearSample, TELEMETRY_QUEUE_DEPTH>;

/// RPM handoff queue. `CriticalSectionRawMutex` because producer and
/// consumer run on different cores.
pub static RPM_QUEUE: RpmQueue = Channel::new();

/// Gear handoff queue.
pub static GEAR_QUEUE: GearQueue = Channel::new();

/// RPM samples dropped because the queue was full.
pub static RPM_DROPS: AtomicU32 = AtomicU32::new(0);

/// Gear samples dropped because the queue was full.
pub static GEAR_DROPS: AtomicU32 = AtomicU32::new(0);

/// Enqueue an RPM sample without blocking. Returns `false` when the queue
/// was full and the sample was dropped (drop-newest policy).
pub fn publish_rpm(sample: RpmSample) -> bool {
    if RPM_QUEUE.try_send(sample).is_ok() {
        true
    } else {
        RPM_DROPS.fetch_add(1, Ordering::Relaxed);
        false
    }
}

/// Enqueue a gear sample without blocking. Returns `false` when the queue
/// was full and the sample was dropped.
pub fn publish_gear(sample: GearSample) -> bool {
    if GEAR_QUEUE.try_send(sample).is_ok() {
        true
    } else {
        GEAR_DROPS.fetch_add(1, Ordering::Relaxed);
        false
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let queue: Channel<CriticalSectionRawMutex, RpmSample, 4> = Channel::new();
        for value in [1_000, 2_000, 3_000] {
            queue.try_send(RpmSample { value }).unwrap();
        }
        assert_eq!(queue.try_receive().unwrap().value, 1_000);
        assert_eq!(queue.try_receive().unwrap().value, 2_000);
        assert_eq!(queue.try_receive().unwrap().value, 3_000);
        assert!(queue.try_receive().is_err());
    }

    #[test]
    fn test_capacity_plus_one_drops_exactly_one() {
        // Exercises the real RPM queue and counter; no other test touches them.
        let drops_before = RPM_DROPS.load(Ordering::Relaxed);

        let mut published = 0usize;
        for value in 0..(TELEMETRY_QUEUE_DEPTH as u16 + 1) {
            if publish_rpm(RpmSample { value }) {
                published += 1;
            }
        }
        assert_eq!(published, TELEMETRY_QUEUE_DEPTH);
        assert_eq!(RPM_DROPS.load(Ordering::Relaxed), drops_before + 1);

        // The oldest samples survived in order; the newest was the one dropped
        for expected in 0..TELEMETRY_QUEUE_DEPTH as u16 {
            assert_eq!(RPM_QUEUE.try_receive().unwrap().value, expected);
        }
        assert!(RPM_QUEUE.try_receive().is_err());
    }

    #[test]
    fn test_gear_queue_drop_counter() {
        // Exercises the real gear queue and counter; no other test touches them.
        use crate::gear::Gear;

        let drops_before = GEAR_DROPS.load(Ordering::Relaxed);
        for _ in 0..TELEMETRY_QUEUE_DEPTH {
            assert!(publish_gear(GearSample {
                value: Gear::Neutral
            }));
        }
        assert!(!publish_gear(GearSample {
            value: Gear::Forward(2)
        }));
        assert_eq!(GEAR_DROPS.load(Ordering::Relaxed), drops_before + 1);

        while GEAR_QUEUE.try_receive().is_ok() {}
    }
}
