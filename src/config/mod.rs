//! Application configuration.
//!
//! - `bus`: CAN bitrate, frame identifiers, payload layout, queue and timing
//!   constants
//! - `strip`: LED strip geometry, RPM calibration, stale-telemetry policy

pub mod bus;
pub mod strip;

// Re-export the most commonly used constants at config level for convenience
pub use bus::{
    CAN_BITRATE,
    DEQUEUE_TIMEOUT_MS,
    GEAR_FRAME_ID,
    IDLE_BACKOFF_MS,
    RPM_FRAME_ID,
    TELEMETRY_QUEUE_DEPTH,
};
pub use strip::{BAND_COUNT, RPM_CALIBRATION, RpmCalibration, STALE_POLICY, STRIP_LEN, StalePolicy};
