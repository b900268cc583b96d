//! LED strip geometry, RPM calibration, and stale-telemetry policy.

// =============================================================================
// Strip Geometry
// =============================================================================

/// Number of pixels on the WS2812 strip.
pub const STRIP_LEN: usize = 16;

/// Number of shift-light color bands (green, yellow, orange, red groups).
pub const BAND_COUNT: usize = 12;

const _: () = assert!(BAND_COUNT <= STRIP_LEN);

// =============================================================================
// RPM Calibration
// =============================================================================

/// Maps engine speed to the number of lit bands.
///
/// `bands = clamp(floor((rpm - rpm_min) / rpm_step), 0, BAND_COUNT)`, so the
/// first band lights at `rpm_min + rpm_step` and the full bar is reached at
/// `rpm_min + BAND_COUNT * rpm_step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RpmCalibration {
    /// Engine speed at or below which the strip is fully dark.
    pub rpm_min: u16,
    /// RPM span covered by each band.
    pub rpm_step: u16,
}

/// Default calibration: bands from 1500 rpm up, full bar at 7000 rpm.
pub const RPM_CALIBRATION: RpmCalibration = RpmCalibration {
    rpm_min: 1_000,
    rpm_step: 500,
};

const _: () = assert!(RPM_CALIBRATION.rpm_step > 0);
// The full bar must stay representable in a u16 rpm value
const _: () = assert!(
    RPM_CALIBRATION.rpm_min as u32 + BAND_COUNT as u32 * RPM_CALIBRATION.rpm_step as u32
        <= u16::MAX as u32
);

// =============================================================================
// Stale-Telemetry Policy
// =============================================================================

/// What the renderer does when no fresh RPM sample arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StalePolicy {
    /// Keep the last rendered pattern indefinitely.
    Hold,
    /// Write one all-dark frame after this many milliseconds of bus silence,
    /// then hold until fresh data arrives.
    BlankAfterMs(u64),
}

/// Active policy: a frozen shift light is misleading at speed, so blank the
/// strip after two seconds of bus silence.
pub const STALE_POLICY: StalePolicy = StalePolicy::BlankAfterMs(2_000);

// =============================================================================
// Demo Mode
// =============================================================================

/// Delay between pixels of the boot sweep animation (demo builds only).
pub const DEMO_SWEEP_STEP_MS: u64 = 50;
