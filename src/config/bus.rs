//! CAN bus wire contract and pipeline timing constants.
//!
//! The payload layouts below are the versioned wire contract with the
//! vehicle: changing vehicles means editing this module, never the decoder.
//!
//! # Compile-Time Validation
//!
//! Layout constants carry `const` assertions so a payload offset that no
//! longer fits inside a classic CAN frame fails the build instead of
//! producing a decoder that can never match.

use crate::frame::MAX_FRAME_PAYLOAD;

// =============================================================================
// Bus Configuration
// =============================================================================

/// CAN bus bitrate in bits per second.
pub const CAN_BITRATE: u32 = 1_000_000;

// =============================================================================
// Frame Identifiers (11-bit standard IDs)
// =============================================================================

/// Identifier of the engine-speed broadcast frame (1907 decimal).
pub const RPM_FRAME_ID: u32 = 0x773;

/// Identifier of the selected-gear broadcast frame (1911 decimal).
pub const GEAR_FRAME_ID: u32 = 0x777;

// =============================================================================
// Payload Layout (versioned wire contract)
// =============================================================================

/// Version of the payload layout described below. Bump on any change to the
/// offsets, endianness, or scale factors in this section.
pub const PAYLOAD_LAYOUT_VERSION: u8 = 1;

/// Byte offset of the engine-speed word inside the RPM frame payload.
/// The word is an unsigned 16-bit big-endian value.
pub const RPM_BYTE_OFFSET: usize = 0;

/// Raw counts per rpm: the wire value is `rpm * 4` (quarter-rpm resolution,
/// 0..16383 rpm representable in 16 bits).
pub const RPM_RAW_PER_RPM: u16 = 4;

/// Byte offset of the gear byte inside the gear frame payload.
pub const GEAR_BYTE_OFFSET: usize = 0;

/// Gear byte value for neutral.
pub const GEAR_RAW_NEUTRAL: u8 = 0x00;

/// Gear byte value for reverse.
pub const GEAR_RAW_REVERSE: u8 = 0x7F;

/// Highest forward gear the vehicle reports (raw values 1..=9).
pub const MAX_FORWARD_GEAR: u8 = 9;

// An RPM word that starts past byte 6 cannot fit in a classic CAN frame
const _: () = assert!(RPM_BYTE_OFFSET + 2 <= MAX_FRAME_PAYLOAD);
const _: () = assert!(GEAR_BYTE_OFFSET < MAX_FRAME_PAYLOAD);
const _: () = assert!(GEAR_RAW_NEUTRAL != GEAR_RAW_REVERSE);
const _: () = assert!(MAX_FORWARD_GEAR as u32 + 1 <= GEAR_RAW_REVERSE as u32);

// =============================================================================
// Queue and Timing Configuration
// =============================================================================

/// Capacity of each telemetry handoff queue.
pub const TELEMETRY_QUEUE_DEPTH: usize = 100;

/// Reader backoff while the bus is idle, in milliseconds. Prevents the poll
/// loop from starving sibling tasks on the same core.
pub const IDLE_BACKOFF_MS: u64 = 10;

/// Bounded wait for consumer dequeues, in milliseconds. Each timeout wakeup
/// lets the consumer re-evaluate the stale-telemetry policy.
pub const DEQUEUE_TIMEOUT_MS: u64 = 250;

/// Hardware watchdog period, in milliseconds. Fed by the reader each wakeup.
pub const WATCHDOG_TIMEOUT_MS: u64 = 2_000;

const _: () = assert!(TELEMETRY_QUEUE_DEPTH > 0);
const _: () = assert!(IDLE_BACKOFF_MS > 0);
// The watchdog must outlast several idle backoff cycles
const _: () = assert!(WATCHDOG_TIMEOUT_MS > IDLE_BACKOFF_MS * 10);
