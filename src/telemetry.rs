//! Pure CAN frame decoding into telemetry samples.
//!
//! `decode_frame` is a deterministic function of the frame bytes with no
//! scheduling or driver dependencies, so the wire contract in
//! [`crate::config::bus`] is testable on the host in isolation from the
//! polling loop.

use crate::config::bus::{
    GEAR_BYTE_OFFSET,
    GEAR_FRAME_ID,
    RPM_BYTE_OFFSET,
    RPM_FRAME_ID,
    RPM_RAW_PER_RPM,
};
use crate::frame::CanFrame;
use crate::gear::Gear;

/// Decoded engine speed in rpm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct RpmSample {
    pub value: u16,
}

/// Decoded selected gear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct GearSample {
    pub value: Gear,
}

/// A decoded domain value, tagged by which message identifier produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum TelemetrySample {
    Rpm(RpmSample),
    Gear(GearSample),
}

/// Transient decode fault on a recognized identifier. The frame is dropped
/// and the pipeline continues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum DecodeError {
    /// Payload shorter than the layout requires for this identifier.
    TruncatedPayload { id: u32, dlc: u8 },
    /// Gear byte outside the wire contract.
    GearOutOfRange { raw: u8 },
}

/// Decode one frame.
///
/// - RTR frames carry no payload and produce no sample.
/// - Unrecognized identifiers produce no sample.
/// - Recognized identifiers with a malformed payload return an error.
pub fn decode_frame(frame: &CanFrame) -> Result<Option<TelemetrySample>, DecodeError> {
    if frame.rtr {
        return Ok(None);
    }
    // Both telemetry frames use 11-bit identifiers
    if frame.extended {
        return Ok(None);
    }

    match frame.id {
        RPM_FRAME_ID => decode_rpm(frame).map(|s| Some(TelemetrySample::Rpm(s))),
        GEAR_FRAME_ID => decode_gear(frame).map(|s| Some(TelemetrySample::Gear(s))),
        _ => Ok(None),
    }
}

fn decode_rpm(frame: &CanFrame) -> Result<RpmSample, DecodeError> {
    let payload = frame.payload();
    if payload.len() < RPM_BYTE_OFFSET + 2 {
        return Err(DecodeError::TruncatedPayload {
            id: frame.id,
            dlc: frame.dlc,
        });
    }
    // Big-endian quarter-rpm word, see config::bus::PAYLOAD_LAYOUT_VERSION
    let raw = u16::from_be_bytes([payload[RPM_BYTE_OFFSET], payload[RPM_BYTE_OFFSET + 1]]);
    Ok(RpmSample {
        value: raw / RPM_RAW_PER_RPM,
    })
}

fn decode_gear(frame: &CanFrame) -> Result<GearSample, DecodeError> {
    let payload = frame.payload();
    if payload.len() <= GEAR_BYTE_OFFSET {
        return Err(DecodeError::TruncatedPayload {
            id: frame.id,
            dlc: frame.dlc,
        });
    }
    let raw = payload[GEAR_BYTE_OFFSET];
    match Gear::from_raw(raw) {
        Some(gear) => Ok(GearSample { value: gear }),
        None => Err(DecodeError::GearOutOfRange { raw }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// 6500 rpm at quarter-rpm resolution: 26000 = 0x6590, big-endian.
    fn rpm_frame_6500() -> CanFrame {
        CanFrame::data_frame(RPM_FRAME_ID, &[0x65, 0x90])
    }

    #[test]
    fn test_rpm_decode_is_deterministic() {
        let frame = rpm_frame_6500();
        let first = decode_frame(&frame).unwrap();
        let second = decode_frame(&frame).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            Some(TelemetrySample::Rpm(RpmSample { value: 6_500 }))
        );
    }

    #[test]
    fn test_rpm_decode_ignores_trailing_bytes() {
        // Longer payloads are fine, only the layout bytes are read
        let frame = CanFrame::data_frame(RPM_FRAME_ID, &[0x65, 0x90, 0xDE, 0xAD]);
        assert_eq!(
            decode_frame(&frame).unwrap(),
            Some(TelemetrySample::Rpm(RpmSample { value: 6_500 }))
        );
    }

    #[test]
    fn test_rtr_frame_produces_no_sample() {
        let frame = CanFrame::remote_frame(RPM_FRAME_ID, 2);
        assert_eq!(decode_frame(&frame).unwrap(), None);
    }

    #[test]
    fn test_unrecognized_id_produces_no_sample() {
        let frame = CanFrame::data_frame(0x100, &[0x65, 0x90]);
        assert_eq!(decode_frame(&frame).unwrap(), None);
    }

    #[test]
    fn test_extended_id_produces_no_sample() {
        let mut frame = CanFrame::data_frame(RPM_FRAME_ID, &[0x65, 0x90]);
        frame.extended = true;
        assert_eq!(decode_frame(&frame).unwrap(), None);
    }

    #[test]
    fn test_truncated_rpm_payload_is_an_error() {
        let frame = CanFrame::data_frame(RPM_FRAME_ID, &[0x65]);
        assert_eq!(
            decode_frame(&frame),
            Err(DecodeError::TruncatedPayload {
                id: RPM_FRAME_ID,
                dlc: 1
            })
        );
    }

    #[test]
    fn test_gear_decode() {
        let frame = CanFrame::data_frame(GEAR_FRAME_ID, &[3]);
        assert_eq!(
            decode_frame(&frame).unwrap(),
            Some(TelemetrySample::Gear(GearSample {
                value: Gear::Forward(3)
            }))
        );
    }

    #[test]
    fn test_gear_neutral_and_reverse() {
        let neutral = CanFrame::data_frame(GEAR_FRAME_ID, &[0x00]);
        let reverse = CanFrame::data_frame(GEAR_FRAME_ID, &[0x7F]);
        assert_eq!(
            decode_frame(&neutral).unwrap(),
            Some(TelemetrySample::Gear(GearSample {
                value: Gear::Neutral
            }))
        );
        assert_eq!(
            decode_frame(&reverse).unwrap(),
            Some(TelemetrySample::Gear(GearSample {
                value: Gear::Reverse
            }))
        );
    }

    #[test]
    fn test_gear_out_of_range_is_an_error() {
        let frame = CanFrame::data_frame(GEAR_FRAME_ID, &[0xEE]);
        assert_eq!(
            decode_frame(&frame),
            Err(DecodeError::GearOutOfRange { raw: 0xEE })
        );
    }

    #[test]
    fn test_empty_gear_payload_is_an_error() {
        let frame = CanFrame::data_frame(GEAR_FRAME_ID, &[]);
        assert_eq!(
            decode_frame(&frame),
            Err(DecodeError::TruncatedPayload {
                id: GEAR_FRAME_ID,
                dlc: 0
            })
        );
    }
}
