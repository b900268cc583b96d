//! CAN bus controller: MCP2515 over SPI, polled.
//!
//! The RP2350 has no CAN peripheral, so the bus hangs off an MCP2515 with a
//! 16 MHz crystal on SPI0. The controller's interrupt line is deliberately
//! unused: the reader polls with an explicit idle backoff, which keeps its
//! liveness self-contained and matches the pull-based collaborator model.
//!
//! Native driver frames are converted to [`CanFrame`] snapshots at this
//! boundary so nothing downstream depends on driver types.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_can::{Frame as _, Id};
use embedded_hal_bus::spi::ExclusiveDevice;
use mcp2515::error::Error as McpError;
use mcp2515::regs::OpMode;
use mcp2515::{CanSpeed, MCP2515, McpSpeed, Settings};

use shiftlight_pico2::frame::{CanFrame, MAX_FRAME_PAYLOAD};

/// SPI clock for the MCP2515 (10 MHz ceiling per datasheet).
pub const SPI_FREQ_HZ: u32 = 10_000_000;

/// Controller read faults (SPI or driver errors other than "no message").
pub static BUS_FAULTS: AtomicU32 = AtomicU32::new(0);

type SpiDev = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, Delay>;

/// Fatal bring-up failure. The firmware aborts startup on this: a shift
/// light with no telemetry path is meaningless.
#[derive(Debug, defmt::Format)]
pub enum InitError {
    /// Chip-select setup failed.
    Spi,
    /// The MCP2515 rejected configuration (wrong wiring or crystal).
    Controller,
}

/// Exclusive handle to the bus controller. Owned by the reader task.
pub struct CanController {
    mcp: MCP2515<SpiDev>,
}

impl CanController {
    /// Bring the controller up in normal mode at the requested bitrate.
    pub fn begin(
        spi: Spi<'static, SPI0, Blocking>,
        cs: Output<'static>,
        bitrate: u32,
    ) -> Result<Self, InitError> {
        let device = ExclusiveDevice::new(spi, cs, Delay).map_err(|_| InitError::Spi)?;
        let mut mcp = MCP2515::new(device);
        mcp.init(
            &mut Delay,
            Settings {
                mode: OpMode::Normal,
                can_speed: can_speed_for(bitrate),
                mcp_speed: McpSpeed::MHz16,
                clkout_en: false,
            },
        )
        .map_err(|_| InitError::Controller)?;
        Ok(Self { mcp })
    }

    /// Pull the next pending frame, or `None` when no frame is available.
    /// Read faults are counted and treated as an idle bus.
    pub fn poll_frame(&mut self) -> Option<CanFrame> {
        match self.mcp.read_message() {
            Ok(native) => Some(convert(&native)),
            Err(McpError::NoMessage) => None,
            Err(_) => {
                BUS_FAULTS.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }
}

fn can_speed_for(bitrate: u32) -> CanSpeed {
    match bitrate {
        1_000_000 => CanSpeed::Kbps1000,
        500_000 => CanSpeed::Kbps500,
        250_000 => CanSpeed::Kbps250,
        _ => CanSpeed::Kbps125,
    }
}

fn convert(native: &mcp2515::frame::CanFrame) -> CanFrame {
    let (id, extended) = match native.id() {
        Id::Standard(id) => (u32::from(id.as_raw()), false),
        Id::Extended(id) => (id.as_raw(), true),
    };
    let rtr = native.is_remote_frame();
    let dlc = native.dlc().min(MAX_FRAME_PAYLOAD);
    let mut data = [0u8; MAX_FRAME_PAYLOAD];
    if !rtr {
        // Remote frames advertise a length but carry no payload bytes
        let len = native.data().len().min(dlc);
        data[..len].copy_from_slice(&native.data()[..len]);
    }
    CanFrame {
        id,
        extended,
        rtr,
        dlc: dlc as u8,
        data,
    }
}
