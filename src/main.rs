//! CAN Shift-Light Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Listens on the vehicle CAN bus, decodes engine RPM and selected-gear
//! telemetry, and renders a progressive shift-light pattern (green, yellow,
//! orange, red) on a 16-pixel WS2812 strip plus a gear digit on a 7-segment
//! module.
//!
//! # Architecture
//!
//! Two cores, three tasks, two bounded queues:
//! - Core 0: CAN reader polls the MCP2515, decodes frames of interest, and
//!   publishes samples into the RPM and gear queues (drop-newest on full).
//! - Core 1: the shift-light renderer and the gear display each consume
//!   their own queue under one cooperative executor, with bounded dequeues
//!   so the stale-telemetry policy gets re-evaluated on bus silence.
//!
//! With the `demo-telemetry` feature the reader is replaced by a synthetic
//! generator and the boot sweep animation is enabled; no bus hardware is
//! required.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

// Modules only used in the binary (board bring-up, drivers, tasks)
#[cfg(target_arch = "arm")]
mod bus;
#[cfg(target_arch = "arm")]
mod tasks;

#[cfg(target_arch = "arm")]
use defmt::info;
#[cfg(target_arch = "arm")]
use embassy_executor::Executor;
#[cfg(target_arch = "arm")]
use embassy_rp::gpio::{Level, Output};
#[cfg(target_arch = "arm")]
use embassy_rp::multicore::{Stack, spawn_core1};
#[cfg(target_arch = "arm")]
use embassy_rp::watchdog::Watchdog;
#[cfg(target_arch = "arm")]
use embassy_time::Duration;
#[cfg(target_arch = "arm")]
use shiftlight_pico2::config::bus::WATCHDOG_TIMEOUT_MS;
#[cfg(target_arch = "arm")]
use static_cell::StaticCell;
#[cfg(target_arch = "arm")]
use {defmt_rtt as _, panic_probe as _};

// Program metadata for `picotool info`
#[cfg(target_arch = "arm")]
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"shiftlight-pico2"),
    embassy_rp::binary_info::rp_program_description!(c"CAN bus shift light on a WS2812 strip"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

/// Stack for the core-1 executor.
#[cfg(target_arch = "arm")]
static mut CORE1_STACK: Stack<8192> = Stack::new();

#[cfg(target_arch = "arm")]
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();

#[cfg(target_arch = "arm")]
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

#[cfg(target_arch = "arm")]
#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    info!("shift light firmware starting");

    // Hardware watchdog, fed by the core-0 producer task each wakeup
    let mut watchdog = Watchdog::new(p.WATCHDOG);
    watchdog.start(Duration::from_millis(WATCHDOG_TIMEOUT_MS));

    // Bus controller bring-up. Failure is fatal: a shift light with no
    // telemetry path is meaningless.
    #[cfg(not(feature = "demo-telemetry"))]
    let controller = {
        use embassy_rp::spi::{self, Spi};
        use shiftlight_pico2::config::bus::CAN_BITRATE;

        let mut config = spi::Config::default();
        config.frequency = bus::SPI_FREQ_HZ;
        let spi = Spi::new_blocking(p.SPI0, p.PIN_2, p.PIN_3, p.PIN_4, config);
        let cs = Output::new(p.PIN_5, Level::High);
        match bus::CanController::begin(spi, cs, CAN_BITRATE) {
            Ok(controller) => {
                info!("CAN controller initialized at {} bps", CAN_BITRATE);
                controller
            }
            Err(err) => defmt::panic!("CAN controller init failed: {}", err),
        }
    };

    // Gear indicator: segments a through g on consecutive GPIOs
    let display = tasks::gear::SegmentDisplay::new([
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
    ]);

    // Display consumers share core 1 under one cooperative executor
    let pio = p.PIO0;
    let dma = p.DMA_CH0;
    let strip_pin = p.PIN_16;
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| {
                spawner
                    .spawn(tasks::shiftlight::shift_light_task(pio, dma, strip_pin))
                    .unwrap();
                spawner
                    .spawn(tasks::gear::gear_display_task(display))
                    .unwrap();
            })
        },
    );
    info!("display tasks spawned on core 1");

    // The telemetry producer owns core 0
    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        #[cfg(not(feature = "demo-telemetry"))]
        spawner
            .spawn(tasks::reader::can_reader_task(controller, watchdog))
            .unwrap();
        #[cfg(feature = "demo-telemetry")]
        spawner
            .spawn(tasks::demo::demo_telemetry_task(watchdog))
            .unwrap();
    })
}

/// The firmware entry point only exists for the ARM target; building the
/// binary for the host is a no-op so `cargo test` works without a cross
/// toolchain.
#[cfg(not(target_arch = "arm"))]
fn main() {}
