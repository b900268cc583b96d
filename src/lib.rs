//! Shift-light library - testable modules for the CAN shift-light firmware.
//!
//! This library contains the core pipeline logic that can be tested on the
//! host machine: CAN frame decoding, the telemetry queues with their
//! backpressure policy, the shift-light band math, the gear segment mapping,
//! and the diagnostic ring buffer. The binary (`main.rs`) uses this library
//! and adds the embedded-specific code (board bring-up, MCP2515 driver,
//! WS2812 strip, Embassy tasks).
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]

// === Pure logic modules (testable on host, no ARM dependencies) ===

// Configuration
pub mod config;

// Telemetry pipeline
pub mod channels;
pub mod frame;
pub mod gear;
pub mod telemetry;

// Rendering
pub mod colors;
pub mod shiftlight;

// Diagnostics
pub mod diag;
