//! # rtty
//!
//! A portable, no_std Rust driver for generating an RTTY (radioteletype)
//! bitstream on a single digital output line, aimed at low-baud telemetry
//! links such as amateur high-altitude-balloon trackers driving a radio
//! module's TXD pin (e.g. a Radiometrix NTX2).
//!
//! This driver implements a software RTTY modulator using:
//! - `embedded-hal` traits for digital I/O and timing
//! - start/stop-bit framing of 7-bit ASCII, LSB first, at 45-300 baud
//! - CRC16-CCITT checksum augmentation of outgoing messages
//! - interrupt-safe queue access with `critical-section`
//! - optional tick sources using either timer interrupts or blocking delay
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support and replaces `heapless::Vec`s with
//! `std::vec::Vec`s |
//! | `delay-loop`          | Blocking tick loop driven by `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | `critical_section` global-singleton helpers for timer ISRs |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Software Features
//!
//! - **Blocking and interrupt-driven transmitters** in pure software (no UART)
//! - Wire format compatible with the UKHAS high-altitude-balloon convention:
//!   message text, an optional `*XXXX` CRC16-CCITT suffix, and a newline
//! - Normal or reverse keying polarity, 1 / 1.5 / 2 stop bits
//! - Fully portable across AVR (e.g., Arduino Uno) and ARM Cortex-M targets
//!
//! ## Usage
//!
//! Blocking transmission occupies the caller for the whole message:
//!
//! ```rust,ignore
//! use rtty::driver::RttyDriver;
//! use rtty::frame::{Checksum, StopBits};
//!
//! let mut driver: RttyDriver<_, _, ()> =
//!     RttyDriver::new(tx_pin, delay, 50, StopBits::OneAndHalf, Checksum::Crc16, false, None);
//! driver.transmit(&mut message)?;
//! ```
//!
//! Or enqueue bytes and clock them out one bit per timer interrupt:
//!
//! ```rust,ignore
//! use rtty::asynch::AsyncRttyDriver;
//!
//! driver.transmit_async(&mut message)?;
//! loop {
//!     driver.tick(); // Call once per bit period (20 ms at 50 baud)
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - The asynchronous engine emits exactly one bit-time of output per
//!   [`tick()`](asynch::AsyncRttyDriver::tick); the tick source must run at
//!   the bit rate (`1_000_000 / baud` microseconds per tick).
//! - Only one driver instance should be active at a time in interrupt-driven
//!   mode; see [`timer`] for the singleton helpers.
//! - Once queued, bytes cannot be cancelled; drain by polling
//!   [`buffer_size()`](asynch::AsyncRttyDriver::buffer_size) or
//!   [`wait_drained()`](asynch::AsyncRttyDriver::wait_drained).
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

pub mod asynch;
pub mod consts;
pub mod crc;
pub mod driver;
pub mod frame;
pub mod timer;
