//! Timer and tick-loop utilities for the RTTY drivers.
//!
//! The asynchronous engine needs its [`tick()`](crate::asynch::AsyncRttyDriver::tick)
//! called once per bit period. Two approaches are supported: an interrupt
//! service routine with the driver behind a `critical_section` mutex
//! (`timer-isr` feature), or a blocking busy-loop driven by
//! `embedded_hal::delay::DelayNs` (`delay-loop` feature).
//!
//! Contains helpers for polling- and ISR-based scheduling, including:
//! - `bit_period_us` / `const_bit_period_us`: bit-period derivation
//! - `compute_ocr_value`: runtime OCR calculator for AVR CTC timers
//! - `const_ocr_value`: compile-time OCR calculator
//! - `run_rtty_tick_loop`: blocking driver loop for DelayNs (feature `delay-loop`)
//! - `global_rtty_timer_tick` and `tick_rtty_timer!()`: interrupt-based tick
//!   callback wrappers (feature `timer-isr`)
//!
//! Bit periods across the supported baud range (for timer budgeting):
//!
//! | Baud | Bit period | Frame (7N2) |
//! |------|------------|-------------|
//! |   45 |   22222 us |      222 ms |
//! |   50 |   20000 us |      200 ms |
//! |   75 |   13333 us |      133 ms |
//! |  300 |    3333 us |       33 ms |

use libm::round;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// Microseconds in one second, for period derivations.
pub const MICROSECONDS_PER_SECOND: u32 = 1_000_000;

/// Computes the bit period in microseconds for a baud rate.
///
/// The tick source must fire once per this interval. Integer division
/// truncates (20000 us at 50 baud, 3333 us at 300 baud).
pub fn bit_period_us(baud: u32) -> u32 {
    MICROSECONDS_PER_SECOND / baud
}

/// Compile-time bit period calculator, for `const` timer configuration.
pub const fn const_bit_period_us(baud: u32) -> u32 {
    MICROSECONDS_PER_SECOND / baud
}

/// Computes the OCR value for an AVR timer (CTC mode) firing once per bit.
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256, 1024)
/// - `baud`: RTTY bit rate (e.g., 50)
///
/// # Returns
/// OCR value for OCRnA (rounds to nearest integer). At 16 MHz with a 1024
/// prescaler and 50 baud this is 313.
pub fn compute_ocr_value(f_cpu: u32, prescaler: u32, baud: u32) -> u16 {
    let ticks_per_second = f_cpu as f64 / prescaler as f64;
    round(ticks_per_second / baud as f64) as u16
}

/// Compile-time OCR value calculator.
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256, 1024)
/// - `baud`: RTTY bit rate (e.g., 50)
///
/// # Returns
/// OCR value for OCRnA (rounds to nearest integer).
pub const fn const_ocr_value(f_cpu: u32, prescaler: u32, baud: u32) -> u16 {
    (((f_cpu / prescaler) + baud / 2) / baud) as u16
}
