//! Constants used across the RTTY modulator.
//!
//! This module defines protocol-wide constants for bit framing, queue
//! sizing, and the timing limits that shape how delays are scheduled.
//!
//! ## Key Concepts
//!
//! - **Data width**: RTTY telemetry in the UKHAS convention transmits 7-bit
//!   ASCII; the high bit of every byte is ignored.
//! - **Half-bit timestep**: the blocking transmitter stores half of the bit
//!   period so that every hold can be split into two delay calls, keeping
//!   each call below the accuracy ceiling of typical busy-wait delays.
//! - **Queue sizing**: the asynchronous engine buffers pending bytes in a
//!   fixed-capacity SPSC queue drained one bit per timer tick.

/// Number of data bits transmitted per byte.
///
/// Only the low 7 bits of each byte go on the air; bit 7 is ignored.
pub const ASCII_BITS: u8 = 7;

/// Backing size of the pending-byte queue used by the asynchronous engine.
///
/// `heapless::spsc::Queue` holds `N - 1` elements, so this yields 255 usable
/// slots. Enqueueing into a full queue drops the byte.
pub const TX_QUEUE_LEN: usize = 256;

/// Usable capacity of the pending-byte queue.
pub const TX_QUEUE_CAPACITY: usize = TX_QUEUE_LEN - 1;

/// Numerator for deriving the half-bit timestep from a baud rate.
///
/// `timestep_us = 500_000 / baud` is half of the bit period
/// (`1_000_000 / baud`). The division truncates, which makes
/// baud-to-timestep-to-baud round trips lossy for rates that do not divide
/// 500000 evenly.
pub const HALF_BIT_NUMERATOR_US: u32 = 500_000;

/// Longest single busy-wait that typical `delay_us` implementations honour
/// accurately (the Arduino `delayMicroseconds` ceiling).
///
/// A full bit at 50 baud is 20000 us, above this limit, which is why every
/// bit hold is decomposed into two half-bit delays.
pub const MAX_ACCURATE_DELAY_US: u32 = 16_000;

/// Length of the checksum suffix appended to outgoing messages: a `*`
/// followed by four uppercase hex digits of the CRC16-CCITT.
pub const CHECKSUM_SUFFIX_LEN: usize = 5;

/// Conventional baud rate for long-range high-altitude-balloon RTTY.
pub const DEFAULT_BAUD: u32 = 50;
