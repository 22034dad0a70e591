//! Bit-level framing and message augmentation for the RTTY wire format.
//!
//! RTTY frames each byte as one start bit, seven data bits (least
//! significant first), and a configurable number of stop bits. In normal
//! keying polarity the start bit is driven low and the stop bits high;
//! reverse polarity inverts every level.
//!
//! The [`FrameEncoder`] here is deliberately stateless per bit: it decides
//! only which level a given bit position maps to. Both the blocking
//! transmitter ([`crate::driver::RttyDriver`]) and the interrupt-driven
//! engine ([`crate::asynch::AsyncRttyDriver`]) consume it, so the two
//! scheduling strategies cannot drift apart in their framing.
//!
//! This module also owns the message-augmentation step shared by both
//! transmitters: appending the `*XXXX` CRC16-CCITT suffix and the newline
//! terminator to the caller's buffer, in place. The suffix format is a wire
//! compatibility requirement of existing ground-station decoders (dl-fldigi
//! and friends); do not change it.

use crate::consts::ASCII_BITS;
use crate::crc::crc16;
use embedded_hal::digital::PinState;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Checksum mode appended to outgoing messages.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Checksum {
    /// No checksum; messages are terminated by a bare newline.
    None,
    /// CRC16-CCITT over the message body, appended as `*` plus four
    /// uppercase hex digits before the newline.
    #[default]
    Crc16,
}

/// Number of stop bits held after the data bits of each byte.
///
/// Modelled as a closed enum rather than a float so that timing code can
/// scale delays exactly, in half-bit units, without floating-point
/// comparisons.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum StopBits {
    /// One stop bit.
    One,
    /// One and a half stop bits (the classic RTTY framing).
    #[default]
    OneAndHalf,
    /// Two stop bits.
    Two,
}

impl StopBits {
    /// The stop-bit duration expressed in half-bit units (2, 3 or 4).
    pub const fn half_bit_units(self) -> u32 {
        match self {
            StopBits::One => 2,
            StopBits::OneAndHalf => 3,
            StopBits::Two => 4,
        }
    }
}

/// Errors surfaced for observability.
///
/// Transmission itself never fails: a full queue drops bytes and an idle
/// tick is a no-op. The only explicit error is the caller's message buffer
/// running out of room for the appended suffix, which would otherwise
/// truncate the frame silently.
#[derive(PartialEq, Eq, Clone, Copy, Debug, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// The message buffer had no spare capacity for the checksum suffix
    /// and newline terminator.
    #[error("message buffer full while appending transmission suffix")]
    BufferOverflow,
}

/// Stateless per-bit level encoder.
///
/// Maps frame positions (start bit, data bit `n`, stop bit) to line levels,
/// honouring the configured keying polarity. Shared by both transmitter
/// implementations.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct FrameEncoder {
    /// Reverse keying polarity: mark becomes low, space becomes high.
    pub reverse: bool,
}

impl FrameEncoder {
    /// Creates an encoder with the given keying polarity.
    pub const fn new(reverse: bool) -> Self {
        Self { reverse }
    }

    /// Line level of a start bit: low in normal polarity.
    pub fn start_bit(&self) -> PinState {
        self.keyed(PinState::Low)
    }

    /// Line level of a stop bit (and of the idle line): high in normal
    /// polarity.
    pub fn stop_bit(&self) -> PinState {
        self.keyed(PinState::High)
    }

    /// Line level of data bit `bit` (0 = least significant) of `byte`.
    ///
    /// Only bits 0 through [`ASCII_BITS`] - 1 are ever requested; higher
    /// bits of the byte are not transmitted.
    pub fn data_bit(&self, byte: u8, bit: u8) -> PinState {
        debug_assert!(bit < ASCII_BITS);
        if byte & (1 << bit) != 0 {
            self.keyed(PinState::High)
        } else {
            self.keyed(PinState::Low)
        }
    }

    fn keyed(&self, level: PinState) -> PinState {
        if self.reverse {
            match level {
                PinState::High => PinState::Low,
                PinState::Low => PinState::High,
            }
        } else {
            level
        }
    }
}

fn crc_suffix(crc: u16) -> [u8; 5] {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    [
        b'*',
        HEX[(crc >> 12) as usize & 0xf],
        HEX[(crc >> 8) as usize & 0xf],
        HEX[(crc >> 4) as usize & 0xf],
        HEX[crc as usize & 0xf],
    ]
}

/// Appends the transmission suffix to `msg` in place.
///
/// With [`Checksum::Crc16`] this is `*` followed by the four uppercase hex
/// digits of the CRC16-CCITT of the current buffer contents; with
/// [`Checksum::None`] nothing is added. A single `\n` terminator always
/// follows. Mutating the caller's buffer is a documented side effect, not a
/// copy: the caller must size the buffer with headroom for the suffix.
///
/// # Errors
/// [`Error::BufferOverflow`] when the buffer has no room left. The buffer
/// may have been partially extended at that point; its contents should be
/// considered unusable for transmission.
#[cfg(not(feature = "std"))]
pub fn augment_message<const N: usize>(msg: &mut Vec<u8, N>, checksum: Checksum) -> Result<(), Error> {
    if checksum == Checksum::Crc16 {
        let crc = crc16(msg);
        for byte in crc_suffix(crc) {
            msg.push(byte).map_err(|_| Error::BufferOverflow)?;
        }
    }
    msg.push(b'\n').map_err(|_| Error::BufferOverflow)?;
    Ok(())
}

/// Appends the transmission suffix to `msg` in place.
///
/// With [`Checksum::Crc16`] this is `*` followed by the four uppercase hex
/// digits of the CRC16-CCITT of the current buffer contents; with
/// [`Checksum::None`] nothing is added. A single `\n` terminator always
/// follows. Mutating the caller's buffer is a documented side effect, not a
/// copy.
///
/// # Errors
/// The `std` vector grows on demand, so this variant always returns `Ok`;
/// the `Result` is kept so callers are portable across both builds.
#[cfg(feature = "std")]
pub fn augment_message(msg: &mut Vec<u8>, checksum: Checksum) -> Result<(), Error> {
    if checksum == Checksum::Crc16 {
        let crc = crc16(msg);
        msg.extend_from_slice(&crc_suffix(crc));
    }
    msg.push(b'\n');
    Ok(())
}
