//! Blocking RTTY transmitter.
//!
//! This module provides the [`RttyDriver`] struct, a synchronous software
//! modulator that clocks an RTTY bitstream out of a single digital output
//! using only an `embedded-hal` [`OutputPin`] and a [`DelayNs`] timing
//! source. Calling [`transmit()`](RttyDriver::transmit) occupies the caller
//! for the full duration of the message: roughly
//! `(1 + 7 + stopbits) * bit period` per byte, which at 50 baud is about
//! 190 ms per character.
//!
//! For transmission that proceeds in the background one bit per timer
//! interrupt, see [`crate::asynch::AsyncRttyDriver`]; both transmitters
//! share the same [`FrameEncoder`] so their wire output is identical.
//!
//! ## Timing
//!
//! Every bit hold is issued as **two** half-bit delays rather than one full
//! one. Common `delay_us` implementations lose accuracy above roughly
//! 16000 us, and a full bit at 50 baud is 20000 us; halving keeps each call
//! inside the accurate range across the supported 45-300 baud span.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! use rtty::driver::RttyDriver;
//! use rtty::frame::{Checksum, StopBits};
//!
//! # let tx_pin = Pin::new(&[PinTransaction::set(PinState::High)]);
//! let mut driver: RttyDriver<Pin, NoopDelay, ()> = RttyDriver::new(
//!     tx_pin,
//!     NoopDelay::new(),
//!     50,
//!     StopBits::OneAndHalf,
//!     Checksum::Crc16,
//!     false,
//!     None,
//! );
//! # driver.tx.done();
//! ```

use crate::consts::{ASCII_BITS, HALF_BIT_NUMERATOR_US};
use crate::frame::{Checksum, Error, FrameEncoder, StopBits, augment_message};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Optional consumer that receives a copy of each transmitted byte.
///
/// Typically backed by a debug console or logging UART. A byte is echoed
/// once its data bits have been clocked out.
pub trait EchoSink {
    /// Consumes one transmitted byte.
    fn echo(&mut self, byte: u8);
}

/// No-op echo sink for drivers constructed without one.
impl EchoSink for () {
    fn echo(&mut self, _byte: u8) {}
}

/// A blocking software RTTY modulator.
///
/// `RttyDriver` owns the line configuration (keying polarity, baud-derived
/// timestep, stop bits, checksum mode, optional echo sink) and drives the TX
/// pin directly. All configuration is mutable at any time via setters and
/// takes effect on the next transmission.
///
/// ## Type Parameters
///
/// - `TX`: the output pin keying the radio, implementing [`OutputPin`]
/// - `D`: the busy-wait delay source, implementing [`DelayNs`]
/// - `E`: the optional echo sink; use `()` when echo is not wanted
///
/// ## Notes
///
/// - The constructor drives the line to the stop-bit level, the RTTY idle
///   ("mark") condition.
/// - Pin errors are ignored: there is no recoverable failure mode in a
///   keyed transmission, and a misconfigured pin surfaces at configuration
///   time, not here.
#[derive(Debug)]
pub struct RttyDriver<TX, D, E>
where
    TX: OutputPin,
    D: DelayNs,
    E: EchoSink,
{
    /// TX pin keying the radio.
    pub tx: TX,
    delay: D,
    frame: FrameEncoder,
    /// Half of the bit period, in microseconds.
    timestep_us: u32,
    stop_bits: StopBits,
    checksum: Checksum,
    /// Optional sink receiving a copy of each transmitted byte.
    pub echo: Option<E>,
}

impl<TX, D, E> RttyDriver<TX, D, E>
where
    TX: OutputPin,
    D: DelayNs,
    E: EchoSink,
{
    /// Creates a new blocking transmitter and idles the line at the
    /// stop-bit (mark) level.
    ///
    /// # Arguments
    /// - `tx`: the output pin keying the radio.
    /// - `delay`: microsecond delay source used for bit timing.
    /// - `baud`: bit rate, typically 45-300 for telemetry links.
    /// - `stop_bits`: stop-bit count held after each byte's data bits.
    /// - `checksum`: suffix mode applied by [`transmit()`](Self::transmit).
    /// - `reverse`: invert the keying polarity.
    /// - `echo`: optional sink receiving a copy of each transmitted byte.
    pub fn new(
        tx: TX,
        delay: D,
        baud: u32,
        stop_bits: StopBits,
        checksum: Checksum,
        reverse: bool,
        echo: Option<E>,
    ) -> Self {
        let frame = FrameEncoder::new(reverse);
        #[allow(unused_mut)]
        let mut tx = tx;
        let _ = tx.set_state(frame.stop_bit()); // Idle at mark
        Self {
            tx,
            delay,
            frame,
            timestep_us: HALF_BIT_NUMERATOR_US / baud,
            stop_bits,
            checksum,
            echo,
        }
    }

    /// Transmits `msg` over the line, blocking until the last stop bit.
    ///
    /// The checksum suffix (per the configured [`Checksum`] mode) and a
    /// newline terminator are appended to `msg` **in place** before
    /// anything is sent; the caller's buffer must have spare capacity for
    /// them (see [`augment_message`]).
    #[cfg(not(feature = "std"))]
    pub fn transmit<const N: usize>(&mut self, msg: &mut Vec<u8, N>) -> Result<(), Error> {
        augment_message(msg, self.checksum)?;
        for &byte in msg.iter() {
            self.transmit_byte(byte);
        }
        Ok(())
    }

    /// Transmits `msg` over the line, blocking until the last stop bit.
    ///
    /// The checksum suffix (per the configured [`Checksum`] mode) and a
    /// newline terminator are appended to `msg` **in place** before
    /// anything is sent (see [`augment_message`]).
    #[cfg(feature = "std")]
    pub fn transmit(&mut self, msg: &mut Vec<u8>) -> Result<(), Error> {
        augment_message(msg, self.checksum)?;
        for i in 0..msg.len() {
            self.transmit_byte(msg[i]);
        }
        Ok(())
    }

    /// Clocks a single byte out with full start/stop framing.
    ///
    /// Drives the start bit for one bit period, the 7 data bits LSB first
    /// for one bit period each, echoes the byte to the sink if one is
    /// attached, then holds the stop level for `stop_bits` bit periods.
    /// Blocks for the whole frame.
    pub fn transmit_byte(&mut self, byte: u8) {
        let _ = self.tx.set_state(self.frame.start_bit());
        self.hold_bit();

        for bit in 0..ASCII_BITS {
            let _ = self.tx.set_state(self.frame.data_bit(byte, bit));
            self.hold_bit();
        }

        if let Some(echo) = self.echo.as_mut() {
            echo.echo(byte);
        }

        let _ = self.tx.set_state(self.frame.stop_bit());
        self.hold_stop();
    }

    // One full bit period as two half-bit delays; a single call would
    // exceed the ~16 ms delay accuracy ceiling at 50 baud.
    fn hold_bit(&mut self) {
        self.delay.delay_us(self.timestep_us);
        self.delay.delay_us(self.timestep_us);
    }

    // Stop-bit hold scaled by the configured stop-bit count, again split
    // into two delays.
    fn hold_stop(&mut self) {
        let half = self.timestep_us * self.stop_bits.half_bit_units() / 2;
        self.delay.delay_us(half);
        self.delay.delay_us(half);
    }

    /// Sets a new baud rate; takes effect on the next bit transmitted.
    ///
    /// Only the derived half-bit timestep is stored, and the division
    /// truncates, so [`baud()`](Self::baud) is a lossy inverse for rates
    /// that do not divide 500000 evenly.
    pub fn set_baud(&mut self, baud: u32) {
        self.timestep_us = HALF_BIT_NUMERATOR_US / baud;
    }

    /// Returns the current baud rate, recomputed from the stored timestep.
    pub fn baud(&self) -> u32 {
        HALF_BIT_NUMERATOR_US / self.timestep_us
    }

    /// Sets the checksum mode applied to subsequent transmissions.
    pub fn set_checksum(&mut self, checksum: Checksum) {
        self.checksum = checksum;
    }

    /// Returns the current checksum mode.
    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// Sets the stop-bit count held after each byte.
    pub fn set_stop_bits(&mut self, stop_bits: StopBits) {
        self.stop_bits = stop_bits;
    }

    /// Returns the current stop-bit count.
    pub fn stop_bits(&self) -> StopBits {
        self.stop_bits
    }

    /// Sets the keying polarity.
    pub fn set_reverse(&mut self, reverse: bool) {
        self.frame = FrameEncoder::new(reverse);
    }

    /// Returns `true` when reverse keying polarity is configured.
    pub fn reverse(&self) -> bool {
        self.frame.reverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    // Expected pin writes for one framed byte, built independently of the
    // FrameEncoder: start low, 7 data bits LSB first, stop high.
    fn byte_states(byte: u8, reverse: bool) -> Vec<PinState> {
        let level = |high: bool| match high ^ reverse {
            true => PinState::High,
            false => PinState::Low,
        };
        let mut states = vec![level(false)];
        for bit in 0..7 {
            states.push(level(byte & (1 << bit) != 0));
        }
        states.push(level(true));
        states
    }

    fn transactions(states: &[PinState]) -> Vec<PinTransaction> {
        states.iter().map(|&s| PinTransaction::set(s)).collect()
    }

    #[test]
    fn test_new_idles_line_at_mark() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut driver: RttyDriver<_, _, ()> =
            RttyDriver::new(tx, NoopDelay::new(), 50, StopBits::OneAndHalf, Checksum::Crc16, false, None);
        assert_eq!(driver.baud(), 50);
        assert_eq!(driver.checksum(), Checksum::Crc16);
        assert_eq!(driver.stop_bits(), StopBits::OneAndHalf);
        driver.tx.done();
    }

    #[test]
    fn test_new_reverse_idles_line_low() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let mut driver: RttyDriver<_, _, ()> =
            RttyDriver::new(tx, NoopDelay::new(), 50, StopBits::One, Checksum::None, true, None);
        assert!(driver.reverse());
        driver.tx.done();
    }

    #[test]
    fn test_transmit_byte_frames_with_start_and_stop() {
        let mut expected = vec![PinState::High]; // idle mark from new()
        expected.extend(byte_states(0b101_0101, false));
        let tx = PinMock::new(&transactions(&expected));

        let mut driver: RttyDriver<_, _, ()> =
            RttyDriver::new(tx, NoopDelay::new(), 300, StopBits::One, Checksum::None, false, None);
        driver.transmit_byte(0b101_0101);
        driver.tx.done();
    }

    #[test]
    fn test_reverse_trace_is_complement() {
        let mut expected = vec![PinState::Low];
        expected.extend(byte_states(0b101_0101, true));
        let tx = PinMock::new(&transactions(&expected));

        let mut driver: RttyDriver<_, _, ()> =
            RttyDriver::new(tx, NoopDelay::new(), 300, StopBits::One, Checksum::None, true, None);
        driver.transmit_byte(0b101_0101);
        driver.tx.done();
    }

    #[test]
    fn test_transmit_appends_suffix_and_sends_every_byte() {
        let mut expected = vec![PinState::High];
        for &byte in b"TEST*8CCA\n" {
            expected.extend(byte_states(byte, false));
        }
        let tx = PinMock::new(&transactions(&expected));

        let mut driver: RttyDriver<_, _, ()> =
            RttyDriver::new(tx, NoopDelay::new(), 300, StopBits::Two, Checksum::Crc16, false, None);
        let mut msg = Vec::from(&b"TEST"[..]);
        driver.transmit(&mut msg).unwrap();
        assert_eq!(msg, b"TEST*8CCA\n");
        driver.tx.done();
    }

    #[test]
    fn test_transmit_without_checksum_appends_newline_only() {
        let mut expected = vec![PinState::High];
        for &byte in b"TEST\n" {
            expected.extend(byte_states(byte, false));
        }
        let tx = PinMock::new(&transactions(&expected));

        let mut driver: RttyDriver<_, _, ()> =
            RttyDriver::new(tx, NoopDelay::new(), 300, StopBits::One, Checksum::None, false, None);
        let mut msg = Vec::from(&b"TEST"[..]);
        driver.transmit(&mut msg).unwrap();
        assert_eq!(msg, b"TEST\n");
        driver.tx.done();
    }

    struct EchoBuf(Vec<u8>);

    impl EchoSink for EchoBuf {
        fn echo(&mut self, byte: u8) {
            self.0.push(byte);
        }
    }

    #[test]
    fn test_echo_sink_mirrors_transmitted_bytes() {
        let mut expected = vec![PinState::High];
        for &byte in b"HI\n" {
            expected.extend(byte_states(byte, false));
        }
        let tx = PinMock::new(&transactions(&expected));

        let mut driver = RttyDriver::new(
            tx,
            NoopDelay::new(),
            300,
            StopBits::One,
            Checksum::None,
            false,
            Some(EchoBuf(Vec::new())),
        );
        let mut msg = Vec::from(&b"HI"[..]);
        driver.transmit(&mut msg).unwrap();
        assert_eq!(driver.echo.as_ref().unwrap().0, b"HI\n");
        driver.tx.done();
    }

    #[test]
    fn test_baud_round_trip() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut driver: RttyDriver<_, _, ()> =
            RttyDriver::new(tx, NoopDelay::new(), 50, StopBits::One, Checksum::None, false, None);

        for baud in [45, 50, 75, 100, 150, 300] {
            driver.set_baud(baud);
            assert_eq!(driver.baud(), baud);
        }
        // 500000 / 1200 truncates to 416, which reads back as 1201. Above
        // the telemetry range, but shows the documented lossy round trip.
        driver.set_baud(1200);
        assert_eq!(driver.baud(), 1201);
        driver.tx.done();
    }

    #[test]
    fn test_checksum_setter() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut driver: RttyDriver<_, _, ()> =
            RttyDriver::new(tx, NoopDelay::new(), 50, StopBits::One, Checksum::Crc16, false, None);
        driver.set_checksum(Checksum::None);
        assert_eq!(driver.checksum(), Checksum::None);
        driver.tx.done();
    }
}
