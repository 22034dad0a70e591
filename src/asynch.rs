//! Interrupt-driven RTTY transmission engine.
//!
//! This module provides [`AsyncRttyDriver`], the non-blocking counterpart
//! to [`crate::driver::RttyDriver`]. Messages are enqueued into a bounded
//! pending-byte queue by the application context and clocked out one bit
//! per [`tick()`](AsyncRttyDriver::tick), where the tick source is a
//! periodic timer interrupt running at the bit rate (see [`crate::timer`]).
//!
//! ## State machine
//!
//! A three-phase machine tracks exactly one in-flight byte:
//!
//! - **Start**: if a byte is pending, pop it, drive the start-bit level and
//!   move to Sending. Otherwise the tick is a no-op and the line holds its
//!   previous level (the idle condition).
//! - **Sending**: drive one data-bit level per tick, LSB first. After the
//!   seventh bit, echo the byte, drive the stop-bit level and move to Stop.
//! - **Stop**: with [`StopBits::Two`] drive the stop level for one more
//!   full tick; always return to Start.
//!
//! With one stop bit the Stop phase is skipped entirely, so a byte occupies
//! exactly `1 + 7 + stopbits` ticks. The tick quantum is a whole bit
//! period, so [`StopBits::OneAndHalf`] cannot be honoured exactly on this
//! path: it rounds up to two stop-bit periods (the line simply stays at the
//! stop level through the Stop phase). The blocking transmitter scales its
//! delay by the exact fractional count.
//!
//! ## Concurrency
//!
//! Two contexts touch the engine: the application (enqueue, configuration)
//! and the timer ISR (tick). The enqueue loop runs inside
//! `critical_section::with`, so a tick can never observe the queue
//! mid-mutation; the ISR-side singleton helpers in [`crate::timer`] take
//! the whole driver through a `critical_section::Mutex` as well. The tick
//! handler performs no blocking waits and is the only writer of the phase
//! state.
//!
//! There is no cancellation: once queued, bytes will be transmitted. Drain
//! by polling [`buffer_size()`](AsyncRttyDriver::buffer_size) or
//! [`wait_drained()`](AsyncRttyDriver::wait_drained).

use crate::consts::{ASCII_BITS, TX_QUEUE_LEN};
use crate::driver::EchoSink;
use crate::frame::{Checksum, Error, FrameEncoder, StopBits, augment_message};
use core::convert::Infallible;
use embedded_hal::digital::OutputPin;
use heapless::spsc::Queue;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Progress of the one in-flight byte through its frame.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Phase {
    /// Idle, or about to fetch the next pending byte.
    #[default]
    Start,
    /// Emitting data bits of the current byte.
    Sending,
    /// Emitting the optional second stop bit.
    Stop,
}

/// An interrupt-driven software RTTY modulator.
///
/// Owns the pending-byte queue (255 bytes, allocation free) and the
/// transmission phase state. Unlike the blocking driver it holds no delay
/// source: timing comes entirely from the external tick source, which must
/// invoke [`tick()`](Self::tick) once per bit period.
///
/// ## Type Parameters
///
/// - `TX`: the output pin keying the radio, implementing [`OutputPin`]
/// - `E`: the optional echo sink; use `()` when echo is not wanted
pub struct AsyncRttyDriver<TX, E>
where
    TX: OutputPin,
    E: EchoSink,
{
    /// TX pin keying the radio.
    pub tx: TX,
    frame: FrameEncoder,
    stop_bits: StopBits,
    checksum: Checksum,
    /// Optional sink receiving a copy of each transmitted byte.
    pub echo: Option<E>,
    queue: Queue<u8, TX_QUEUE_LEN>,
    phase: Phase,
    current_byte: u8,
    current_bit: u8,
    /// Counter of bytes fully clocked out.
    pub tx_good: u16,
}

impl<TX, E> core::fmt::Debug for AsyncRttyDriver<TX, E>
where
    TX: OutputPin,
    E: EchoSink,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AsyncRttyDriver")
            .field("phase", &self.phase)
            .field("pending", &self.queue.len())
            .field("current_byte", &self.current_byte)
            .field("current_bit", &self.current_bit)
            .field("tx_good", &self.tx_good)
            .finish_non_exhaustive()
    }
}

impl<TX, E> AsyncRttyDriver<TX, E>
where
    TX: OutputPin,
    E: EchoSink,
{
    /// Creates a new asynchronous transmitter and idles the line at the
    /// stop-bit (mark) level.
    ///
    /// # Arguments
    /// - `tx`: the output pin keying the radio.
    /// - `stop_bits`: stop-bit count held after each byte's data bits.
    /// - `checksum`: suffix mode applied by
    ///   [`transmit_async()`](Self::transmit_async).
    /// - `reverse`: invert the keying polarity.
    /// - `echo`: optional sink receiving a copy of each transmitted byte.
    pub fn new(
        tx: TX,
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
            frame,
            stop_bits,
            checksum,
            echo,
            queue: Queue::new(),
            phase: Phase::Start,
            current_byte: 0,
            current_bit: 0,
            tx_good: 0,
        }
    }

    /// Appends the checksum suffix and newline to `msg` **in place**, then
    /// enqueues every byte for background transmission.
    ///
    /// Non-blocking with respect to transmission: this returns as soon as
    /// the bytes are queued, and subsequent ticks drain them. The enqueue
    /// loop runs inside a critical section so a concurrent tick can never
    /// observe the queue mid-mutation.
    ///
    /// Bytes that do not fit in the 255-slot queue are **silently
    /// dropped**; the queue size is unchanged by the overflowing pushes.
    /// Callers wanting certainty should check
    /// [`buffer_size()`](Self::buffer_size) for headroom first.
    #[cfg(not(feature = "std"))]
    pub fn transmit_async<const N: usize>(&mut self, msg: &mut Vec<u8, N>) -> Result<(), Error> {
        augment_message(msg, self.checksum)?;
        critical_section::with(|_cs| {
            for &byte in msg.iter() {
                // Queue full: byte dropped, size unchanged.
                let _ = self.queue.enqueue(byte);
            }
        });
        Ok(())
    }

    /// Appends the checksum suffix and newline to `msg` **in place**, then
    /// enqueues every byte for background transmission.
    ///
    /// Non-blocking with respect to transmission: this returns as soon as
    /// the bytes are queued, and subsequent ticks drain them. The enqueue
    /// loop runs inside a critical section so a concurrent tick can never
    /// observe the queue mid-mutation.
    ///
    /// Bytes that do not fit in the 255-slot queue are **silently
    /// dropped**; the queue size is unchanged by the overflowing pushes.
    #[cfg(feature = "std")]
    pub fn transmit_async(&mut self, msg: &mut Vec<u8>) -> Result<(), Error> {
        augment_message(msg, self.checksum)?;
        critical_section::with(|_cs| {
            for &byte in msg.iter() {
                // Queue full: byte dropped, size unchanged.
                let _ = self.queue.enqueue(byte);
            }
        });
        Ok(())
    }

    /// Advances the transmission state machine by one bit period.
    ///
    /// Call exactly once per bit period from the periodic tick source.
    /// Each call emits at most one line-level write and never blocks, so
    /// ticks are strictly serialized by the interrupt mechanism. An idle
    /// tick (empty queue) is a no-op and the line holds its level.
    pub fn tick(&mut self) {
        match self.phase {
            Phase::Start => {
                // Grab a byte and go transmit it.
                if let Some(byte) = self.queue.dequeue() {
                    self.current_byte = byte;
                    self.current_bit = 0;
                    let _ = self.tx.set_state(self.frame.start_bit());
                    self.phase = Phase::Sending;
                }
            }
            Phase::Sending => {
                if self.current_bit < ASCII_BITS {
                    let _ = self
                        .tx
                        .set_state(self.frame.data_bit(self.current_byte, self.current_bit));
                    self.current_bit += 1;
                } else {
                    if let Some(echo) = self.echo.as_mut() {
                        echo.echo(self.current_byte);
                    }
                    let _ = self.tx.set_state(self.frame.stop_bit());
                    if self.stop_bits == StopBits::One {
                        self.tx_good = self.tx_good.wrapping_add(1);
                        self.phase = Phase::Start;
                    } else {
                        self.phase = Phase::Stop;
                    }
                }
            }
            Phase::Stop => {
                // Second whole stop-bit period. OneAndHalf lands here too:
                // the tick quantum is a full bit, so it rounds up to two.
                if self.stop_bits == StopBits::Two {
                    let _ = self.tx.set_state(self.frame.stop_bit());
                }
                self.tx_good = self.tx_good.wrapping_add(1);
                self.phase = Phase::Start;
            }
        }
    }

    /// Returns the number of bytes currently awaiting transmission.
    ///
    /// Advisory: a tick may run between this read and any use of the
    /// value.
    pub fn buffer_size(&self) -> usize {
        self.queue.len()
    }

    /// Returns `Ok` once the queue is empty and the in-flight byte has
    /// finished its frame; [`nb::Error::WouldBlock`] otherwise.
    ///
    /// There is no flush or abort: this is the only way to wait out a
    /// transmission.
    pub fn wait_drained(&self) -> nb::Result<(), Infallible> {
        if self.phase != Phase::Start || !self.queue.is_empty() {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Sets the checksum mode applied to subsequent messages.
    pub fn set_checksum(&mut self, checksum: Checksum) {
        self.checksum = checksum;
    }

    /// Returns the current checksum mode.
    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// Sets the stop-bit count; takes effect from the next byte's frame.
    pub fn set_stop_bits(&mut self, stop_bits: StopBits) {
        self.stop_bits = stop_bits;
    }

    /// Returns the current stop-bit count.
    pub fn stop_bits(&self) -> StopBits {
        self.stop_bits
    }

    /// Sets the keying polarity; takes effect on the next bit emitted.
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
    use crate::consts::TX_QUEUE_CAPACITY;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    // Expected pin writes for one framed byte, built independently of the
    // FrameEncoder: start low, 7 data bits LSB first, one stop write (the
    // Stop phase with two stop bits repeats the final level).
    fn byte_states(byte: u8, reverse: bool, stop_writes: usize) -> Vec<PinState> {
        let level = |high: bool| match high ^ reverse {
            true => PinState::High,
            false => PinState::Low,
        };
        let mut states = vec![level(false)];
        for bit in 0..7 {
            states.push(level(byte & (1 << bit) != 0));
        }
        for _ in 0..stop_writes {
            states.push(level(true));
        }
        states
    }

    fn mock_for(message: &[u8], reverse: bool, stop_writes: usize) -> PinMock {
        let mut expected = vec![PinTransaction::set(if reverse {
            PinState::Low
        } else {
            PinState::High
        })];
        for &byte in message {
            for state in byte_states(byte, reverse, stop_writes) {
                expected.push(PinTransaction::set(state));
            }
        }
        PinMock::new(&expected)
    }

    #[test]
    fn test_idle_ticks_are_noops() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut driver: AsyncRttyDriver<_, ()> =
            AsyncRttyDriver::new(tx, StopBits::One, Checksum::None, false, None);

        for _ in 0..10 {
            driver.tick();
        }
        assert_eq!(driver.buffer_size(), 0);
        assert!(driver.wait_drained().is_ok());
        driver.tx.done();
    }

    #[test]
    fn test_drains_in_exact_tick_budget_one_stop_bit() {
        // "OK" + newline = 3 bytes; 1 + 7 + 1 = 9 ticks each.
        let tx = mock_for(b"OK\n", false, 1);
        let mut driver: AsyncRttyDriver<_, ()> =
            AsyncRttyDriver::new(tx, StopBits::One, Checksum::None, false, None);

        let mut msg = Vec::from(&b"OK"[..]);
        driver.transmit_async(&mut msg).unwrap();
        assert_eq!(msg, b"OK\n");
        assert_eq!(driver.buffer_size(), 3);
        assert!(driver.wait_drained().is_err());

        for _ in 0..(3 * 9) {
            driver.tick();
        }
        assert_eq!(driver.buffer_size(), 0);
        assert!(driver.wait_drained().is_ok());
        assert_eq!(driver.tx_good, 3);

        // Further ticks stay silent.
        driver.tick();
        driver.tick();
        driver.tx.done();
    }

    #[test]
    fn test_two_stop_bits_take_an_extra_tick() {
        // "A" + newline = 2 bytes; 1 + 7 + 2 = 10 ticks each, and the
        // second stop period rewrites the stop level.
        let tx = mock_for(b"A\n", false, 2);
        let mut driver: AsyncRttyDriver<_, ()> =
            AsyncRttyDriver::new(tx, StopBits::Two, Checksum::None, false, None);

        let mut msg = Vec::from(&b"A"[..]);
        driver.transmit_async(&mut msg).unwrap();

        for _ in 0..19 {
            driver.tick();
        }
        assert!(driver.wait_drained().is_err());
        driver.tick();
        assert!(driver.wait_drained().is_ok());
        driver.tx.done();
    }

    #[test]
    fn test_one_and_half_stop_bits_round_up_to_two_ticks() {
        // The stop phase is a whole-tick quantum: 1.5 stop bits hold the
        // line for two periods but write the level only once.
        let tx = mock_for(b"A\n", false, 1);
        let mut driver: AsyncRttyDriver<_, ()> =
            AsyncRttyDriver::new(tx, StopBits::OneAndHalf, Checksum::None, false, None);

        let mut msg = Vec::from(&b"A"[..]);
        driver.transmit_async(&mut msg).unwrap();

        for _ in 0..19 {
            driver.tick();
        }
        assert!(driver.wait_drained().is_err());
        driver.tick();
        assert!(driver.wait_drained().is_ok());
        driver.tx.done();
    }

    #[test]
    fn test_checksum_suffix_is_queued() {
        let tx = mock_for(b"TEST*8CCA\n", false, 1);
        let mut driver: AsyncRttyDriver<_, ()> =
            AsyncRttyDriver::new(tx, StopBits::One, Checksum::Crc16, false, None);

        let mut msg = Vec::from(&b"TEST"[..]);
        driver.transmit_async(&mut msg).unwrap();
        assert_eq!(driver.buffer_size(), 10);

        for _ in 0..(10 * 9) {
            driver.tick();
        }
        assert!(driver.wait_drained().is_ok());
        driver.tx.done();
    }

    #[test]
    fn test_reverse_polarity_complements_trace() {
        let tx = mock_for(b"U\n", true, 1);
        let mut driver: AsyncRttyDriver<_, ()> =
            AsyncRttyDriver::new(tx, StopBits::One, Checksum::None, true, None);

        let mut msg = Vec::from(&b"U"[..]);
        driver.transmit_async(&mut msg).unwrap();
        for _ in 0..(2 * 9) {
            driver.tick();
        }
        driver.tx.done();
    }

    #[test]
    fn test_queue_bound_drops_overflow_silently() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut driver: AsyncRttyDriver<_, ()> =
            AsyncRttyDriver::new(tx, StopBits::One, Checksum::None, false, None);

        // 300 bytes + newline exceed the 255-slot queue.
        let mut msg = vec![b'A'; 300];
        driver.transmit_async(&mut msg).unwrap();
        assert_eq!(driver.buffer_size(), TX_QUEUE_CAPACITY);

        // Pushing more while full changes nothing.
        let mut more = Vec::from(&b"B"[..]);
        driver.transmit_async(&mut more).unwrap();
        assert_eq!(driver.buffer_size(), TX_QUEUE_CAPACITY);
        driver.tx.done();
    }

    #[test]
    fn test_echo_sink_sees_completed_bytes() {
        struct EchoBuf(Vec<u8>);
        impl EchoSink for EchoBuf {
            fn echo(&mut self, byte: u8) {
                self.0.push(byte);
            }
        }

        let tx = mock_for(b"HI\n", false, 1);
        let mut driver = AsyncRttyDriver::new(
            tx,
            StopBits::One,
            Checksum::None,
            false,
            Some(EchoBuf(Vec::new())),
        );

        let mut msg = Vec::from(&b"HI"[..]);
        driver.transmit_async(&mut msg).unwrap();
        for _ in 0..(3 * 9) {
            driver.tick();
        }
        assert_eq!(driver.echo.as_ref().unwrap().0, b"HI\n");
        driver.tx.done();
    }
}
