use crate::asynch::AsyncRttyDriver;
use crate::driver::EchoSink;
use crate::timer::bit_period_us;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Runs a blocking loop that repeatedly calls `tick()` on the provided
/// RTTY driver, once per bit period.
///
/// This is a simple timing loop for use in environments where a spare
/// timer interrupt is unavailable or undesired. It drives the engine's
/// timing with a delay provider implementing
/// `embedded_hal::delay::DelayNs`.
///
/// # Arguments
/// - `driver`: A mutable reference to an `AsyncRttyDriver` instance.
/// - `delay`: A delay provider, typically from the HAL.
/// - `baud`: The bit rate; each iteration waits `1_000_000 / baud`
///   microseconds (20000 at 50 baud).
///
/// # Notes
/// - This loop never returns; it is intended for single-purpose polling
///   firmware. Anything else should use interrupt-driven ticks.
/// - The loop body's own execution time is not compensated for, which is
///   tolerable at the low bit rates RTTY uses.
pub fn run_rtty_tick_loop<D: DelayNs, TX, E>(
    driver: &mut AsyncRttyDriver<TX, E>,
    delay: &mut D,
    baud: u32,
) where
    TX: OutputPin,
    E: EchoSink,
{
    let period_us = bit_period_us(baud);
    loop {
        driver.tick();
        delay.delay_us(period_us);
    }
}
