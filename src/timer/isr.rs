use crate::asynch::AsyncRttyDriver;
use crate::driver::EchoSink;
use crate::frame::Error;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Used to initialize the global static `AsyncRttyDriver` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use rtty::asynch::AsyncRttyDriver;
/// use rtty::timer::global_rtty_driver_init;
///
/// static RTTY_DRIVER: Mutex<RefCell<Option<AsyncRttyDriver<PD1, ()>>>> =
///     global_rtty_driver_init::<PD1, ()>();
/// ```
pub const fn global_rtty_driver_init<TX: OutputPin, E: EchoSink>()
-> Mutex<RefCell<Option<AsyncRttyDriver<TX, E>>>> {
    Mutex::new(RefCell::new(None))
}

/// Stores a freshly constructed driver in the global singleton.
///
/// # Arguments
/// * The global static `AsyncRttyDriver`
/// * The tx pin
/// * The stop-bit count
/// * The checksum mode
/// * Whether keying polarity is reversed
/// * The optional echo sink
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_rtty_driver_setup(&RTTY_DRIVER, tx, StopBits::Two, Checksum::Crc16, false, None);
/// }
/// ```
pub fn global_rtty_driver_setup<TX: OutputPin, E: EchoSink>(
    global_driver: &'static Mutex<RefCell<Option<AsyncRttyDriver<TX, E>>>>,
    tx: TX,
    stop_bits: crate::frame::StopBits,
    checksum: crate::frame::Checksum,
    reverse: bool,
    echo: Option<E>,
) {
    critical_section::with(|cs| {
        let _ = global_driver.borrow(cs).replace(Some(AsyncRttyDriver::new(
            tx, stop_bits, checksum, reverse, echo,
        )));
    });
}

/// Runs the tick at each interrupt.
///
/// The configured timer must fire once per bit period
/// (see [`compute_ocr_value`](crate::timer::compute_ocr_value)).
///
/// # Arguments
/// * The global static `AsyncRttyDriver`
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     global_rtty_timer_tick(&RTTY_DRIVER);
/// }
/// ```
pub fn global_rtty_timer_tick<TX: OutputPin, E: EchoSink>(
    global_driver: &'static Mutex<RefCell<Option<AsyncRttyDriver<TX, E>>>>,
) {
    critical_section::with(|cs| {
        if let Some(driver) = global_driver.borrow(cs).borrow_mut().as_mut() {
            driver.tick();
        }
    });
}

/// Enqueues a message on the global singleton from the application context.
///
/// Appends the checksum suffix and newline to `msg` in place, exactly as
/// [`transmit_async`](AsyncRttyDriver::transmit_async) does. A no-op when
/// the driver has not been set up yet.
#[cfg(not(feature = "std"))]
pub fn global_rtty_transmit<TX: OutputPin, E: EchoSink, const N: usize>(
    global_driver: &'static Mutex<RefCell<Option<AsyncRttyDriver<TX, E>>>>,
    msg: &mut Vec<u8, N>,
) -> Result<(), Error> {
    critical_section::with(|cs| {
        if let Some(driver) = global_driver.borrow(cs).borrow_mut().as_mut() {
            driver.transmit_async(msg)
        } else {
            Ok(())
        }
    })
}

/// Enqueues a message on the global singleton from the application context.
///
/// Appends the checksum suffix and newline to `msg` in place, exactly as
/// [`transmit_async`](AsyncRttyDriver::transmit_async) does. A no-op when
/// the driver has not been set up yet.
#[cfg(feature = "std")]
pub fn global_rtty_transmit<TX: OutputPin, E: EchoSink>(
    global_driver: &'static Mutex<RefCell<Option<AsyncRttyDriver<TX, E>>>>,
    msg: &mut Vec<u8>,
) -> Result<(), Error> {
    critical_section::with(|cs| {
        if let Some(driver) = global_driver.borrow(cs).borrow_mut().as_mut() {
            driver.transmit_async(msg)
        } else {
            Ok(())
        }
    })
}
