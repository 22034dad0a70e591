/// Declares a static global `RTTY_DRIVER` instance protected by a
/// `critical_section` mutex.
///
/// This macro creates a `static` singleton `RTTY_DRIVER` suitable for use
/// in interrupt-based environments, where both the main thread and an ISR
/// need to safely access the shared transmitter state.
///
/// # Arguments
/// - `$tx`: The concrete type of the TX pin (must implement `OutputPin`)
/// - `$echo`: The concrete type of the echo sink (use `()` for none)
///
/// # Example
/// ```rust,ignore
/// init_rtty_driver!(MyTxPinType, ());
/// ```
#[macro_export]
macro_rules! init_rtty_driver {
    ( $tx:ty, $echo:ty ) => {
        pub static RTTY_DRIVER: $crate::critical_section::Mutex<
            core::cell::RefCell<Option<$crate::asynch::AsyncRttyDriver<$tx, $echo>>>,
        > = $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Initializes the global `RTTY_DRIVER` singleton with a new driver
/// instance.
///
/// This macro wraps construction of the `AsyncRttyDriver` and stores it
/// inside the globally declared `RTTY_DRIVER` created by
/// `init_rtty_driver!`.
///
/// # Arguments
/// - `$tx`: The TX pin value (must implement `OutputPin`)
/// - `$stop_bits`: A `StopBits` value
/// - `$checksum`: A `Checksum` value
/// - `$reverse`: Whether keying polarity is reversed
/// - `$echo`: `Option` holding the echo sink
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_rtty_driver!(tx, StopBits::Two, Checksum::Crc16, false, None);
/// }
/// ```
///
/// # Notes
/// - Must be called inside a critical section-aware context (safe in
///   `main()`).
/// - Requires `init_rtty_driver!` to have been used earlier.
#[macro_export]
macro_rules! setup_rtty_driver {
    ( $tx:expr, $stop_bits:expr, $checksum:expr, $reverse:expr, $echo:expr ) => {
        $crate::critical_section::with(|cs| {
            RTTY_DRIVER
                .borrow(cs)
                .replace(Some($crate::asynch::AsyncRttyDriver::new(
                    $tx, $stop_bits, $checksum, $reverse, $echo,
                )));
        });
    };
}

/// Calls `tick()` on the global `RTTY_DRIVER` if it has been initialized.
///
/// This macro is intended to be invoked from a timer ISR firing once per
/// bit period (20 ms at 50 baud) to advance the transmission state machine.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     tick_rtty_timer!();
/// }
/// ```
///
/// # Notes
/// - This macro assumes `RTTY_DRIVER` was declared with
///   `init_rtty_driver!` and initialized via `setup_rtty_driver!`.
/// - Safe to call repeatedly; silently does nothing if the driver hasn't
///   been set up yet.
#[macro_export]
macro_rules! tick_rtty_timer {
    () => {
        $crate::critical_section::with(|cs| {
            if let Some(driver) = RTTY_DRIVER.borrow(cs).borrow_mut().as_mut() {
                driver.tick();
            }
        });
    };
}
