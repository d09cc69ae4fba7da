//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`]
//! struct for talking to the cascaded SSD1683 pair over SPI.
//!
//! ## Hardware Requirements
//!
//! Both controllers share one bus, so a single interface drives the pair:
//! - SPI bus (MOSI + SCK, 4 MHz in the reference design, mode 0, MSB first)
//! - 4 GPIO pins:
//!   - **DC**: Data/Command select (output, low = command)
//!   - **RST**: Reset (output, active low, shared by both chips)
//!   - **BUSY**: Busy status (input, active high)
//!   - **PWR**: Panel power enable (output, active high)
//!
//! Chip select is owned by the [`SpiDevice`] implementation and asserted
//! for the duration of each transfer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use ssd1683_dual::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//!
//! // Software reset, then wait for the controllers to settle
//! let _ = interface.send_command(command::SW_RESET);
//! let _ = interface.busy_wait(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the hardware interface to the controller pair
///
/// Abstracts over SPI + GPIO implementations so that
/// [`Display`](crate::display::Display) works with anything satisfying the
/// embedded-hal traits. Use the provided [`Interface`] unless you need
/// custom pin handling.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte (DC low)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes (DC high)
    ///
    /// Covers both the single argument byte of a command and streamed RAM
    /// data; the framing is identical.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Drive the panel power enable line
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO write fails.
    fn set_panel_power(&mut self, on: bool) -> InterfaceResult<(), Self::Error>;

    /// Pulse the shared hardware reset line
    ///
    /// The implementation must hold RST low for at least 10 ms and allow
    /// at least 10 ms settle time on either side of the pulse.
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Wait for the busy line to clear
    ///
    /// BUSY is active high; it stays asserted while either chip executes an
    /// internal operation (reset, activate, sleep entry).
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::Timeout`] if BUSY does not clear within the
    /// implementation's timeout.
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for busy pin
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Default timeout for busy-wait in milliseconds
///
/// A full refresh takes on the order of seconds; 30 s covers the slowest
/// profile with a wide margin.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Interval between busy-line polls in milliseconds
pub const BUSY_POLL_INTERVAL_MS: u32 = 10;

/// Hardware interface implementation for the cascaded SSD1683 pair
///
/// Implements [`DisplayInterface`] over embedded-hal v1.0 SPI and GPIO.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`] (owns chip select)
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
/// * `PWR` - Panel power enable pin implementing [`OutputPin`]
pub struct Interface<SPI, DC, RST, BUSY, PWR> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin (active high)
    busy: BUSY,
    /// Panel power enable pin (active high)
    pwr: PWR,
    /// Timeout for busy-wait in milliseconds
    busy_timeout_ms: u32,
}

impl<SPI, DC, RST, BUSY, PWR> Interface<SPI, DC, RST, BUSY, PWR>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    PWR: OutputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, active high)
    /// * `pwr` - Panel power enable pin (output, active high)
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, pwr: PWR) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            pwr,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// Default is 30,000ms (30 seconds). Set to 0 to disable the timeout and
    /// reproduce the reference driver's unbounded wait.
    pub fn set_busy_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Get the current busy-wait timeout in milliseconds
    pub fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }
}

impl<SPI, DC, RST, BUSY, PWR, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY, PWR>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PWR: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)?;
        Ok(())
    }

    fn set_panel_power(&mut self, on: bool) -> InterfaceResult<(), Self::Error> {
        if on {
            self.pwr.set_high().map_err(InterfaceError::Pin)
        } else {
            self.pwr.set_low().map_err(InterfaceError::Pin)
        }
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        // Settle -> LOW -> 10ms -> HIGH -> settle
        delay.delay_ms(10);
        let _ = self.rst.set_low();
        delay.delay_ms(10);
        let _ = self.rst.set_high();
        delay.delay_ms(10);
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let mut elapsed_ms = 0u32;
        let timeout_ms = self.busy_timeout_ms;

        loop {
            let is_busy = match self.busy.is_high() {
                Ok(value) => value,
                Err(e) => return Err(InterfaceError::Pin(e)),
            };

            if !is_busy {
                return Ok(());
            }

            delay.delay_ms(BUSY_POLL_INTERVAL_MS);
            elapsed_ms = elapsed_ms.saturating_add(BUSY_POLL_INTERVAL_MS);
            if timeout_ms > 0 && elapsed_ms >= timeout_ms {
                return Err(InterfaceError::Timeout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MockSpi;
    #[derive(Debug)]
    struct MockPin {
        busy: bool,
    }
    #[derive(Debug, Clone, Copy)]
    struct MockError;

    impl core::fmt::Display for MockError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "mock error")
        }
    }

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(
            &mut self,
            _operations: &mut [embedded_hal::spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.busy)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.busy)
        }
    }

    struct MockDelay;
    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn idle_pin() -> MockPin {
        MockPin { busy: false }
    }

    fn stuck_pin() -> MockPin {
        MockPin { busy: true }
    }

    #[test]
    fn test_default_busy_timeout() {
        assert_eq!(DEFAULT_BUSY_TIMEOUT_MS, 30_000);
        assert_eq!(BUSY_POLL_INTERVAL_MS, 10);
    }

    #[test]
    fn test_set_busy_timeout() {
        let mut interface = Interface::new(MockSpi, idle_pin(), idle_pin(), idle_pin(), idle_pin());
        assert_eq!(interface.busy_timeout(), DEFAULT_BUSY_TIMEOUT_MS);

        interface.set_busy_timeout(5_000);
        assert_eq!(interface.busy_timeout(), 5_000);

        interface.set_busy_timeout(0);
        assert_eq!(interface.busy_timeout(), 0);
    }

    #[test]
    fn test_busy_wait_returns_when_idle() {
        let mut interface = Interface::new(MockSpi, idle_pin(), idle_pin(), idle_pin(), idle_pin());
        let mut delay = MockDelay;
        assert!(interface.busy_wait(&mut delay).is_ok());
    }

    #[test]
    fn test_busy_wait_times_out_on_stuck_busy_line() {
        let mut interface =
            Interface::new(MockSpi, idle_pin(), idle_pin(), stuck_pin(), idle_pin());
        interface.set_busy_timeout(100);
        let mut delay = MockDelay;
        assert!(matches!(
            interface.busy_wait(&mut delay),
            Err(InterfaceError::Timeout)
        ));
    }
}
