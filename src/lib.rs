//! Dual-SSD1683 E-Paper Display Driver
//!
//! A driver for monochrome e-paper panels built from two cascaded SSD1683
//! controllers sharing one SPI bus, such as the Elecrow CrowPanel 5.79"
//! (792x272). The pair presents itself as a single logical display: the
//! driver splits each packed row across both chips' RAM spaces, including
//! the seam byte whose halves render on different chips.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Panel quirks described as data ([`Geometry`]), not driver subclasses
//! - Full, fast and partial refresh profiles
//! - Deep sleep with wake
//! - Rotation support
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use ssd1683_dual::{Builder, Display, Interface, UpdateMode, CROWPANEL_5IN79};
//!
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
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let pwr = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy, pwr);
//! let config = match Builder::new().geometry(CROWPANEL_5IN79).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.init(&mut delay);
//!
//! let frame = vec![0xFFu8; CROWPANEL_5IN79.buffer_size()];
//! let _ = display.show(&frame, UpdateMode::Full, &mut delay);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Color type for monochrome e-paper panels
pub mod color;
/// SSD1683 command definitions
pub mod command;
/// Panel geometry and driver configuration
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Coordinate rotation utilities
pub mod rotation;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use color::Color;
pub use config::{Builder, CROWPANEL_5IN79, Config, Geometry, RamWindow, Rotation};
pub use display::{DeepSleepMode, DeviceState, Display, UpdateMode};
pub use error::{BuilderError, Error};
pub use interface::{
    BUSY_POLL_INTERVAL_MS, DEFAULT_BUSY_TIMEOUT_MS, DisplayInterface, Interface, InterfaceError,
};

#[cfg(feature = "graphics")]
pub use graphics::GraphicDisplay;
