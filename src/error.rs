//! Error types for the driver
//!
//! - [`Error`] - Runtime errors during display operations
//! - [`BuilderError`] - Errors while constructing configuration
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! Size and state validation errors are reported before the driver touches
//! the bus, so a rejected operation leaves the controllers unchanged.

use crate::display::DeviceState;
use crate::interface::DisplayInterface;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific hardware error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO/busy timeout)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`]
    /// implementation. A failure here is fatal to the in-progress operation;
    /// there is no acknowledgment channel, so no retry is attempted.
    Interface(I::Error),
    /// Frame buffer length does not match the panel geometry
    ///
    /// The buffer must be exactly `width * height / 8` bytes. Detected before
    /// any bus write; the device state is left unchanged.
    BufferSizeMismatch {
        /// Required buffer size in bytes
        expected: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Operation requires the device to be idle
    ///
    /// RAM writes and refreshes are rejected while the device is
    /// uninitialized or sleeping; run the reset sequence first.
    NotIdle {
        /// State the device was in when the operation was attempted
        state: DeviceState,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::BufferSizeMismatch { expected, provided } => {
                write!(
                    f,
                    "Buffer size mismatch: expected {expected} bytes, provided {provided}"
                )
            }
            Self::NotIdle { state } => {
                write!(f, "Device not idle: {state:?}")
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Panel geometry was not specified
    ///
    /// [`Builder::geometry()`](crate::config::Builder::geometry) must be
    /// called before building.
    MissingGeometry,
    /// Invalid panel geometry
    ///
    /// See [`Geometry::new()`](crate::config::Geometry::new) for constraints.
    InvalidGeometry {
        /// Panel width in pixels
        width: u16,
        /// Panel height in pixels
        height: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingGeometry => write!(f, "Panel geometry must be specified"),
            Self::InvalidGeometry { width, height } => write!(
                f,
                "Invalid geometry {width}x{height} (width must be a multiple of 8 and the split boundary must bisect the row)"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
