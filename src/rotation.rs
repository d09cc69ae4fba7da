//! Coordinate rotation utilities
//!
//! Maps logical (x, y) coordinates to a location in the packed 1bpp frame
//! buffer. Each byte holds 8 horizontal pixels of the native orientation,
//! MSB first; under rotation the byte index and bit position are derived
//! from the transposed coordinates.
//!
//! ```
//! use ssd1683_dual::{rotation::buffer_location, Rotation};
//!
//! // Native orientation: pixel (0,0) is byte 0, MSB
//! let (index, bit) = buffer_location(0, 0, 8, 1, Rotation::Rotate0);
//! assert_eq!(index, 0);
//! assert_eq!(bit, 0x80);
//! ```

use crate::config::Rotation;

/// Buffer byte index and bit mask for a logical pixel
///
/// `width` and `height` are the physical (unrotated) panel dimensions;
/// `width` must be a multiple of 8. For [`Rotation::Rotate90`] and
/// [`Rotation::Rotate270`] the caller's logical coordinate space is
/// `height` wide and `width` tall.
pub fn buffer_location(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rotation: Rotation,
) -> (usize, u8) {
    let stride = width / 8;
    match rotation {
        Rotation::Rotate0 => {
            let index = (x / 8 + stride * y) as usize;
            let bit = 0x80 >> (x % 8);
            (index, bit)
        }
        Rotation::Rotate90 => {
            let index = ((width - 1 - y) / 8 + stride * x) as usize;
            let bit = 0x01 << (y % 8);
            (index, bit)
        }
        Rotation::Rotate180 => {
            let index = ((stride * height - 1) - (x / 8 + stride * y)) as usize;
            let bit = 0x01 << (x % 8);
            (index, bit)
        }
        Rotation::Rotate270 => {
            let index = (y / 8 + (height - 1 - x) * stride) as usize;
            let bit = 0x80 >> (y % 8);
            (index, bit)
        }
    }
}
