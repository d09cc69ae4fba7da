//! Color type for monochrome e-paper panels
//!
//! The panel is 1bpp: each byte of the frame buffer packs 8 horizontal
//! pixels, MSB first. A set bit renders white, a cleared bit black.
//!
//! ```
//! use ssd1683_dual::Color;
//!
//! assert_eq!(Color::White.fill_byte(), 0xFF);
//! assert_eq!(Color::Black.fill_byte(), 0x00);
//! ```

/// Pixel colors of a monochrome panel
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    /// Black pixels (bit cleared)
    Black,
    /// White pixels (bit set)
    White,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

impl Color {
    /// Byte value that fills 8 consecutive pixels with this color
    pub fn fill_byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }

    /// Whether the packed bit for this color is set
    pub fn bit(self) -> bool {
        match self {
            Self::Black => false,
            Self::White => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_bytes() {
        assert_eq!(Color::Black.fill_byte(), 0x00);
        assert_eq!(Color::White.fill_byte(), 0xFF);
    }

    #[test]
    fn test_bit_polarity_matches_fill_byte() {
        assert!(!Color::Black.bit());
        assert!(Color::White.bit());
    }
}
