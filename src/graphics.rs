//! Graphics support via embedded-graphics
//!
//! [`GraphicDisplay`] wraps [`Display`] together with the packed 1bpp frame
//! buffer and implements
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget), so the
//! whole embedded-graphics primitive/text/image ecosystem draws straight
//! into panel RAM format. One [`show`](GraphicDisplay::show) call then
//! pushes the buffer and refreshes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_10X20, MonoTextStyle},
//!     prelude::*,
//!     primitives::{PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use ssd1683_dual::{Color, GraphicDisplay, UpdateMode};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # use ssd1683_dual::{Builder, Display, Interface, CROWPANEL_5IN79};
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
//! # fn main() { let _ = run(); }
//! # type MockError = ssd1683_dual::Error<Interface<MockSpi, MockPin, MockPin, MockPin, MockPin>>;
//! # fn run() -> Result<(), MockError> {
//! # let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//! # let config = match Builder::new().geometry(CROWPANEL_5IN79).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return Ok(()),
//! # };
//! # let driver = Display::new(interface, config);
//! # let buffer = vec![0xFFu8; CROWPANEL_5IN79.buffer_size()];
//! # let mut delay = MockDelay;
//! let mut display = GraphicDisplay::new(driver, buffer);
//! display.init(&mut delay)?;
//!
//! display.clear(Color::White);
//!
//! let _ = Rectangle::new(Point::new(16, 16), Size::new(120, 60))
//!     .into_styled(PrimitiveStyle::with_fill(Color::Black))
//!     .draw(&mut display);
//!
//! let _ = Text::new(
//!     "Hello!",
//!     Point::new(24, 120),
//!     MonoTextStyle::new(&FONT_10X20, Color::Black),
//! )
//! .draw(&mut display);
//!
//! display.show(UpdateMode::Full, &mut delay)?;
//! # Ok(())
//! # }
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};
use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::config::Rotation;
use crate::display::{DeepSleepMode, Display, UpdateMode};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::rotation::buffer_location;

type GraphicsResult<I> = core::result::Result<(), Error<I>>;
type GraphicsNewResult<I, T> = core::result::Result<T, Error<I>>;

/// Display with an in-memory frame buffer
///
/// Owns the packed 1bpp buffer alongside the driver. Drawing operations
/// mutate the buffer only; [`show`](Self::show) pushes it to both
/// controllers and refreshes the panel.
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B` - Buffer type implementing `AsRef<[u8]> + AsMut<[u8]>`, exactly
///   `geometry.buffer_size()` bytes (a `Vec<u8>` or a static array)
pub struct GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// The underlying display driver
    display: Display<I>,
    /// Packed 1bpp frame buffer, rows MSB-first
    buffer: B,
}

impl<I, B> GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a new GraphicDisplay
    ///
    /// # Panics
    ///
    /// Panics unless the buffer is exactly `geometry.buffer_size()` bytes.
    /// The size is derived from the physical (unrotated) geometry.
    pub fn new(display: Display<I>, buffer: B) -> Self {
        let expected = display.geometry().buffer_size();
        assert!(
            buffer.as_ref().len() == expected,
            "frame buffer size mismatch: expected {} bytes, got {}",
            expected,
            buffer.as_ref().len()
        );
        Self { display, buffer }
    }

    /// Fallible version of [`new`](Self::new)
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] unless the buffer is exactly
    /// `geometry.buffer_size()` bytes.
    pub fn try_new(display: Display<I>, buffer: B) -> GraphicsNewResult<I, Self> {
        let expected = display.geometry().buffer_size();
        if buffer.as_ref().len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                provided: buffer.as_ref().len(),
            });
        }
        Ok(Self { display, buffer })
    }

    /// Run the boot sequence on the underlying driver
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        self.display.init(delay)
    }

    /// Fill the buffer with a color
    ///
    /// Buffer-only; the panel is unchanged until [`show`](Self::show).
    pub fn clear(&mut self, color: Color) {
        self.clear_to_pattern(color.fill_byte());
    }

    /// Fill the buffer with a raw byte pattern
    ///
    /// Each byte covers 8 horizontal pixels of the native orientation,
    /// MSB first (0xAA is alternating columns).
    pub fn clear_to_pattern(&mut self, pattern: u8) {
        for byte in self.buffer.as_mut().iter_mut() {
            *byte = pattern;
        }
    }

    /// Copy a packed 1bpp bitmap into the buffer at (x, y)
    ///
    /// `bitmap` rows are `width.div_ceil(8)` bytes, MSB first; set bits
    /// render white. Pixels falling outside the logical (rotated)
    /// dimensions are clipped.
    pub fn blit(&mut self, bitmap: &[u8], width: u32, height: u32, x: i32, y: i32) {
        let stride = width.div_ceil(8) as usize;
        for sy in 0..height {
            for sx in 0..width {
                let byte = match bitmap.get(sy as usize * stride + (sx / 8) as usize) {
                    Some(byte) => *byte,
                    None => return,
                };
                let color = if byte & (0x80 >> (sx % 8)) != 0 {
                    Color::White
                } else {
                    Color::Black
                };

                let px = x + sx as i32;
                let py = y + sy as i32;
                if px >= 0 && py >= 0 {
                    self.set_pixel(px as u32, py as u32, color);
                }
            }
        }
    }

    /// Push the buffer to both controllers and refresh the panel
    pub fn show<D: DelayNs>(&mut self, mode: UpdateMode, delay: &mut D) -> GraphicsResult<I> {
        self.display.show(self.buffer.as_ref(), mode, delay)
    }

    /// Put the panel into deep sleep
    pub fn sleep<D: DelayNs>(&mut self, mode: DeepSleepMode, delay: &mut D) -> GraphicsResult<I> {
        self.display.deep_sleep(mode, delay)
    }

    /// Wake the panel from deep sleep
    pub fn wake<D: DelayNs>(&mut self, delay: &mut D) -> GraphicsResult<I> {
        self.display.wake(delay)
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Access the underlying Display mutably
    ///
    /// For low-level operations such as
    /// [`clear_ram`](Display::clear_ram) or a raw
    /// [`refresh`](Display::refresh).
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// The packed frame buffer
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// The packed frame buffer, mutable
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut()
    }

    /// Logical dimensions after rotation
    fn logical_size(&self) -> (u32, u32) {
        let geometry = self.display.geometry();
        let (width, height) = (u32::from(geometry.width), u32::from(geometry.height));
        match self.display.rotation() {
            Rotation::Rotate0 | Rotation::Rotate180 => (width, height),
            Rotation::Rotate90 | Rotation::Rotate270 => (height, width),
        }
    }

    /// Set a single pixel, applying rotation
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let (logical_width, logical_height) = self.logical_size();
        if x >= logical_width || y >= logical_height {
            return;
        }

        let geometry = self.display.geometry();
        let (index, bit) = buffer_location(
            x,
            y,
            u32::from(geometry.width),
            u32::from(geometry.height),
            self.display.rotation(),
        );

        let buffer = self.buffer.as_mut();
        if index >= buffer.len() {
            return;
        }
        if color.bit() {
            buffer[index] |= bit;
        } else {
            buffer[index] &= !bit;
        }
    }
}

impl<I, B> DrawTarget for GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set_pixel(x as u32, y as u32, color);
        }
        Ok(())
    }
}

impl<I, B> OriginDimensions for GraphicDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let (width, height) = self.logical_size();
        Size::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, Geometry, RamWindow, Rotation};
    use embedded_graphics_core::Drawable;

    #[derive(Debug)]
    struct MockInterface;

    impl DisplayInterface for MockInterface {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, _command: u8) -> Result<(), Self::Error> {
            Ok(())
        }

        fn send_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_panel_power(&mut self, _on: bool) -> Result<(), Self::Error> {
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}

        fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// 24x4 panel: 3 bytes per row, shared byte index 1, buffer 12 bytes
    fn test_geometry() -> Geometry {
        let primary = RamWindow {
            data_entry_mode: 0x02,
            x_start: 0x01,
            x_end: 0x00,
            y_start: 0,
            y_end: 3,
        };
        let secondary = RamWindow {
            data_entry_mode: 0x03,
            x_start: 0x00,
            x_end: 0x01,
            y_start: 0,
            y_end: 3,
        };
        Geometry::new(24, 4, 1, primary, secondary).unwrap()
    }

    fn test_display(rotation: Rotation) -> Display<MockInterface> {
        let config = Builder::new()
            .geometry(test_geometry())
            .rotation(rotation)
            .build()
            .unwrap();
        Display::new(MockInterface, config)
    }

    fn graphic_display(rotation: Rotation) -> GraphicDisplay<MockInterface, alloc::vec::Vec<u8>> {
        let display = test_display(rotation);
        let buffer = alloc::vec![0u8; display.geometry().buffer_size()];
        GraphicDisplay::new(display, buffer)
    }

    #[test]
    fn test_try_new_rejects_wrong_buffer_size() {
        for delta in [-1i32, 1] {
            let display = test_display(Rotation::Rotate0);
            let size = (display.geometry().buffer_size() as i32 + delta) as usize;
            let result = GraphicDisplay::try_new(display, alloc::vec![0u8; size]);
            assert!(matches!(result, Err(Error::BufferSizeMismatch { .. })));
        }
    }

    #[test]
    #[should_panic(expected = "frame buffer size mismatch")]
    fn test_new_panics_on_oversized_buffer() {
        let display = test_display(Rotation::Rotate0);
        let size = display.geometry().buffer_size() + 1;
        let _ = GraphicDisplay::new(display, alloc::vec![0u8; size]);
    }

    #[test]
    fn test_size_follows_rotation() {
        assert_eq!(graphic_display(Rotation::Rotate0).size(), Size::new(24, 4));
        assert_eq!(graphic_display(Rotation::Rotate90).size(), Size::new(4, 24));
        assert_eq!(
            graphic_display(Rotation::Rotate180).size(),
            Size::new(24, 4)
        );
        assert_eq!(
            graphic_display(Rotation::Rotate270).size(),
            Size::new(4, 24)
        );
    }

    #[test]
    fn test_clear_fills_buffer() {
        let mut display = graphic_display(Rotation::Rotate0);
        display.clear(Color::White);
        assert!(display.buffer().iter().all(|b| *b == 0xFF));
        display.clear(Color::Black);
        assert!(display.buffer().iter().all(|b| *b == 0x00));
    }

    #[test]
    fn test_clear_to_pattern() {
        let mut display = graphic_display(Rotation::Rotate0);
        display.clear_to_pattern(0xAA);
        assert!(display.buffer().iter().all(|b| *b == 0xAA));
    }

    #[test]
    fn test_set_pixel_native_orientation() {
        let mut display = graphic_display(Rotation::Rotate0);
        display.set_pixel(0, 0, Color::White);
        assert_eq!(display.buffer()[0], 0x80);

        display.set_pixel(23, 3, Color::White);
        assert_eq!(display.buffer()[11], 0x01);

        display.set_pixel(0, 0, Color::Black);
        assert_eq!(display.buffer()[0], 0x00);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_clipped() {
        let mut display = graphic_display(Rotation::Rotate0);
        display.set_pixel(24, 0, Color::White);
        display.set_pixel(0, 4, Color::White);
        assert!(display.buffer().iter().all(|b| *b == 0x00));

        // Rotated: logical space is 4 wide, 24 tall
        let mut display = graphic_display(Rotation::Rotate90);
        display.set_pixel(4, 0, Color::White);
        display.set_pixel(0, 24, Color::White);
        assert!(display.buffer().iter().all(|b| *b == 0x00));
    }

    #[test]
    fn test_draw_iter_skips_negative_coordinates() {
        let mut display = graphic_display(Rotation::Rotate0);
        let pixels = [
            Pixel(Point::new(-1, 0), Color::White),
            Pixel(Point::new(0, -1), Color::White),
            Pixel(Point::new(1, 0), Color::White),
        ];
        display.draw_iter(pixels).unwrap();
        assert_eq!(display.buffer()[0], 0x40);
    }

    #[test]
    fn test_embedded_graphics_rectangle() {
        use embedded_graphics::primitives::{Primitive, PrimitiveStyle, Rectangle};

        let mut display = graphic_display(Rotation::Rotate0);
        display.clear(Color::White);

        Rectangle::new(Point::new(0, 0), Size::new(8, 2))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut display)
            .unwrap();

        // Leading byte of rows 0 and 1 blacked out, rest untouched
        assert_eq!(display.buffer()[0], 0x00);
        assert_eq!(display.buffer()[3], 0x00);
        assert_eq!(display.buffer()[1], 0xFF);
        assert_eq!(display.buffer()[2], 0xFF);
        assert_eq!(display.buffer()[4], 0xFF);
        assert_eq!(display.buffer()[6], 0xFF);
    }

    #[test]
    fn test_blit_places_bitmap() {
        let mut display = graphic_display(Rotation::Rotate0);

        // 8x2 bitmap: top row white, bottom row black
        let bitmap = [0xFFu8, 0x00];
        display.blit(&bitmap, 8, 2, 8, 1);

        assert_eq!(display.buffer()[1], 0x00); // row 0 untouched
        assert_eq!(display.buffer()[4], 0xFF); // row 1, middle byte
        assert_eq!(display.buffer()[7], 0x00); // row 2, middle byte
    }

    #[test]
    fn test_blit_clips_at_panel_edge() {
        let mut display = graphic_display(Rotation::Rotate0);
        let bitmap = [0xFFu8, 0xFF];
        display.blit(&bitmap, 8, 2, 20, 3);

        // Only the in-bounds corner lands: row 3, columns 20..24
        assert_eq!(display.buffer()[11], 0x0F);
        assert_eq!(display.buffer()[10], 0x00);
    }

    #[test]
    fn test_show_pushes_buffer() {
        struct MockDelay;
        impl DelayNs for MockDelay {
            fn delay_ns(&mut self, _ns: u32) {}
        }

        let mut display = graphic_display(Rotation::Rotate0);
        let mut delay = MockDelay;
        display.init(&mut delay).unwrap();
        display.clear(Color::White);
        assert!(display.show(UpdateMode::Full, &mut delay).is_ok());
    }
}
