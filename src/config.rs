//! Panel geometry and driver configuration
//!
//! [`Geometry`] is the immutable descriptor of one concrete dual-controller
//! panel model: pixel dimensions, the byte index where the two half-panels
//! meet within a packed row, and each controller's RAM window. Panel quirks
//! are data here, not subclass overrides. [`Config`] carries the register
//! values for the boot and refresh sequences; build it with [`Builder`].

pub use crate::error::BuilderError;

use crate::command::Controller;

/// One controller's RAM window and addressing setup
///
/// Counters are re-armed to `(x_start, y_start)` before every RAM write
/// pass. The X window may run descending (`x_start > x_end`) depending on
/// the data entry mode; the values are taken verbatim from the panel's
/// reference initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RamWindow {
    /// Data entry mode register value (increment/decrement directions)
    pub data_entry_mode: u8,
    /// RAM X window start (byte units)
    pub x_start: u8,
    /// RAM X window end (byte units)
    pub x_end: u8,
    /// RAM Y window start (gate line)
    pub y_start: u16,
    /// RAM Y window end (gate line)
    pub y_end: u16,
}

/// Immutable descriptor of a dual-controller panel model
///
/// One logical bitmap spans two physically tiled half-panels. The packed row
/// byte at `split_boundary` straddles the tile seam: its four most
/// significant bits belong to one chip's edge column and its four least
/// significant bits to the other's, so that byte must reach both RAM spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Panel width in pixels (both tiles together)
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// Byte index within a packed row shared by both controllers
    pub split_boundary: u16,
    /// RAM window of the primary (master) controller
    pub primary: RamWindow,
    /// RAM window of the secondary (slave) controller
    pub secondary: RamWindow,
}

/// Geometry of the CrowPanel 5.79" panel (792x272, SSD1683 pair)
///
/// Windows and data entry modes are the reference driver's values: the
/// primary chip scans its X window descending from byte 0x31, the secondary
/// ascending to byte 0x31; byte 49 of each 99-byte row is shared.
pub const CROWPANEL_5IN79: Geometry = Geometry {
    width: 792,
    height: 272,
    split_boundary: 49,
    primary: RamWindow {
        data_entry_mode: 0x02,
        x_start: 0x31,
        x_end: 0x00,
        y_start: 0x0000,
        y_end: 0x010F,
    },
    secondary: RamWindow {
        data_entry_mode: 0x03,
        x_start: 0x00,
        x_end: 0x31,
        y_start: 0x0000,
        y_end: 0x010F,
    },
};

impl Geometry {
    /// Create a geometry with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidGeometry` if:
    /// - width or height is zero
    /// - width is not a multiple of 8 (rows are byte-packed)
    /// - the split boundary does not bisect the row, i.e.
    ///   `2 * (split_boundary + 1) - 1 != width / 8`
    pub fn new(
        width: u16,
        height: u16,
        split_boundary: u16,
        primary: RamWindow,
        secondary: RamWindow,
    ) -> Result<Self, BuilderError> {
        if width == 0 || height == 0 || width % 8 != 0 {
            return Err(BuilderError::InvalidGeometry { width, height });
        }
        if 2 * (split_boundary as usize + 1) - 1 != (width / 8) as usize {
            return Err(BuilderError::InvalidGeometry { width, height });
        }
        Ok(Self {
            width,
            height,
            split_boundary,
            primary,
            secondary,
        })
    }

    /// Required frame buffer size in bytes (`width * height / 8`)
    pub fn buffer_size(&self) -> usize {
        (self.width as usize * self.height as usize) / 8
    }

    /// Packed bytes per row (`width / 8`)
    pub fn bytes_per_row(&self) -> usize {
        (self.width / 8) as usize
    }

    /// RAM write chunk size: the shared byte plus one half-row
    ///
    /// Each controller receives this many bytes per row; the byte at
    /// `split_boundary` is counted by both.
    pub fn chunk_size(&self) -> usize {
        self.split_boundary as usize + 1
    }

    /// Bytes to stream when filling one controller RAM bank
    ///
    /// The controllers address one byte per row more than the visible half
    /// width; the reference driver fills `(width + 8) * height / 8`.
    pub fn controller_ram_size(&self) -> usize {
        (self.bytes_per_row() + 1) * self.height as usize
    }

    /// RAM window for the given controller
    pub fn window(&self, controller: Controller) -> &RamWindow {
        match controller {
            Controller::Primary => &self.primary,
            Controller::Secondary => &self.secondary,
        }
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Driver configuration
///
/// Holds the panel geometry plus the register values used by the boot and
/// refresh sequences. Use [`Builder`] to create a Config; the defaults are
/// the CrowPanel 5.79" reference values.
#[derive(Clone, Debug)]
pub struct Config {
    /// Panel geometry
    pub geometry: Geometry,
    /// Display rotation
    pub rotation: Rotation,
    /// Border waveform setting
    pub border_waveform: u8,
    /// Temperature sensor control (0x80 = internal sensor)
    pub temp_sensor_control: u8,
    /// Fixed temperature override written during boot (2 bytes)
    pub temp_override: [u8; 2],
    /// Display control 2 value that loads the sensed temperature
    pub ctrl2_load_temp: u8,
    /// Display control 2 value that loads the overridden temperature
    pub ctrl2_load_temp_override: u8,
    /// Display control 2 value for a full refresh
    pub ctrl2_full: u8,
    /// Display control 2 value for a fast refresh
    pub ctrl2_fast: u8,
    /// Display control 2 value for a partial refresh
    pub ctrl2_partial: u8,
    /// Fill value streamed into both image RAM banks at boot
    pub clear_ram_value: u8,
    /// Fill value streamed into both alt-RAM banks at boot
    pub clear_altram_value: u8,
}

/// Builder for constructing driver configuration
///
/// # Example
///
/// ```rust
/// use ssd1683_dual::{Builder, CROWPANEL_5IN79};
///
/// let config = Builder::new().geometry(CROWPANEL_5IN79).build();
/// assert!(config.is_ok());
/// ```
#[must_use]
pub struct Builder {
    /// Panel geometry (required)
    geometry: Option<Geometry>,
    /// Display rotation
    rotation: Rotation,
    /// Border waveform setting
    border_waveform: u8,
    /// Temperature sensor control
    temp_sensor_control: u8,
    /// Fixed temperature override written during boot
    temp_override: [u8; 2],
    /// Display control 2 value that loads the sensed temperature
    ctrl2_load_temp: u8,
    /// Display control 2 value that loads the overridden temperature
    ctrl2_load_temp_override: u8,
    /// Display control 2 value for a full refresh
    ctrl2_full: u8,
    /// Display control 2 value for a fast refresh
    ctrl2_fast: u8,
    /// Display control 2 value for a partial refresh
    ctrl2_partial: u8,
    /// Boot fill value for image RAM
    clear_ram_value: u8,
    /// Boot fill value for alt-RAM
    clear_altram_value: u8,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            geometry: None,
            rotation: Rotation::Rotate0,
            // White border
            border_waveform: 0x01,
            // Internal temperature sensor
            temp_sensor_control: 0x80,
            // Fixed override loaded after the sensed value
            temp_override: [0x64, 0x00],
            ctrl2_load_temp: 0xB1,
            ctrl2_load_temp_override: 0x91,
            // Update profiles (OTP waveforms selected via display control 2)
            ctrl2_full: 0xF7,
            ctrl2_fast: 0xC7,
            ctrl2_partial: 0xDC,
            // Boot RAM state: white image, clear old-image plane
            clear_ram_value: 0xFF,
            clear_altram_value: 0x00,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel geometry (required)
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set border waveform
    pub fn border_waveform(mut self, value: u8) -> Self {
        self.border_waveform = value;
        self
    }

    /// Set temperature sensor control
    pub fn temp_sensor_control(mut self, value: u8) -> Self {
        self.temp_sensor_control = value;
        self
    }

    /// Set the fixed temperature override written during boot
    pub fn temp_override(mut self, value: [u8; 2]) -> Self {
        self.temp_override = value;
        self
    }

    /// Set the display control 2 value that loads the sensed temperature
    pub fn ctrl2_load_temp(mut self, value: u8) -> Self {
        self.ctrl2_load_temp = value;
        self
    }

    /// Set the display control 2 value that loads the overridden temperature
    pub fn ctrl2_load_temp_override(mut self, value: u8) -> Self {
        self.ctrl2_load_temp_override = value;
        self
    }

    /// Set the display control 2 value for a full refresh
    pub fn ctrl2_full(mut self, value: u8) -> Self {
        self.ctrl2_full = value;
        self
    }

    /// Set the display control 2 value for a fast refresh
    pub fn ctrl2_fast(mut self, value: u8) -> Self {
        self.ctrl2_fast = value;
        self
    }

    /// Set the display control 2 value for a partial refresh
    pub fn ctrl2_partial(mut self, value: u8) -> Self {
        self.ctrl2_partial = value;
        self
    }

    /// Set the boot fill value for both image RAM banks
    pub fn clear_ram_value(mut self, value: u8) -> Self {
        self.clear_ram_value = value;
        self
    }

    /// Set the boot fill value for both alt-RAM banks
    pub fn clear_altram_value(mut self, value: u8) -> Self {
        self.clear_altram_value = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingGeometry` if no geometry was set.
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            geometry: self.geometry.ok_or(BuilderError::MissingGeometry)?,
            rotation: self.rotation,
            border_waveform: self.border_waveform,
            temp_sensor_control: self.temp_sensor_control,
            temp_override: self.temp_override,
            ctrl2_load_temp: self.ctrl2_load_temp,
            ctrl2_load_temp_override: self.ctrl2_load_temp_override,
            ctrl2_full: self.ctrl2_full,
            ctrl2_fast: self.ctrl2_fast,
            ctrl2_partial: self.ctrl2_partial,
            clear_ram_value: self.clear_ram_value,
            clear_altram_value: self.clear_altram_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crowpanel_geometry_sizes() {
        let g = CROWPANEL_5IN79;
        assert_eq!(g.bytes_per_row(), 99);
        assert_eq!(g.chunk_size(), 50);
        assert_eq!(g.buffer_size(), 26_928);
        assert_eq!(g.controller_ram_size(), 27_200);
    }

    #[test]
    fn test_crowpanel_windows() {
        let g = CROWPANEL_5IN79;
        assert_eq!(g.primary.data_entry_mode, 0x02);
        assert_eq!((g.primary.x_start, g.primary.x_end), (0x31, 0x00));
        assert_eq!(g.secondary.data_entry_mode, 0x03);
        assert_eq!((g.secondary.x_start, g.secondary.x_end), (0x00, 0x31));
        assert_eq!(g.primary.y_end, 271);
        assert_eq!(g.secondary.y_end, 271);
    }

    #[test]
    fn test_geometry_rejects_unaligned_width() {
        let w = CROWPANEL_5IN79.primary;
        let result = Geometry::new(790, 272, 49, w, w);
        assert_eq!(
            result,
            Err(BuilderError::InvalidGeometry {
                width: 790,
                height: 272
            })
        );
    }

    #[test]
    fn test_geometry_rejects_zero_dimensions() {
        let w = CROWPANEL_5IN79.primary;
        assert!(Geometry::new(0, 272, 49, w, w).is_err());
        assert!(Geometry::new(792, 0, 49, w, w).is_err());
    }

    #[test]
    fn test_geometry_rejects_split_that_does_not_bisect_row() {
        let w = CROWPANEL_5IN79.primary;
        // 792px -> 99 bytes per row; only split 49 satisfies 2*(s+1)-1 == 99
        assert!(Geometry::new(792, 272, 48, w, w).is_err());
        assert!(Geometry::new(792, 272, 50, w, w).is_err());
        assert!(Geometry::new(792, 272, 49, w, w).is_ok());
    }

    #[test]
    fn test_geometry_window_selector() {
        let g = CROWPANEL_5IN79;
        assert_eq!(g.window(Controller::Primary), &g.primary);
        assert_eq!(g.window(Controller::Secondary), &g.secondary);
    }

    #[test]
    fn test_builder_requires_geometry() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingGeometry)
        ));
    }

    #[test]
    fn test_builder_defaults_match_reference_boot_values() {
        let config = Builder::new().geometry(CROWPANEL_5IN79).build().unwrap();
        assert_eq!(config.border_waveform, 0x01);
        assert_eq!(config.temp_sensor_control, 0x80);
        assert_eq!(config.temp_override, [0x64, 0x00]);
        assert_eq!(config.ctrl2_load_temp, 0xB1);
        assert_eq!(config.ctrl2_load_temp_override, 0x91);
        assert_eq!(config.ctrl2_full, 0xF7);
        assert_eq!(config.ctrl2_fast, 0xC7);
        assert_eq!(config.ctrl2_partial, 0xDC);
        assert_eq!(config.clear_ram_value, 0xFF);
        assert_eq!(config.clear_altram_value, 0x00);
    }

    #[test]
    fn test_builder_overrides() {
        let config = Builder::new()
            .geometry(CROWPANEL_5IN79)
            .border_waveform(0x03)
            .ctrl2_fast(0xFF)
            .build()
            .unwrap();
        assert_eq!(config.border_waveform, 0x03);
        assert_eq!(config.ctrl2_fast, 0xFF);
    }
}
