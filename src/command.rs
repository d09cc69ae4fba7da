//! SSD1683 command definitions
//!
//! The panel is driven by two cascaded SSD1683 controllers on one SPI bus.
//! Most RAM-addressing commands exist in two variants: the primary (master)
//! opcode from the datasheet, and a secondary (slave) opcode with bit 7 set
//! that targets the second chip's address space. [`Controller`] selects the
//! variant; commands without a secondary variant act on the shared update
//! engine.
//!
//! All transfers follow the same framing: DC low for the opcode byte,
//! DC high for every data byte, chip select asserted for the duration of
//! each transfer.

// System control

/// Driver output control (0x01)
///
/// Sets the gate output count and scanning order. Requires 3 bytes.
pub const DRIVER_CONTROL: u8 = 0x01;

/// Deep sleep (0x10)
///
/// Enters low-power mode. Requires 1 byte (see [`crate::DeepSleepMode`]).
/// Only a fresh hardware reset sequence wakes the controllers.
pub const DEEP_SLEEP: u8 = 0x10;

/// Software reset (0x12)
///
/// Resets register state to defaults. Wait for BUSY low afterwards.
pub const SW_RESET: u8 = 0x12;

// Temperature compensation

/// Temperature sensor control (0x18)
///
/// Selects the temperature source. 1 byte: 0x80 = internal sensor.
pub const TEMP_CONTROL: u8 = 0x18;

/// Write temperature register (0x1A)
///
/// Overrides the sensed temperature used for waveform timing. 2 bytes.
pub const WRITE_TEMP: u8 = 0x1A;

// Update engine

/// Master activation (0x20)
///
/// Triggers the sequence staged via [`DISPLAY_CTRL2`]. BUSY goes high for
/// the duration of the operation.
pub const MASTER_ACTIVATE: u8 = 0x20;

/// Display update control 2 (0x22)
///
/// Stages the update sequence executed by [`MASTER_ACTIVATE`]. 1 byte;
/// the per-mode values live in [`crate::Config`].
pub const DISPLAY_CTRL2: u8 = 0x22;

/// Border waveform control (0x3C)
///
/// Sets the border drive during refresh. 1 byte.
pub const BORDER_WAVEFORM: u8 = 0x3C;

// RAM addressing, primary controller

/// Data entry mode, primary (0x11)
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// Write image RAM, primary (0x24)
pub const WRITE_RAM: u8 = 0x24;

/// Write alt (old-image) RAM, primary (0x26)
pub const WRITE_ALTRAM: u8 = 0x26;

/// Set RAM X window, primary (0x44). 2 bytes: start, end.
pub const SET_RAM_X_WINDOW: u8 = 0x44;

/// Set RAM Y window, primary (0x45). 4 bytes: start LSB/MSB, end LSB/MSB.
pub const SET_RAM_Y_WINDOW: u8 = 0x45;

/// Set RAM X counter, primary (0x4E). 1 byte.
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y counter, primary (0x4F). 2 bytes: LSB, MSB.
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

// RAM addressing, secondary controller

/// Data entry mode, secondary (0x91)
pub const DATA_ENTRY_MODE_SECONDARY: u8 = 0x91;

/// Write image RAM, secondary (0xA4)
pub const WRITE_RAM_SECONDARY: u8 = 0xA4;

/// Write alt (old-image) RAM, secondary (0xA6)
pub const WRITE_ALTRAM_SECONDARY: u8 = 0xA6;

/// Set RAM X window, secondary (0xC4)
pub const SET_RAM_X_WINDOW_SECONDARY: u8 = 0xC4;

/// Set RAM Y window, secondary (0xC5)
pub const SET_RAM_Y_WINDOW_SECONDARY: u8 = 0xC5;

/// Set RAM X counter, secondary (0xCE)
pub const SET_RAM_X_COUNTER_SECONDARY: u8 = 0xCE;

/// Set RAM Y counter, secondary (0xCF)
pub const SET_RAM_Y_COUNTER_SECONDARY: u8 = 0xCF;

/// Target controller chip for RAM-addressing commands
///
/// The primary chip drives one half of the panel's columns, the secondary
/// the other. Each has its own RAM address space; the selector picks the
/// matching opcode family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    /// Master chip (datasheet opcodes)
    Primary,
    /// Slave chip (opcodes with bit 7 set)
    Secondary,
}

impl Controller {
    /// Data entry mode opcode for this controller
    pub fn data_entry_mode(self) -> u8 {
        match self {
            Self::Primary => DATA_ENTRY_MODE,
            Self::Secondary => DATA_ENTRY_MODE_SECONDARY,
        }
    }

    /// Image RAM write opcode for this controller
    pub fn write_ram(self) -> u8 {
        match self {
            Self::Primary => WRITE_RAM,
            Self::Secondary => WRITE_RAM_SECONDARY,
        }
    }

    /// Alt-RAM write opcode for this controller
    pub fn write_altram(self) -> u8 {
        match self {
            Self::Primary => WRITE_ALTRAM,
            Self::Secondary => WRITE_ALTRAM_SECONDARY,
        }
    }

    /// RAM X window opcode for this controller
    pub fn ram_x_window(self) -> u8 {
        match self {
            Self::Primary => SET_RAM_X_WINDOW,
            Self::Secondary => SET_RAM_X_WINDOW_SECONDARY,
        }
    }

    /// RAM Y window opcode for this controller
    pub fn ram_y_window(self) -> u8 {
        match self {
            Self::Primary => SET_RAM_Y_WINDOW,
            Self::Secondary => SET_RAM_Y_WINDOW_SECONDARY,
        }
    }

    /// RAM X counter opcode for this controller
    pub fn ram_x_counter(self) -> u8 {
        match self {
            Self::Primary => SET_RAM_X_COUNTER,
            Self::Secondary => SET_RAM_X_COUNTER_SECONDARY,
        }
    }

    /// RAM Y counter opcode for this controller
    pub fn ram_y_counter(self) -> u8 {
        match self {
            Self::Primary => SET_RAM_Y_COUNTER,
            Self::Secondary => SET_RAM_Y_COUNTER_SECONDARY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_opcode_values() {
        assert_eq!(DRIVER_CONTROL, 0x01);
        assert_eq!(SW_RESET, 0x12);
        assert_eq!(DATA_ENTRY_MODE, 0x11);
        assert_eq!(TEMP_CONTROL, 0x18);
        assert_eq!(WRITE_TEMP, 0x1A);
        assert_eq!(DISPLAY_CTRL2, 0x22);
        assert_eq!(MASTER_ACTIVATE, 0x20);
        assert_eq!(WRITE_RAM, 0x24);
        assert_eq!(WRITE_ALTRAM, 0x26);
        assert_eq!(SET_RAM_X_WINDOW, 0x44);
        assert_eq!(SET_RAM_Y_WINDOW, 0x45);
        assert_eq!(SET_RAM_X_COUNTER, 0x4E);
        assert_eq!(SET_RAM_Y_COUNTER, 0x4F);
        assert_eq!(BORDER_WAVEFORM, 0x3C);
        assert_eq!(DEEP_SLEEP, 0x10);
    }

    #[test]
    fn test_secondary_opcode_values() {
        assert_eq!(DATA_ENTRY_MODE_SECONDARY, 0x91);
        assert_eq!(WRITE_RAM_SECONDARY, 0xA4);
        assert_eq!(WRITE_ALTRAM_SECONDARY, 0xA6);
        assert_eq!(SET_RAM_X_WINDOW_SECONDARY, 0xC4);
        assert_eq!(SET_RAM_Y_WINDOW_SECONDARY, 0xC5);
        assert_eq!(SET_RAM_X_COUNTER_SECONDARY, 0xCE);
        assert_eq!(SET_RAM_Y_COUNTER_SECONDARY, 0xCF);
    }

    #[test]
    fn test_controller_selects_opcode_family() {
        assert_eq!(Controller::Primary.write_ram(), WRITE_RAM);
        assert_eq!(Controller::Secondary.write_ram(), WRITE_RAM_SECONDARY);
        assert_eq!(Controller::Primary.write_altram(), WRITE_ALTRAM);
        assert_eq!(Controller::Secondary.write_altram(), WRITE_ALTRAM_SECONDARY);
        assert_eq!(Controller::Primary.ram_x_counter(), SET_RAM_X_COUNTER);
        assert_eq!(
            Controller::Secondary.ram_y_counter(),
            SET_RAM_Y_COUNTER_SECONDARY
        );
    }

    #[test]
    fn test_secondary_family_is_primary_with_high_bit() {
        for (primary, secondary) in [
            (DATA_ENTRY_MODE, DATA_ENTRY_MODE_SECONDARY),
            (WRITE_RAM, WRITE_RAM_SECONDARY),
            (WRITE_ALTRAM, WRITE_ALTRAM_SECONDARY),
            (SET_RAM_X_WINDOW, SET_RAM_X_WINDOW_SECONDARY),
            (SET_RAM_Y_WINDOW, SET_RAM_Y_WINDOW_SECONDARY),
            (SET_RAM_X_COUNTER, SET_RAM_X_COUNTER_SECONDARY),
            (SET_RAM_Y_COUNTER, SET_RAM_Y_COUNTER_SECONDARY),
        ] {
            assert_eq!(primary | 0x80, secondary);
        }
    }
}
