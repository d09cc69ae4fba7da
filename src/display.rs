//! Core display operations
//!
//! [`Display`] owns the hardware interface and the device state machine. It
//! sequences the boot/temperature-compensation routine, splits one packed
//! frame across the two controllers' RAM spaces, and triggers the refresh
//! profiles.

use embedded_hal::delay::DelayNs;

use crate::command::{
    BORDER_WAVEFORM, Controller, DEEP_SLEEP, DISPLAY_CTRL2, MASTER_ACTIVATE, SW_RESET,
    TEMP_CONTROL, WRITE_RAM, WRITE_RAM_SECONDARY, WRITE_TEMP,
};
use crate::config::Config;
use crate::error::Error;
use crate::interface::DisplayInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Stack buffer size for streaming RAM fill patterns
const FILL_CHUNK: usize = 64;

/// Device state machine
///
/// The driver is strictly sequential and blocking: `Busy` is only ever
/// observed from within a call; every public operation returns with the
/// device in `Idle`, `Sleeping` or (on a failed busy-wait) `Busy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    /// Constructed but the reset sequence has not run
    Uninitialized,
    /// Ready to accept RAM writes and refreshes
    Idle,
    /// An activate is executing (busy line asserted)
    Busy,
    /// In deep sleep; only a fresh reset sequence recovers
    Sleeping,
}

/// Refresh profile for display updates
///
/// Each profile selects a display-control-2 register value, trading refresh
/// speed against image quality. Mode selection is caller-specified per show;
/// there is no automatic escalation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Complete refresh: slowest, clears ghosting
    #[default]
    Full,
    /// Fastest refresh, lowest visual quality
    Fast,
    /// Incremental refresh; ghosting possible
    Partial,
}

impl UpdateMode {
    /// Map a numeric mode code to a profile
    ///
    /// The mapping is total: 1 selects Fast, 2 selects Partial, and any
    /// other value falls back to Full.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Fast,
            2 => Self::Partial,
            _ => Self::Full,
        }
    }
}

/// Deep sleep mode configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DeepSleepMode {
    /// Normal sleep
    Normal = 0x00,
    /// Deep sleep with RAM content preserved
    #[default]
    RetainRam = 0x01,
    /// Deep sleep without RAM retention
    DiscardRam = 0x11,
}

/// Driver for a dual-controller e-paper panel
///
/// Exclusively owns the bus and both controllers' address spaces. For a
/// drawing surface, wrap it in `GraphicDisplay` (requires the `graphics`
/// feature).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Panel geometry and register values
    config: Config,
    /// Device state machine
    state: DeviceState,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// The device starts [`DeviceState::Uninitialized`]; run [`init`](Self::init)
    /// before drawing.
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            state: DeviceState::Uninitialized,
        }
    }

    /// Current device state
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Panel geometry
    pub fn geometry(&self) -> &crate::config::Geometry {
        &self.config.geometry
    }

    /// Display rotation
    pub fn rotation(&self) -> crate::config::Rotation {
        self.config.rotation
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full power/reset/temperature-compensation boot sequence
    ///
    /// Asserts panel power, pulses hardware reset, soft-resets both chips,
    /// runs the temperature-compensation register loads, sets the border
    /// waveform and fills all four RAM banks to their boot values. The
    /// device accepts drawing-RAM writes only after this completes.
    ///
    /// Also the only way back from [`DeviceState::Sleeping`].
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::debug!("init: reset sequence");
        self.interface
            .set_panel_power(true)
            .map_err(Error::Interface)?;
        self.interface.reset(delay);
        self.busy_wait(delay)?;
        self.command(SW_RESET)?;
        self.busy_wait(delay)?;

        // Temperature compensation: sense, load, override, load again
        self.command_with(TEMP_CONTROL, &[self.config.temp_sensor_control])?;
        self.command_with(DISPLAY_CTRL2, &[self.config.ctrl2_load_temp])?;
        self.command(MASTER_ACTIVATE)?;
        self.busy_wait(delay)?;

        let temp_override = self.config.temp_override;
        self.command_with(WRITE_TEMP, &temp_override)?;
        self.command_with(DISPLAY_CTRL2, &[self.config.ctrl2_load_temp_override])?;
        self.command(MASTER_ACTIVATE)?;
        self.busy_wait(delay)?;

        self.command_with(BORDER_WAVEFORM, &[self.config.border_waveform])?;
        self.busy_wait(delay)?;

        self.fill_all_ram()?;

        self.state = DeviceState::Idle;
        log::debug!("init: device idle");
        Ok(())
    }

    /// Re-run the boot sequence after deep sleep
    pub fn wake<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.init(delay)
    }

    /// Push a packed frame to both controllers and refresh the panel
    ///
    /// `buffer` is the packed 1bpp image, rows MSB-first, exactly
    /// `width * height / 8` bytes. Blocks through the physical refresh;
    /// a full-profile refresh takes on the order of seconds.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::BufferSizeMismatch`] or [`Error::NotIdle`]
    /// before any bus write; interface errors abort mid-transfer.
    pub fn show<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        mode: UpdateMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.ensure_idle()?;
        let expected = self.config.geometry.buffer_size();
        if buffer.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                provided: buffer.len(),
            });
        }
        self.write_frame(buffer)?;
        self.refresh_with_mode(mode, delay)
    }

    /// Trigger a refresh from the RAM contents already loaded
    pub fn refresh<D: DelayNs>(&mut self, mode: UpdateMode, delay: &mut D) -> DisplayResult<I> {
        self.ensure_idle()?;
        self.refresh_with_mode(mode, delay)
    }

    /// Fill all four RAM banks to their configured boot values
    ///
    /// Image RAM of both chips gets `clear_ram_value`, alt-RAM gets
    /// `clear_altram_value`. Does not trigger a refresh.
    pub fn clear_ram(&mut self) -> DisplayResult<I> {
        self.ensure_idle()?;
        self.fill_all_ram()
    }

    /// Enter deep sleep
    ///
    /// The panel retains its image without power. Recover with
    /// [`wake`](Self::wake); any RAM write or refresh attempted while
    /// sleeping fails with [`Error::NotIdle`].
    pub fn deep_sleep<D: DelayNs>(
        &mut self,
        mode: DeepSleepMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.ensure_idle()?;
        self.command_with(DEEP_SLEEP, &[mode as u8])?;
        delay.delay_ms(5);
        self.state = DeviceState::Sleeping;
        log::debug!("deep sleep entered ({:?})", mode);
        Ok(())
    }

    fn ensure_idle(&self) -> DisplayResult<I> {
        if self.state != DeviceState::Idle {
            return Err(Error::NotIdle { state: self.state });
        }
        Ok(())
    }

    /// Stream one packed frame into both controllers' image RAM
    ///
    /// Both RAM pointers are first reset to their window origins. The frame
    /// is then consumed in alternating chunks of `chunk_size` bytes:
    /// secondary chip first, then a one-byte cursor rewind, then the primary
    /// chip, with no rewind before the next secondary chunk. Each 99-byte
    /// row therefore splits into two 50-byte writes that overlap on the
    /// seam byte, whose four high bits render on one chip's edge column and
    /// four low bits on the other's.
    ///
    /// The rewind-based interleave reproduces the reference driver byte for
    /// byte; it encodes unverified hardware-boundary behavior and must not
    /// be reordered.
    fn write_frame(&mut self, buffer: &[u8]) -> DisplayResult<I> {
        self.set_ram_window(Controller::Primary)?;
        self.set_ram_counters(Controller::Primary)?;
        self.set_ram_window(Controller::Secondary)?;
        self.set_ram_counters(Controller::Secondary)?;

        let chunk = self.config.geometry.chunk_size();
        let mut cursor = 0usize;
        while cursor < buffer.len() {
            let end = usize::min(cursor + chunk, buffer.len());
            self.command(WRITE_RAM_SECONDARY)?;
            self.send_data(&buffer[cursor..end])?;

            // Re-read the seam byte for the primary chip
            cursor = end - 1;

            let end = usize::min(cursor + chunk, buffer.len());
            self.command(WRITE_RAM)?;
            self.send_data(&buffer[cursor..end])?;
            cursor = end;
        }
        log::trace!("frame written ({} bytes)", buffer.len());
        Ok(())
    }

    fn refresh_with_mode<D: DelayNs>(
        &mut self,
        mode: UpdateMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let ctrl2 = match mode {
            UpdateMode::Full => self.config.ctrl2_full,
            UpdateMode::Fast => self.config.ctrl2_fast,
            UpdateMode::Partial => self.config.ctrl2_partial,
        };
        log::debug!("refresh: {:?} (ctrl2 {:#04x})", mode, ctrl2);

        self.command_with(DISPLAY_CTRL2, &[ctrl2])?;
        self.command(MASTER_ACTIVATE)?;
        self.state = DeviceState::Busy;
        // On a failed wait the device is left Busy; only a fresh init recovers.
        self.interface.busy_wait(delay).map_err(Error::Interface)?;
        self.state = DeviceState::Idle;
        Ok(())
    }

    /// Program one controller's data entry mode and RAM window
    fn set_ram_window(&mut self, controller: Controller) -> DisplayResult<I> {
        let window = *self.config.geometry.window(controller);
        self.command_with(controller.data_entry_mode(), &[window.data_entry_mode])?;
        self.command(controller.ram_x_window())?;
        self.send_data(&[window.x_start, window.x_end])?;
        self.command(controller.ram_y_window())?;
        self.send_data(&[
            (window.y_start % 256) as u8,
            (window.y_start / 256) as u8,
            (window.y_end % 256) as u8,
            (window.y_end / 256) as u8,
        ])?;
        Ok(())
    }

    /// Reset one controller's RAM pointer to its window origin
    fn set_ram_counters(&mut self, controller: Controller) -> DisplayResult<I> {
        let window = *self.config.geometry.window(controller);
        self.command_with(controller.ram_x_counter(), &[window.x_start])?;
        self.command(controller.ram_y_counter())?;
        self.send_data(&[
            (window.y_start % 256) as u8,
            (window.y_start / 256) as u8,
        ])?;
        Ok(())
    }

    fn fill_all_ram(&mut self) -> DisplayResult<I> {
        let count = self.config.geometry.controller_ram_size();
        let ram_fill = self.config.clear_ram_value;
        let altram_fill = self.config.clear_altram_value;

        for controller in [Controller::Primary, Controller::Secondary] {
            self.set_ram_window(controller)?;
            self.set_ram_counters(controller)?;
            self.command(controller.write_ram())?;
            self.stream_fill(ram_fill, count)?;

            self.set_ram_counters(controller)?;
            self.command(controller.write_altram())?;
            self.stream_fill(altram_fill, count)?;
        }
        log::trace!("RAM banks filled ({} bytes per bank)", count);
        Ok(())
    }

    /// Stream `remaining` copies of `value` as RAM data
    fn stream_fill(&mut self, value: u8, mut remaining: usize) -> DisplayResult<I> {
        let pattern = [value; FILL_CHUNK];
        while remaining > 0 {
            let n = usize::min(remaining, pattern.len());
            self.send_data(&pattern[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Send a command byte to the controllers
    fn command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send a command byte followed by its argument bytes
    fn command_with(&mut self, cmd: u8, data: &[u8]) -> DisplayResult<I> {
        self.command(cmd)?;
        self.send_data(data)
    }

    /// Send data bytes to the controllers
    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }
}
