//! Defines the configuration replayed into the SSD1306 at init time.
//!
//! The controller is brought up by replaying an init table: an ordered list of encoded commands
//! covering every configuration register the driver depends on. `Config` holds the tunable values
//! and builds the table for a particular panel size.

use crate::command::consts::DEFAULT_ADDRESS;
use crate::command::*;
use crate::error::OutOfRange;
use crate::size::DisplaySize;

/// Number of records in every init table.
pub const INIT_TABLE_LEN: usize = 19;

/// The ordered commands that take the controller from reset to showing display RAM. The last
/// record always turns the panel on, so nothing half-configured is ever visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitTable {
    records: [CommandRecord; INIT_TABLE_LEN],
}

impl InitTable {
    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }
}

/// A configuration for the display. Builder methods offer a declarative way to override the
/// power-on values the driver sends. Values are range checked when the init table is built.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    address: u8,
    contrast: u8,
    clock_divide: u8,
    clock_fosc: u8,
    precharge_phase_1: u8,
    precharge_phase_2: u8,
    vcomh_deselect: u8,
    segment_remap: bool,
    com_scan_direction: ComScanDirection,
    com_lr_remap: bool,
    charge_pump: bool,
    scroll_interval: ScrollInterval,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create a new configuration for a module at the default bus address, with the column and
    /// row order of the common breakout modules and the internal charge pump on.
    pub fn new() -> Self {
        Config {
            address: DEFAULT_ADDRESS,
            contrast: 0x7F,
            clock_divide: 1,
            clock_fosc: 8,
            precharge_phase_1: 2,
            precharge_phase_2: 12,
            vcomh_deselect: 2,
            segment_remap: true,
            com_scan_direction: ComScanDirection::Remapped,
            com_lr_remap: false,
            charge_pump: true,
            scroll_interval: ScrollInterval::Frames5,
        }
    }

    /// The 7-bit bus address of the display.
    pub fn address(self, address: u8) -> Self {
        Self { address, ..self }
    }

    /// See `Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    /// See `Command::SetClockDivide`.
    pub fn clock_divide(self, divide: u8, fosc: u8) -> Self {
        Self {
            clock_divide: divide,
            clock_fosc: fosc,
            ..self
        }
    }

    /// See `Command::SetPrechargePeriod`.
    pub fn precharge_period(self, phase_1: u8, phase_2: u8) -> Self {
        Self {
            precharge_phase_1: phase_1,
            precharge_phase_2: phase_2,
            ..self
        }
    }

    /// See `Command::SetVcomhDeselect`.
    pub fn vcomh_deselect(self, level: u8) -> Self {
        Self {
            vcomh_deselect: level,
            ..self
        }
    }

    /// Mirror the image horizontally relative to the default. See `Command::SetSegmentRemap`.
    pub fn segment_remap(self, remap: bool) -> Self {
        Self {
            segment_remap: remap,
            ..self
        }
    }

    /// See `Command::SetComScanDirection`.
    pub fn com_scan_direction(self, dir: ComScanDirection) -> Self {
        Self {
            com_scan_direction: dir,
            ..self
        }
    }

    /// See `Command::SetComPinConfig`.
    pub fn com_lr_remap(self, remap: bool) -> Self {
        Self {
            com_lr_remap: remap,
            ..self
        }
    }

    /// Disable this for modules that supply VCC externally. See `Command::SetChargePump`.
    pub fn charge_pump(self, enabled: bool) -> Self {
        Self {
            charge_pump: enabled,
            ..self
        }
    }

    /// Step interval used by `Display::scroll_horizontal`.
    pub fn scroll_interval(self, interval: ScrollInterval) -> Self {
        Self {
            scroll_interval: interval,
            ..self
        }
    }

    pub fn bus_address(&self) -> u8 {
        self.address
    }

    pub fn default_scroll_interval(&self) -> ScrollInterval {
        self.scroll_interval
    }

    /// Build the init table for a panel of geometry `SIZE`.
    pub fn init_table<SIZE>(&self) -> Result<InitTable, OutOfRange>
    where
        SIZE: DisplaySize,
    {
        let records = [
            Command::SetSleepMode(true).encode()?,
            Command::SetMuxRatio(SIZE::PAGES * 8).encode()?,
            Command::SetAddressingMode(AddressingMode::Horizontal).encode()?,
            Command::SetColumnAddress(0, SIZE::MAX_X).encode()?,
            Command::SetPageAddress(0, SIZE::MAX_PAGE).encode()?,
            Command::SetStartLine(0).encode()?,
            Command::SetDisplayOffset(0).encode()?,
            Command::SetSegmentRemap(self.segment_remap).encode()?,
            Command::SetComScanDirection(self.com_scan_direction).encode()?,
            Command::SetComPinConfig(SIZE::COM_PIN_LAYOUT, self.com_lr_remap).encode()?,
            Command::SetContrast(self.contrast).encode()?,
            Command::SetEntireDisplayOn(false).encode()?,
            Command::SetInverse(false).encode()?,
            Command::SetClockDivide(self.clock_divide, self.clock_fosc).encode()?,
            Command::SetPrechargePeriod(self.precharge_phase_1, self.precharge_phase_2)
                .encode()?,
            Command::SetVcomhDeselect(self.vcomh_deselect).encode()?,
            Command::SetChargePump(self.charge_pump).encode()?,
            Command::DeactivateScroll.encode()?,
            Command::SetSleepMode(false).encode()?,
        ];
        Ok(InitTable { records })
    }
}
