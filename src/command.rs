//! The command set for the SSD1306.
//!
//! Note 1: The display RAM of the SSD1306 is arranged in 8 pages of 128 columns, where each column
//! of a page is one byte covering 8 vertically stacked pixels, least significant bit on top. Thus,
//! anywhere there is a "page" address, these refer to horizontal bands 8 pixels tall.

use crate::error::{Error, OutOfRange};
use crate::interface::{DisplayInterface, Transaction};

pub mod consts {
    //! Controller limits and wire constants.

    pub const NUM_COLUMNS: u8 = 128;
    pub const NUM_PAGES: u8 = 8;
    pub const NUM_ROWS: u8 = NUM_PAGES * 8;
    pub const COLUMN_MAX: u8 = NUM_COLUMNS - 1;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;
    pub const ROW_MAX: u8 = NUM_ROWS - 1;

    /// Bus address with the SA0 pin low.
    pub const DEFAULT_ADDRESS: u8 = 0x3C;
    /// Bus address with the SA0 pin high.
    pub const ALTERNATE_ADDRESS: u8 = 0x3D;

    /// Control byte: continuation bit set, D/C# low. Exactly one command byte follows.
    pub const CONTROL_COMMAND: u8 = 0x80;
    /// Control byte: continuation bit clear, D/C# high. Display RAM bytes follow until STOP.
    pub const CONTROL_DATA_STREAM: u8 = 0x40;

    /// Longest argument list of any command (horizontal scroll setup).
    pub const MAX_ARGS: usize = 6;
}

use self::consts::*;

/// How the RAM address pointer advances as image data is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingMode {
    /// Column address increments; at the end column of the window it resets to the start column
    /// and the page address increments. The driver always runs in this mode.
    Horizontal,
    /// Page address increments; at the end page of the window it resets to the start page and
    /// the column address increments.
    Vertical,
    /// Column address increments within a single page and never wraps to the next page.
    Page,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComScanDirection {
    /// Scan from COM0 to COM[N-1].
    Normal,
    /// Scan from COM[N-1] to COM0.
    Remapped,
}

/// How the display module wires the COM lines to the panel rows. This is dictated by the module;
/// see its datasheet. 64-row modules are usually `Alternative`, shorter ones `Sequential`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComPinLayout {
    Sequential,
    Alternative,
}

/// Direction of the hardware horizontal scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Time between scroll steps, in frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollInterval {
    Frames2,
    Frames3,
    Frames4,
    Frames5,
    Frames25,
    Frames64,
    Frames128,
    Frames256,
}

impl ScrollInterval {
    fn code(self) -> u8 {
        match self {
            ScrollInterval::Frames5 => 0b000,
            ScrollInterval::Frames64 => 0b001,
            ScrollInterval::Frames128 => 0b010,
            ScrollInterval::Frames256 => 0b011,
            ScrollInterval::Frames3 => 0b100,
            ScrollInterval::Frames4 => 0b101,
            ScrollInterval::Frames25 => 0b110,
            ScrollInterval::Frames2 => 0b111,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Set the memory addressing mode.
    SetAddressingMode(AddressingMode),
    /// Set the column start and end address of the write window. The column pointer is reset to
    /// the start address. Range is 0-127, start <= end. (Note 1)
    SetColumnAddress(u8, u8),
    /// Set the page start and end address of the write window. The page pointer is reset to the
    /// start address. Range is 0-7, start <= end. (Note 1)
    SetPageAddress(u8, u8),
    /// Set the display RAM row shown on the first panel row, "rolling" the image upwards. Range
    /// is 0-63.
    SetStartLine(u8),
    /// Set the contrast. Range 0-255.
    SetContrast(u8),
    /// Enable or disable the internal charge pump. Must be enabled for modules without an
    /// external VCC supply.
    SetChargePump(bool),
    /// Map column address 127 to SEG0 instead of column address 0, flipping the image
    /// horizontally.
    SetSegmentRemap(bool),
    /// Light every pixel regardless of display RAM contents. `false` resumes showing the RAM.
    SetEntireDisplayOn(bool),
    /// Invert the display so that a 0 bit in RAM lights a pixel.
    SetInverse(bool),
    /// Set the MUX ratio, i.e. the number of active panel rows. Range 16-64.
    SetMuxRatio(u8),
    /// Control sleep mode. `true` turns the panel off.
    SetSleepMode(bool),
    /// Set the COM scan direction.
    SetComScanDirection(ComScanDirection),
    /// Set the COM line offset, rolling both image and active rows. Range 0-63.
    SetDisplayOffset(u8),
    /// Set the display clock divide ratio (1-16) and oscillator frequency setting (0-15).
    SetClockDivide(u8, u8),
    /// Set the pre-charge period phase 1 and phase 2 lengths, 1-15 DCLKs each.
    SetPrechargePeriod(u8, u8),
    /// Set the COM pin hardware layout and whether COM left/right remap is enabled.
    SetComPinConfig(ComPinLayout, bool),
    /// Set the VCOMH deselect level code. Range 0-7.
    SetVcomhDeselect(u8),
    /// Set up (but do not start) a continuous horizontal scroll of the pages from start to end,
    /// inclusive. Range 0-7, start <= end.
    SetupHorizontalScroll(ScrollDirection, u8, u8, ScrollInterval),
    /// Start the scroll previously set up.
    ActivateScroll,
    /// Stop scrolling. Display RAM must be rewritten after this.
    DeactivateScroll,
}

/// An encoded command: opcode followed by `arg_count` argument bytes. The init table of a display
/// is a sequence of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandRecord {
    opcode: u8,
    arg_count: u8,
    args: [u8; MAX_ARGS],
}

impl CommandRecord {
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn args(&self) -> &[u8] {
        &self.args[..self.arg_count as usize]
    }

    /// Send the opcode and then each argument, all as command bytes.
    pub fn send<DI>(&self, tx: &mut Transaction<DI>) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        tx.command(self.opcode)?;
        for &arg in self.args() {
            tx.command(arg)?;
        }
        Ok(())
    }
}

macro_rules! ok_command {
    ($cmd:expr, [$($arg:expr),*]) => {{
        #[allow(unused_mut)]
        let mut args = [0u8; MAX_ARGS];
        #[allow(unused_mut)]
        let mut arg_count = 0u8;
        $(
            args[arg_count as usize] = $arg;
            arg_count += 1;
        )*
        Ok(CommandRecord {
            opcode: $cmd,
            arg_count,
            args,
        })
    }};
}

impl Command {
    /// Check argument ranges and produce the bytes of this command.
    pub fn encode(self) -> Result<CommandRecord, OutOfRange> {
        match self {
            Command::SetAddressingMode(mode) => ok_command!(
                0x20,
                [match mode {
                    AddressingMode::Horizontal => 0x00,
                    AddressingMode::Vertical => 0x01,
                    AddressingMode::Page => 0x02,
                }]
            ),
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=COLUMN_MAX, 0..=COLUMN_MAX) if start <= end => {
                    ok_command!(0x21, [start, end])
                }
                _ => Err(OutOfRange),
            },
            Command::SetPageAddress(start, end) => match (start, end) {
                (0..=PAGE_MAX, 0..=PAGE_MAX) if start <= end => ok_command!(0x22, [start, end]),
                _ => Err(OutOfRange),
            },
            Command::SetStartLine(line) => match line {
                0..=ROW_MAX => ok_command!(0x40 | line, []),
                _ => Err(OutOfRange),
            },
            Command::SetContrast(contrast) => ok_command!(0x81, [contrast]),
            Command::SetChargePump(ena) => ok_command!(
                0x8D,
                [match ena {
                    true => 0x14,
                    false => 0x10,
                }]
            ),
            Command::SetSegmentRemap(remap) => ok_command!(
                match remap {
                    true => 0xA1,
                    false => 0xA0,
                },
                []
            ),
            Command::SetEntireDisplayOn(on) => ok_command!(
                match on {
                    true => 0xA5,
                    false => 0xA4,
                },
                []
            ),
            Command::SetInverse(inverse) => ok_command!(
                match inverse {
                    true => 0xA7,
                    false => 0xA6,
                },
                []
            ),
            Command::SetMuxRatio(ratio) => match ratio {
                16..=NUM_ROWS => ok_command!(0xA8, [ratio - 1]),
                _ => Err(OutOfRange),
            },
            Command::SetSleepMode(ena) => ok_command!(
                match ena {
                    true => 0xAE,
                    false => 0xAF,
                },
                []
            ),
            Command::SetComScanDirection(dir) => ok_command!(
                match dir {
                    ComScanDirection::Normal => 0xC0,
                    ComScanDirection::Remapped => 0xC8,
                },
                []
            ),
            Command::SetDisplayOffset(offset) => match offset {
                0..=ROW_MAX => ok_command!(0xD3, [offset]),
                _ => Err(OutOfRange),
            },
            Command::SetClockDivide(divide, fosc) => match (divide, fosc) {
                (1..=16, 0..=15) => ok_command!(0xD5, [fosc << 4 | (divide - 1)]),
                _ => Err(OutOfRange),
            },
            Command::SetPrechargePeriod(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(0xD9, [phase_2 << 4 | phase_1]),
                _ => Err(OutOfRange),
            },
            Command::SetComPinConfig(layout, lr_remap) => {
                let alt = match layout {
                    ComPinLayout::Sequential => 0x00,
                    ComPinLayout::Alternative => 0x10,
                };
                let remap = match lr_remap {
                    true => 0x20,
                    false => 0x00,
                };
                ok_command!(0xDA, [0x02 | alt | remap])
            }
            Command::SetVcomhDeselect(level) => match level {
                0..=7 => ok_command!(0xDB, [level << 4]),
                _ => Err(OutOfRange),
            },
            Command::SetupHorizontalScroll(dir, start, end, interval) => match (start, end) {
                (0..=PAGE_MAX, 0..=PAGE_MAX) if start <= end => ok_command!(
                    match dir {
                        ScrollDirection::Right => 0x26,
                        ScrollDirection::Left => 0x27,
                    },
                    [0x00, start, interval.code(), end, 0x00, 0xFF]
                ),
                _ => Err(OutOfRange),
            },
            Command::ActivateScroll => ok_command!(0x2F, []),
            Command::DeactivateScroll => ok_command!(0x2E, []),
        }
    }

    pub fn send<DI>(self, tx: &mut Transaction<DI>) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        self.encode()?.send(tx)
    }
}
