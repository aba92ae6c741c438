//! Panel geometries.
//!
//! The SSD1306 drives at most 128 columns by 64 rows, but modules are sold with smaller glass.
//! Each geometry is a zero-sized type so that the frame buffer of a `Buffered` display can be a
//! plain array of exactly the right length.

use crate::command::ComPinLayout;

/// The addressable geometry of a panel. One byte of display RAM covers 8 vertically stacked
/// pixels in one column of one page.
pub trait DisplaySize {
    /// Addressable horizontal pixel count.
    const COLUMNS: u8;
    /// Number of 8-pixel-tall horizontal bands.
    const PAGES: u8;
    /// How the module wires COM lines to panel rows.
    const COM_PIN_LAYOUT: ComPinLayout;

    /// Largest valid pixel column.
    const MAX_X: u8 = Self::COLUMNS - 1;
    /// Largest valid pixel row.
    const MAX_Y: u8 = Self::PAGES * 8 - 1;
    /// Largest valid page.
    const MAX_PAGE: u8 = Self::PAGES - 1;
    /// Size in bytes of a full frame.
    const BUFFER_SIZE: usize = Self::COLUMNS as usize * Self::PAGES as usize;

    /// Frame buffer storage, `BUFFER_SIZE` bytes long.
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// A zeroed frame buffer.
    fn new_buffer() -> Self::Buffer;
}

/// 128x64 pixels, the common 0.96" module.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplaySize128x64;

impl DisplaySize for DisplaySize128x64 {
    const COLUMNS: u8 = 128;
    const PAGES: u8 = 8;
    const COM_PIN_LAYOUT: ComPinLayout = ComPinLayout::Alternative;
    type Buffer = [u8; 128 * 8];

    fn new_buffer() -> Self::Buffer {
        [0; 128 * 8]
    }
}

/// 128x32 pixels, the common 0.91" module.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplaySize128x32;

impl DisplaySize for DisplaySize128x32 {
    const COLUMNS: u8 = 128;
    const PAGES: u8 = 4;
    const COM_PIN_LAYOUT: ComPinLayout = ComPinLayout::Sequential;
    type Buffer = [u8; 128 * 4];

    fn new_buffer() -> Self::Buffer {
        [0; 128 * 4]
    }
}

/// 96x16 pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplaySize96x16;

impl DisplaySize for DisplaySize96x16 {
    const COLUMNS: u8 = 96;
    const PAGES: u8 = 2;
    const COM_PIN_LAYOUT: ComPinLayout = ComPinLayout::Sequential;
    type Buffer = [u8; 96 * 2];

    fn new_buffer() -> Self::Buffer {
        [0; 96 * 2]
    }
}
