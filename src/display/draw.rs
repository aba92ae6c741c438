//! Drawing operations. Everything here is written against `Strategy`, so it behaves the same on a
//! `Direct` and a `Buffered` display apart from when the result reaches the panel.

use crate::display::addressing::{Cursor, Window};
use crate::display::line::Line;
use crate::display::strategy::{Blend, Strategy};
use crate::display::{Display, PixelCoord};
use crate::error::{Error, OutOfRange};
use crate::font::{self, TextStyle, CHAR_WIDTH};
use crate::interface::DisplayInterface;
use crate::size::DisplaySize;

pub mod rule {
    //! Byte patterns for `Display::draw_horizontal_run`. Bit 0 is the top row of the page.

    pub const TOP: u8 = 0x01;
    pub const TOP_DOUBLE: u8 = 0x03;
    pub const MIDDLE: u8 = 0x08;
    pub const MIDDLE_DOUBLE: u8 = 0x18;
    pub const BOTTOM: u8 = 0x80;
    pub const BOTTOM_DOUBLE: u8 = 0xC0;
    pub const SOLID: u8 = 0xFF;
}

const UNDERLINE_MASK: u8 = 0x80;
const MAX_CELL: usize = 2 * CHAR_WIDTH as usize + 1;

impl<DI, SIZE, MODE> Display<DI, SIZE, MODE>
where
    DI: DisplayInterface,
    SIZE: DisplaySize,
    MODE: Strategy<SIZE>,
{
    /// Blank the whole panel and move the cursor home. On a `Buffered` display only the frame
    /// buffer is cleared.
    pub fn clear(&mut self) -> Result<(), Error<DI::Error>> {
        self.mode.clear(&mut self.link)?;
        self.move_cursor(Cursor::ORIGIN);
        Ok(())
    }

    /// Blank one page and move the cursor to its start.
    pub fn clear_page(&mut self, page: u8) -> Result<(), Error<DI::Error>> {
        let window = Window::new(0, SIZE::MAX_X, page, page).checked::<SIZE>()?;
        self.mode
            .fill(&mut self.link, window, 0x00, Blend::Replace)?;
        self.move_cursor(window.origin());
        Ok(())
    }

    /// Blank pages `page` through the last, leaving `margin` columns untouched on both sides, and
    /// move the cursor to the top left of the blanked area.
    pub fn clear_page_from(&mut self, page: u8, margin: u8) -> Result<(), Error<DI::Error>> {
        if margin as u16 * 2 > SIZE::MAX_X as u16 {
            return Err(Error::OutOfRange);
        }
        let window =
            Window::new(margin, SIZE::MAX_X - margin, page, SIZE::MAX_PAGE).checked::<SIZE>()?;
        self.mode
            .fill(&mut self.link, window, 0x00, Blend::Replace)?;
        self.move_cursor(window.origin());
        Ok(())
    }

    /// Turn on the pixel at `at`. Pixels already on stay on; on a `Direct` display the rest of the
    /// 8-pixel column byte is overwritten, since display RAM cannot be read back.
    pub fn draw_pixel(&mut self, at: PixelCoord) -> Result<(), Error<DI::Error>> {
        let (column, page, bit) = locate::<SIZE>(at)?;
        let cell = Window::new(column, column, page, page);
        self.mode.fill(&mut self.link, cell, bit, Blend::Or)
    }

    /// Draw a straight line between two pixels, both ends included. Both ends are checked before
    /// anything is drawn.
    pub fn draw_line(&mut self, from: PixelCoord, to: PixelCoord) -> Result<(), Error<DI::Error>> {
        let (x1, page, bit) = locate::<SIZE>(from)?;
        let (x2, _, _) = locate::<SIZE>(to)?;
        if from.1 == to.1 {
            // One run of identical bytes on a single page.
            let run = Window::new(x1.min(x2), x1.max(x2), page, page);
            return self.mode.fill(&mut self.link, run, bit, Blend::Or);
        }
        for pixel in Line::new(from, to) {
            self.draw_pixel(pixel)?;
        }
        Ok(())
    }

    /// Draw one character at the cursor and advance the cursor past it and its separator column.
    /// A character that does not fit on the rest of the page starts on the next page instead.
    /// If sending it fails, the cursor is left where it was before the call.
    pub fn draw_char(&mut self, c: char, style: TextStyle) -> Result<(), Error<DI::Error>> {
        let glyph = font::glyph(c).ok_or(Error::UnsupportedChar(c))?;
        let width = style.cell_width();
        let (before, parked) = (self.cursor, self.parked);
        self.advance_for_write(width)?;

        let mask = if style.is_underline() {
            UNDERLINE_MASK
        } else {
            0
        };
        let strokes = if style.is_bold() { 2 } else { 1 };
        let mut cell = [0u8; MAX_CELL];
        let mut len = 0;
        for column in glyph.iter() {
            for _ in 0..strokes {
                cell[len] = column | mask;
                len += 1;
            }
        }
        cell[len] = mask;
        len += 1;

        let at = self.cursor;
        if let Err(e) = self.mode.stream(&mut self.link, at, &cell[..len]) {
            self.cursor = before;
            self.parked = parked;
            return Err(e);
        }
        self.cursor = at.advanced::<SIZE>(width);
        self.parked = at.column as u16 + width as u16 >= SIZE::COLUMNS as u16;
        Ok(())
    }

    /// Draw `text` one character at a time. Stops at the first character that fails; the ones
    /// before it stay drawn.
    pub fn draw_string(&mut self, text: &str, style: TextStyle) -> Result<(), Error<DI::Error>> {
        for c in text.chars() {
            self.draw_char(c, style)?;
        }
        Ok(())
    }

    /// Fill columns `x_start..x_end` of `page` with `pattern`, typically one of the `rule`
    /// constants. The cursor does not move.
    pub fn draw_horizontal_run(
        &mut self,
        page: u8,
        x_start: u8,
        x_end: u8,
        pattern: u8,
    ) -> Result<(), Error<DI::Error>> {
        if x_start > x_end || x_end > SIZE::COLUMNS || page > SIZE::MAX_PAGE {
            return Err(Error::OutOfRange);
        }
        if x_start == x_end {
            return Ok(());
        }
        let run = Window::new(x_start, x_end - 1, page, page);
        self.mode.fill(&mut self.link, run, pattern, Blend::Or)
    }

    /// Fill column `x` solid over pages `page_start..=page_start + height`. The cursor does not
    /// move.
    pub fn draw_vertical_run(
        &mut self,
        x: u8,
        page_start: u8,
        height: u8,
    ) -> Result<(), Error<DI::Error>> {
        if x > SIZE::MAX_X || page_start as u16 + height as u16 > SIZE::MAX_PAGE as u16 {
            return Err(Error::OutOfRange);
        }
        let run = Window::new(x, x, page_start, page_start + height);
        self.mode.fill(&mut self.link, run, rule::SOLID, Blend::Or)
    }
}

/// Column, page, and bit mask within the page byte of a pixel.
fn locate<SIZE: DisplaySize>(at: PixelCoord) -> Result<(u8, u8, u8), OutOfRange> {
    if at.0 < 0 || at.1 < 0 || at.0 > SIZE::MAX_X as i16 || at.1 > SIZE::MAX_Y as i16 {
        return Err(OutOfRange);
    }
    let y = at.1 as u8;
    Ok((at.0 as u8, y / 8, 1 << (y % 8)))
}
