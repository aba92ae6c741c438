//! Write position tracking.
//!
//! The controller only knows a column/page window and an auto-incrementing pointer inside it.
//! Pixel-level wrap decisions, such as keeping a glyph on one page, are made here.

use crate::command::Command;
use crate::error::{Error, OutOfRange};
use crate::interface::{DisplayInterface, Transaction};
use crate::size::DisplaySize;

/// The position the next text write starts at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub column: u8,
    pub page: u8,
}

impl Cursor {
    pub const ORIGIN: Cursor = Cursor { column: 0, page: 0 };

    pub fn new(column: u8, page: u8) -> Self {
        Cursor { column, page }
    }

    pub(crate) fn checked<SIZE: DisplaySize>(column: u8, page: u8) -> Result<Self, OutOfRange> {
        if column > SIZE::MAX_X || page > SIZE::MAX_PAGE {
            return Err(OutOfRange);
        }
        Ok(Cursor { column, page })
    }

    /// Decide where a write `width` columns wide has to start so that it lands on a single page.
    /// `None` means it fits at the cursor; otherwise the write moves to the start of the next
    /// page. Fails if there is no next page, or if the write is wider than the panel.
    pub(crate) fn placement<SIZE: DisplaySize>(
        self,
        width: u8,
    ) -> Result<Option<Cursor>, OutOfRange> {
        if width > SIZE::COLUMNS {
            return Err(OutOfRange);
        }
        if self.column as u16 + width as u16 <= SIZE::COLUMNS as u16 {
            Ok(None)
        } else if self.page < SIZE::MAX_PAGE {
            Ok(Some(Cursor::new(0, self.page + 1)))
        } else {
            Err(OutOfRange)
        }
    }

    /// The cursor after `width` columns were written at it. A write that ends at the right edge
    /// leaves the cursor on the last column, so the next write of any width wraps.
    pub(crate) fn advanced<SIZE: DisplaySize>(self, width: u8) -> Cursor {
        let column = self.column as u16 + width as u16;
        Cursor {
            column: column.min(SIZE::MAX_X as u16) as u8,
            page: self.page,
        }
    }
}

/// A rectangle of display RAM, inclusive on both ends. Streamed bytes fill it left to right,
/// then top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub col_start: u8,
    pub col_end: u8,
    pub page_start: u8,
    pub page_end: u8,
}

impl Window {
    pub fn new(col_start: u8, col_end: u8, page_start: u8, page_end: u8) -> Self {
        Window {
            col_start,
            col_end,
            page_start,
            page_end,
        }
    }

    /// The whole panel.
    pub fn full<SIZE: DisplaySize>() -> Self {
        Window::new(0, SIZE::MAX_X, 0, SIZE::MAX_PAGE)
    }

    /// From `cursor` to the bottom right corner of the panel.
    pub fn from_cursor<SIZE: DisplaySize>(cursor: Cursor) -> Self {
        Window::new(cursor.column, SIZE::MAX_X, cursor.page, SIZE::MAX_PAGE)
    }

    pub(crate) fn checked<SIZE: DisplaySize>(self) -> Result<Self, OutOfRange> {
        if self.col_start > self.col_end
            || self.page_start > self.page_end
            || self.col_end > SIZE::MAX_X
            || self.page_end > SIZE::MAX_PAGE
        {
            return Err(OutOfRange);
        }
        Ok(self)
    }

    pub fn origin(&self) -> Cursor {
        Cursor::new(self.col_start, self.page_start)
    }

    pub fn width(&self) -> usize {
        (self.col_end - self.col_start) as usize + 1
    }

    pub fn pages(&self) -> usize {
        (self.page_end - self.page_start) as usize + 1
    }

    /// Number of bytes of display RAM covered.
    pub fn len(&self) -> usize {
        self.width() * self.pages()
    }

    /// Send the column and page address commands selecting this window. This also moves the
    /// controller's RAM pointer to the window origin.
    pub(crate) fn program<DI>(&self, tx: &mut Transaction<DI>) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        Command::SetColumnAddress(self.col_start, self.col_end).send(tx)?;
        Command::SetPageAddress(self.page_start, self.page_end).send(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::{DisplaySize128x32, DisplaySize128x64};

    type S = DisplaySize128x64;

    #[test]
    fn cursor_bounds() {
        assert!(Cursor::checked::<S>(127, 7).is_ok());
        assert_eq!(Cursor::checked::<S>(128, 0), Err(OutOfRange));
        assert_eq!(Cursor::checked::<S>(0, 8), Err(OutOfRange));
        assert_eq!(Cursor::checked::<DisplaySize128x32>(0, 4), Err(OutOfRange));
    }

    #[test]
    fn placement_fits() {
        assert_eq!(Cursor::new(0, 0).placement::<S>(6), Ok(None));
        // Ends exactly on the last column.
        assert_eq!(Cursor::new(122, 3).placement::<S>(6), Ok(None));
        assert_eq!(Cursor::new(0, 7).placement::<S>(128), Ok(None));
    }

    #[test]
    fn placement_wraps() {
        assert_eq!(
            Cursor::new(123, 3).placement::<S>(6),
            Ok(Some(Cursor::new(0, 4)))
        );
        assert_eq!(
            Cursor::new(120, 0).placement::<S>(11),
            Ok(Some(Cursor::new(0, 1)))
        );
    }

    #[test]
    fn placement_fails_on_last_page() {
        assert_eq!(Cursor::new(123, 7).placement::<S>(6), Err(OutOfRange));
        assert_eq!(
            Cursor::new(123, 3).placement::<DisplaySize128x32>(6),
            Err(OutOfRange)
        );
    }

    #[test]
    fn placement_rejects_oversize() {
        assert_eq!(Cursor::new(0, 0).placement::<S>(129), Err(OutOfRange));
    }

    #[test]
    fn advanced_parks_at_edge() {
        assert_eq!(Cursor::new(10, 2).advanced::<S>(6), Cursor::new(16, 2));
        assert_eq!(Cursor::new(122, 2).advanced::<S>(6), Cursor::new(127, 2));
    }

    #[test]
    fn window_geometry() {
        let w = Window::new(10, 19, 2, 4);
        assert_eq!(w.width(), 10);
        assert_eq!(w.pages(), 3);
        assert_eq!(w.len(), 30);
        assert_eq!(w.origin(), Cursor::new(10, 2));
        assert_eq!(Window::full::<S>().len(), S::BUFFER_SIZE);
        assert_eq!(
            Window::from_cursor::<S>(Cursor::new(5, 1)),
            Window::new(5, 127, 1, 7)
        );
    }

    #[test]
    fn window_bounds() {
        assert!(Window::new(0, 127, 0, 7).checked::<S>().is_ok());
        assert_eq!(Window::new(5, 4, 0, 0).checked::<S>(), Err(OutOfRange));
        assert_eq!(Window::new(0, 0, 3, 2).checked::<S>(), Err(OutOfRange));
        assert_eq!(Window::new(0, 128, 0, 0).checked::<S>(), Err(OutOfRange));
        assert_eq!(
            Window::new(0, 127, 0, 4).checked::<DisplaySize128x32>(),
            Err(OutOfRange)
        );
    }
}
