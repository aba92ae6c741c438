//! Where drawing operations end up: straight in the controller's RAM, or in a local frame buffer
//! that is sent over in one piece later.

use core::iter;
use core::marker::PhantomData;

use itertools::iproduct;

use crate::display::addressing::{Cursor, Window};
use crate::error::Error;
use crate::interface::{DisplayInterface, Link};
use crate::size::DisplaySize;

/// How a filled byte combines with what is already in display RAM. Only a frame buffer can honor
/// `Or`; the controller's RAM cannot be read back over the two-wire bus, so `Direct` always
/// replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    Replace,
    Or,
}

/// The storage side of a `Display`. Drawing code above this trait is written once for both
/// modes.
pub trait Strategy<SIZE: DisplaySize> {
    /// Make `window` the target of subsequent writes and move the write pointer to its origin.
    fn seek<DI>(&mut self, link: &mut Link<DI>, window: Window) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface;

    /// Write `bytes` into consecutive columns of one page starting at `at`. The caller ensures
    /// they fit on the page.
    fn stream<DI>(
        &mut self,
        link: &mut Link<DI>,
        at: Cursor,
        bytes: &[u8],
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface;

    /// Set every byte of `window` to `byte`.
    fn fill<DI>(
        &mut self,
        link: &mut Link<DI>,
        window: Window,
        byte: u8,
        blend: Blend,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface;

    /// Zero the whole panel and leave the write pointer at the origin.
    fn clear<DI>(&mut self, link: &mut Link<DI>) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface;

    /// Forget what is known about the controller's address window, so the next write sets it up
    /// again.
    fn invalidate(&mut self);
}

/// Unbuffered mode. Each drawing operation is one bus transaction carrying its image data.
///
/// Consecutive text writes skip reprogramming the address window when the controller's RAM
/// pointer is known to already sit at the cursor.
#[derive(Clone, Copy, Debug, Default)]
pub struct Direct {
    pointer: Option<Cursor>,
}

impl Direct {
    pub fn new() -> Self {
        Direct { pointer: None }
    }
}

impl<SIZE: DisplaySize> Strategy<SIZE> for Direct {
    fn seek<DI>(&mut self, link: &mut Link<DI>, window: Window) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        self.pointer = None;
        link.transaction(|tx| window.program(tx))?;
        // Text wraps at the panel edge, so only a window reaching the bottom right corner keeps
        // the controller's pointer where the next glyph goes.
        if window == Window::from_cursor::<SIZE>(window.origin()) {
            self.pointer = Some(window.origin());
        }
        Ok(())
    }

    fn stream<DI>(
        &mut self,
        link: &mut Link<DI>,
        at: Cursor,
        bytes: &[u8],
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let in_place = self.pointer == Some(at);
        self.pointer = None;
        link.transaction(|tx| {
            if !in_place {
                Window::from_cursor::<SIZE>(at).program(tx)?;
            }
            tx.data_iter(bytes.iter().cloned())
        })?;
        // Past the right edge the controller wraps within its window, which is not where the
        // next cursor will be.
        let end = at.column as usize + bytes.len();
        if end < SIZE::COLUMNS as usize {
            self.pointer = Some(Cursor::new(end as u8, at.page));
        }
        Ok(())
    }

    fn fill<DI>(
        &mut self,
        link: &mut Link<DI>,
        window: Window,
        byte: u8,
        _blend: Blend,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        self.pointer = None;
        link.transaction(|tx| {
            window.program(tx)?;
            tx.data_iter(iter::repeat(byte).take(window.len()))
        })
    }

    fn clear<DI>(&mut self, link: &mut Link<DI>) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        self.pointer = None;
        let full = Window::full::<SIZE>();
        link.transaction(|tx| {
            full.program(tx)?;
            tx.data_iter(iter::repeat(0).take(SIZE::BUFFER_SIZE))
        })?;
        // A full window streamed end to end wraps the pointer back to its origin.
        self.pointer = Some(Cursor::ORIGIN);
        Ok(())
    }

    fn invalidate(&mut self) {
        self.pointer = None;
    }
}

/// Buffered mode. Drawing only touches a local copy of display RAM; `Display::flush` sends the
/// whole copy to the controller.
pub struct Buffered<SIZE: DisplaySize> {
    buffer: SIZE::Buffer,
    _size: PhantomData<SIZE>,
}

impl<SIZE: DisplaySize> Buffered<SIZE> {
    pub fn new() -> Self {
        Buffered {
            buffer: SIZE::new_buffer(),
            _size: PhantomData,
        }
    }

    /// The frame, `SIZE::BUFFER_SIZE` bytes. Byte `column + page * SIZE::COLUMNS` holds rows
    /// `page * 8` (bit 0) through `page * 8 + 7` (bit 7) of `column`.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    fn index(column: u8, page: u8) -> usize {
        column as usize + page as usize * SIZE::COLUMNS as usize
    }
}

impl<SIZE: DisplaySize> Default for Buffered<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SIZE: DisplaySize> Strategy<SIZE> for Buffered<SIZE> {
    fn seek<DI>(&mut self, _link: &mut Link<DI>, _window: Window) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        Ok(())
    }

    fn stream<DI>(
        &mut self,
        _link: &mut Link<DI>,
        at: Cursor,
        bytes: &[u8],
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let start = Self::index(at.column, at.page);
        let room = (SIZE::COLUMNS - at.column) as usize;
        let n = bytes.len().min(room);
        self.buffer.as_mut()[start..start + n].copy_from_slice(&bytes[..n]);
        Ok(())
    }

    fn fill<DI>(
        &mut self,
        _link: &mut Link<DI>,
        window: Window,
        byte: u8,
        blend: Blend,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let buffer = self.buffer.as_mut();
        for (page, column) in iproduct!(
            window.page_start..=window.page_end,
            window.col_start..=window.col_end
        ) {
            let cell = &mut buffer[Self::index(column, page)];
            *cell = match blend {
                Blend::Replace => byte,
                Blend::Or => *cell | byte,
            };
        }
        Ok(())
    }

    fn clear<DI>(&mut self, _link: &mut Link<DI>) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        for b in self.buffer.as_mut().iter_mut() {
            *b = 0;
        }
        Ok(())
    }

    fn invalidate(&mut self) {}
}
