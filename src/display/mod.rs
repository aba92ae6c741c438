//! The main API to the display driver. A `Display` owns the interface, tracks the text cursor,
//! and renders through one of two storage modes: `Direct` or `Buffered`.


mod addressing;
mod draw;
mod line;
mod strategy;

pub use self::addressing::{Cursor, Window};
pub use self::draw::rule;
pub use self::line::Line;
pub use self::strategy::{Blend, Buffered, Direct, Strategy};

use core::marker::PhantomData;

use crate::command::consts::DEFAULT_ADDRESS;
use crate::command::{Command, ScrollDirection, ScrollInterval};
use crate::config::Config;
use crate::error::Error;
use crate::interface::{DisplayInterface, Link};
use crate::size::DisplaySize;

/// A pixel coordinate pair of `column` and `row`. `column` must be in the range [0,
/// `DisplaySize::MAX_X`], and `row` must be in the range [0, `DisplaySize::MAX_Y`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelCoord(pub i16, pub i16);

/// A driver for an SSD1306 display of geometry `SIZE`, attached through `DI`, rendering through
/// `MODE`.
pub struct Display<DI, SIZE, MODE> {
    link: Link<DI>,
    config: Config,
    cursor: Cursor,
    /// The last character ended on the right edge, so the cursor column is already written.
    parked: bool,
    mode: MODE,
    _size: PhantomData<SIZE>,
}

impl<DI, SIZE> Display<DI, SIZE, Direct>
where
    DI: DisplayInterface,
    SIZE: DisplaySize,
{
    /// Construct a driver that writes every drawing operation straight to the display connected
    /// to `iface`.
    pub fn new(iface: DI, _size: SIZE) -> Self {
        Display::with_mode(iface, Direct::new())
    }
}

impl<DI, SIZE> Display<DI, SIZE, Buffered<SIZE>>
where
    DI: DisplayInterface,
    SIZE: DisplaySize,
{
    /// Construct a driver that draws into a zeroed local frame buffer. Nothing drawn is visible
    /// until `flush`.
    pub fn new_buffered(iface: DI, _size: SIZE) -> Self {
        Display::with_mode(iface, Buffered::new())
    }

    /// Send the entire frame buffer to the display in one transaction.
    pub fn flush(&mut self) -> Result<(), Error<DI::Error>> {
        let frame = self.mode.as_bytes();
        let full = Window::full::<SIZE>();
        trace!("flush {=usize} bytes", frame.len());
        self.link.transaction(|tx| {
            full.program(tx)?;
            tx.data_iter(frame.iter().cloned())
        })
    }

    /// The frame buffer contents. See `Buffered::as_bytes` for the layout.
    pub fn buffer(&self) -> &[u8] {
        self.mode.as_bytes()
    }
}

impl<DI, SIZE, MODE> Display<DI, SIZE, MODE>
where
    DI: DisplayInterface,
    SIZE: DisplaySize,
    MODE: Strategy<SIZE>,
{
    fn with_mode(iface: DI, mode: MODE) -> Self {
        Display {
            link: Link::new(iface, DEFAULT_ADDRESS),
            config: Config::new(),
            cursor: Cursor::ORIGIN,
            parked: false,
            mode,
            _size: PhantomData,
        }
    }

    /// Initialize the display with a config. The configuration is checked in full before anything
    /// is sent; afterwards every later transaction goes to the configured bus address.
    pub fn init(&mut self, config: &Config) -> Result<(), Error<DI::Error>> {
        let table = config.init_table::<SIZE>()?;
        self.link.set_address(config.bus_address());
        self.config = *config;
        self.mode.invalidate();
        debug!(
            "init {=u8}x{=u8} display at {=u8:#x}",
            SIZE::COLUMNS,
            SIZE::PAGES * 8,
            config.bus_address()
        );
        self.link.transaction(|tx| {
            for record in table.records() {
                record.send(tx)?;
            }
            Ok(())
        })?;
        self.move_cursor(Cursor::ORIGIN);
        Ok(())
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.link.release()
    }

    /// The position the next character will be drawn at, unless it has to wrap.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Move the cursor. On a `Direct` display this also points the controller's address window at
    /// the cursor, spanning to the bottom right corner of the panel.
    pub fn set_cursor(&mut self, column: u8, page: u8) -> Result<(), Error<DI::Error>> {
        let cursor = Cursor::checked::<SIZE>(column, page)?;
        self.mode
            .seek(&mut self.link, Window::from_cursor::<SIZE>(cursor))?;
        self.move_cursor(cursor);
        Ok(())
    }

    /// Program a rectangle as the controller's address window and move the cursor to its top
    /// left. Text drawn afterwards starts there and wraps at the panel edge like any other text;
    /// the next drawing operation reprograms the window as it needs.
    pub fn set_window(
        &mut self,
        col_start: u8,
        col_end: u8,
        page_start: u8,
        page_end: u8,
    ) -> Result<(), Error<DI::Error>> {
        let window = Window::new(col_start, col_end, page_start, page_end).checked::<SIZE>()?;
        self.mode.seek(&mut self.link, window)?;
        self.move_cursor(window.origin());
        Ok(())
    }

    /// Make room for a write of `width` columns at the cursor. If it would cross the right edge,
    /// the cursor moves to the start of the next page; on the last page this fails and the cursor
    /// stays where it was. After a character that ended on the right edge, every write wraps.
    pub fn advance_for_write(&mut self, width: u8) -> Result<(), Error<DI::Error>> {
        let width = if self.parked {
            width.max(SIZE::COLUMNS)
        } else {
            width
        };
        match self.cursor.placement::<SIZE>(width)? {
            None => Ok(()),
            Some(next) => self.set_cursor(next.column, next.page),
        }
    }

    /// Control sleep mode.
    pub fn sleep(&mut self, enabled: bool) -> Result<(), Error<DI::Error>> {
        self.command(Command::SetSleepMode(enabled))
    }

    /// Control the contrast.
    pub fn contrast(&mut self, contrast: u8) -> Result<(), Error<DI::Error>> {
        self.command(Command::SetContrast(contrast))
    }

    /// Invert the display polarity without touching display RAM.
    pub fn set_inverse(&mut self, inverse: bool) -> Result<(), Error<DI::Error>> {
        self.command(Command::SetInverse(inverse))
    }

    /// Set the vertical pan.
    ///
    /// This uses the `Command::SetStartLine` feature to shift the display RAM row shown on the
    /// first panel row, rolling the image upwards by `line` rows.
    pub fn vertical_pan(&mut self, line: u8) -> Result<(), Error<DI::Error>> {
        self.command(Command::SetStartLine(line))
    }

    /// Start the controller scrolling pages `start..=end` horizontally on its own, at the
    /// interval set in the `Config` used for `init`.
    pub fn scroll_horizontal(
        &mut self,
        direction: ScrollDirection,
        start: u8,
        end: u8,
    ) -> Result<(), Error<DI::Error>> {
        let interval = self.config.default_scroll_interval();
        self.scroll_horizontal_at(direction, start, end, interval)
    }

    /// Like `scroll_horizontal` with an explicit step interval.
    pub fn scroll_horizontal_at(
        &mut self,
        direction: ScrollDirection,
        start: u8,
        end: u8,
        interval: ScrollInterval,
    ) -> Result<(), Error<DI::Error>> {
        if end > SIZE::MAX_PAGE {
            return Err(Error::OutOfRange);
        }
        let setup = Command::SetupHorizontalScroll(direction, start, end, interval).encode()?;
        let stop = Command::DeactivateScroll.encode()?;
        let go = Command::ActivateScroll.encode()?;
        trace!("scroll pages {=u8}..={=u8}", start, end);
        self.link.transaction(|tx| {
            stop.send(tx)?;
            setup.send(tx)?;
            go.send(tx)
        })
    }

    /// Stop scrolling. The controller leaves display RAM in an undefined state, so redraw
    /// afterwards.
    pub fn stop_scroll(&mut self) -> Result<(), Error<DI::Error>> {
        self.command(Command::DeactivateScroll)?;
        self.mode.invalidate();
        Ok(())
    }

    fn move_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.parked = false;
    }

    /// Send one command in its own transaction. Arguments are checked before the bus is touched.
    fn command(&mut self, cmd: Command) -> Result<(), Error<DI::Error>> {
        let record = cmd.encode()?;
        self.link.transaction(|tx| record.send(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ComScanDirection;
    use crate::interface::test_spy::{Sent, TestSpyInterface};
    use crate::size::{DisplaySize128x32, DisplaySize128x64};

    #[test]
    fn init_defaults() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        disp.init(&Config::new()).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0xAE, // sleep enable
            0xA8, 63, // mux ratio 64 lines
            0x20, 0x00, // horizontal addressing
            0x21, 0, 127, // column window
            0x22, 0, 7, // page window
            0x40, // start line 0
            0xD3, 0, // display offset 0
            0xA1, // segment remap
            0xC8, // com scan remapped
            0xDA, 0x12, // alternative com pins
            0x81, 0x7F, // contrast
            0xA4, // follow RAM
            0xA6, // display normal
            0xD5, 0x80, // clock
            0xD9, 0xC2, // precharge
            0xDB, 0x20, // vcomh deselect
            0x8D, 0x14, // charge pump
            0x2E, // scroll off
            0xAF // sleep disable
        ));
        assert_eq!(di.transactions(), 1);
        assert_eq!(di.last_address(), Some(0x3C));
        assert_eq!(disp.cursor(), Cursor::ORIGIN);
    }

    #[test]
    fn init_many_options() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x32);
        let cfg = Config::new()
            .address(0x3D)
            .contrast(0xCF)
            .clock_divide(1, 15)
            .precharge_period(1, 15)
            .com_scan_direction(ComScanDirection::Normal)
            .charge_pump(false);
        disp.init(&cfg).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0xAE, // sleep enable
            0xA8, 31, // mux ratio 32 lines
            0x20, 0x00, // horizontal addressing
            0x21, 0, 127, // column window
            0x22, 0, 3, // page window
            0x40, // start line 0
            0xD3, 0, // display offset 0
            0xA1, // segment remap
            0xC0, // com scan normal
            0xDA, 0x02, // sequential com pins
            0x81, 0xCF, // contrast
            0xA4, // follow RAM
            0xA6, // display normal
            0xD5, 0xF0, // clock
            0xD9, 0xF1, // precharge
            0xDB, 0x20, // vcomh deselect
            0x8D, 0x10, // charge pump off
            0x2E, // scroll off
            0xAF // sleep disable
        ));
        assert_eq!(di.last_address(), Some(0x3D));
    }

    #[test]
    fn init_bad_config_sends_nothing() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        let cfg = Config::new().clock_divide(0, 8);
        assert_eq!(disp.init(&cfg), Err(Error::OutOfRange));
        assert_eq!(di.transactions(), 0);
    }

    #[test]
    fn init_transport_failure_stops_early() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        // Transaction start plus three bytes.
        di.fail_after(4);
        assert_eq!(disp.init(&Config::new()), Err(Error::Transport(())));
        di.check_multi(sends!(0xAE, 0xA8, 63));
        assert!(!di.is_open());
    }

    #[test]
    fn control_commands() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        disp.set_inverse(true).unwrap();
        disp.set_inverse(false).unwrap();
        disp.sleep(true).unwrap();
        disp.contrast(0x10).unwrap();
        disp.vertical_pan(8).unwrap();
        di.check_multi(sends!(0xA7, 0xA6, 0xAE, 0x81, 0x10, 0x48));
        assert_eq!(di.transactions(), 5);
        assert_eq!(disp.vertical_pan(64), Err(Error::OutOfRange));
        assert_eq!(di.transactions(), 5);
    }

    #[test]
    fn scroll() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        disp.init(&Config::new()).unwrap();
        let mut di = di;
        di.clear();
        disp.scroll_horizontal(ScrollDirection::Right, 0, 7).unwrap();
        disp.stop_scroll().unwrap();
        disp.scroll_horizontal_at(ScrollDirection::Left, 2, 3, ScrollInterval::Frames2)
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0x2E,
            0x26, 0x00, 0, 0x00, 7, 0x00, 0xFF,
            0x2F,
            0x2E,
            0x2E,
            0x27, 0x00, 2, 0x07, 3, 0x00, 0xFF,
            0x2F
        ));
        assert_eq!(di.transactions(), 3);
    }

    #[test]
    fn scroll_checks_panel_pages() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x32);
        assert_eq!(
            disp.scroll_horizontal(ScrollDirection::Left, 0, 4),
            Err(Error::OutOfRange)
        );
        assert_eq!(
            disp.scroll_horizontal(ScrollDirection::Left, 3, 1),
            Err(Error::OutOfRange)
        );
        assert_eq!(di.transactions(), 0);
    }

    #[test]
    fn set_cursor_programs_window() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        disp.set_cursor(5, 2).unwrap();
        di.check_multi(sends!(0x21, 5, 127, 0x22, 2, 7));
        assert_eq!(disp.cursor(), Cursor::new(5, 2));

        assert_eq!(disp.set_cursor(128, 0), Err(Error::OutOfRange));
        assert_eq!(disp.set_cursor(0, 8), Err(Error::OutOfRange));
        assert_eq!(disp.cursor(), Cursor::new(5, 2));
        assert_eq!(di.transactions(), 1);
    }

    #[test]
    fn set_window_programs_rectangle() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x32);
        disp.set_window(10, 20, 1, 2).unwrap();
        di.check_multi(sends!(0x21, 10, 20, 0x22, 1, 2));
        assert_eq!(disp.cursor(), Cursor::new(10, 1));
        assert_eq!(disp.set_window(10, 20, 1, 4), Err(Error::OutOfRange));
        assert_eq!(disp.set_window(20, 10, 1, 1), Err(Error::OutOfRange));
        assert_eq!(disp.cursor(), Cursor::new(10, 1));
    }

    #[test]
    fn buffered_cursor_moves_are_silent() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new_buffered(di.split(), DisplaySize128x64);
        disp.set_cursor(100, 7).unwrap();
        disp.set_window(0, 10, 3, 4).unwrap();
        assert_eq!(disp.cursor(), Cursor::new(0, 3));
        assert_eq!(di.transactions(), 0);
    }

    #[test]
    fn advance_for_write_wraps() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        disp.set_cursor(120, 0).unwrap();
        let mut di = di;
        di.clear();

        disp.advance_for_write(8).unwrap();
        assert_eq!(di.transactions(), 0);
        assert_eq!(disp.cursor(), Cursor::new(120, 0));

        disp.advance_for_write(9).unwrap();
        di.check_multi(sends!(0x21, 0, 127, 0x22, 1, 7));
        assert_eq!(disp.cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn advance_for_write_fails_on_last_page() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        disp.set_cursor(125, 7).unwrap();
        let mut di = di;
        di.clear();
        assert_eq!(disp.advance_for_write(6), Err(Error::OutOfRange));
        assert_eq!(disp.cursor(), Cursor::new(125, 7));
        assert_eq!(di.transactions(), 0);
    }

    #[test]
    fn flush_sends_whole_frame() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new_buffered(di.split(), DisplaySize128x32);
        disp.init(&Config::new()).unwrap();
        let mut di = di;
        di.clear();
        disp.flush().unwrap();
        let sent = di.sent();
        assert_eq!(&sent[..6], sends!(0x21, 0, 127, 0x22, 0, 3));
        assert_eq!(sent[6], Sent::Data(vec![0; 512]));
        assert_eq!(sent.len(), 7);
        assert_eq!(di.transactions(), 1);
    }

    #[test]
    fn failed_flush_keeps_frame() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new_buffered(di.split(), DisplaySize128x32);
        disp.draw_pixel(PixelCoord(3, 9)).unwrap();
        disp.set_cursor(40, 2).unwrap();
        let frame = disp.buffer().to_vec();
        // The window and three frame bytes go out, then the bus fails.
        di.fail_after(10);
        assert_eq!(disp.flush(), Err(Error::Transport(())));
        assert!(!di.is_open());
        assert_eq!(di.transactions(), 1);
        assert_eq!(di.data_bytes(), vec![0, 0, 0]);
        assert_eq!(disp.buffer(), &frame[..]);
        assert_eq!(disp.cursor(), Cursor::new(40, 2));
    }

    #[test]
    fn release_returns_interface() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), DisplaySize128x64);
        disp.sleep(false).unwrap();
        let released = disp.release();
        released.check_multi(sends!(0xAF));
    }
}
