//! Driver library for the Solomon Systech SSD1306 dot matrix OLED display controller, attached
//! over the two-wire (I2C) bus.
//!
//! The driver works in one of two modes. A `Direct` display writes every drawing operation
//! straight through to the controller's display RAM. A `Buffered` display keeps a full copy of
//! the display RAM locally and only touches the bus on `Display::flush`, trading
//! `DisplaySize::BUFFER_SIZE` bytes of RAM for far fewer bus transactions.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate core;

extern crate embedded_hal as hal;
extern crate itertools;

#[macro_use]
mod fmt;

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod interface;
pub mod size;

// Re-exports for primary API.
pub use command::{consts, ComScanDirection, ScrollDirection, ScrollInterval};
pub use config::Config;
pub use display::{rule, Buffered, Cursor, Direct, Display, PixelCoord, Window};
pub use error::{Error, OutOfRange};
pub use font::TextStyle;
pub use interface::i2c::I2cInterface;
pub use size::{DisplaySize, DisplaySize128x32, DisplaySize128x64, DisplaySize96x16};
