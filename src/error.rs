//! Error types returned by the driver.

use core::fmt;

/// A command argument, coordinate, window, or text position lies outside what the controller or
/// the panel can address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange;

/// Every fallible driver operation returns this. `E` is the error type of the
/// `DisplayInterface` the display is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transport failed to deliver a byte (no acknowledge, arbitration lost, bus
    /// busy...). The inner value is whatever the transport reported.
    Transport(E),
    /// A coordinate, window, command argument, or text wrap destination exceeds the geometry.
    OutOfRange,
    /// The font has no glyph for this character.
    UnsupportedChar(char),
}

impl<E> From<OutOfRange> for Error<E> {
    fn from(_: OutOfRange) -> Self {
        Error::OutOfRange
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "display transport failed: {:?}", e),
            Error::OutOfRange => f.write_str("position out of display range"),
            Error::UnsupportedChar(c) => write!(f, "no glyph for character {:?}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn out_of_range_converts() {
        let e: Error<()> = OutOfRange.into();
        assert_eq!(e, Error::OutOfRange);
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::<u8>::Transport(0x20).to_string(),
            "display transport failed: 32"
        );
        assert_eq!(
            Error::<()>::UnsupportedChar('é').to_string(),
            "no glyph for character 'é'"
        );
    }
}
