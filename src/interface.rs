//! The bus-level transport to the display controller.
//!
//! The SSD1306 tells command bytes from display RAM bytes by a control byte that precedes them on
//! the wire. Drivers talk to a `DisplayInterface` in terms of whole transactions made of tagged
//! bytes, and the interface implementation is responsible for producing the control bytes.

use crate::error::Error;

/// Whether a byte is part of a command (opcode or argument) or display RAM data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteKind {
    Command,
    Data,
}

pub trait DisplayInterface {
    type Error;

    /// Open a write transaction to the device at 7-bit bus address `address`.
    fn begin_write(&mut self, address: u8) -> Result<(), Self::Error>;
    /// Send one byte inside the open transaction.
    fn send_byte(&mut self, kind: ByteKind, byte: u8) -> Result<(), Self::Error>;
    /// Close the open transaction.
    fn end_write(&mut self) -> Result<(), Self::Error>;
}

/// A `DisplayInterface` bound to the bus address of one display.
pub struct Link<DI> {
    iface: DI,
    address: u8,
}

impl<DI> Link<DI>
where
    DI: DisplayInterface,
{
    pub fn new(iface: DI, address: u8) -> Self {
        Self { iface, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub(crate) fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }

    /// Run `body` inside exactly one bus transaction.
    ///
    /// If `begin_write` fails, `body` is never run. If `body` fails, the transaction is still
    /// closed so the bus is released, and the first failure is returned.
    pub fn transaction<F, T>(&mut self, body: F) -> Result<T, Error<DI::Error>>
    where
        F: FnOnce(&mut Transaction<DI>) -> Result<T, Error<DI::Error>>,
    {
        self.iface
            .begin_write(self.address)
            .map_err(Error::Transport)?;
        let result = body(&mut Transaction {
            iface: &mut self.iface,
        });
        let closed = self.iface.end_write().map_err(Error::Transport);
        let value = result?;
        closed?;
        Ok(value)
    }
}

/// Handle to an open transaction, only obtainable from `Link::transaction`.
pub struct Transaction<'a, DI> {
    iface: &'a mut DI,
}

impl<'a, DI> Transaction<'a, DI>
where
    DI: DisplayInterface,
{
    /// Send a command opcode or command argument byte.
    pub fn command(&mut self, byte: u8) -> Result<(), Error<DI::Error>> {
        self.iface
            .send_byte(ByteKind::Command, byte)
            .map_err(Error::Transport)
    }

    /// Send a display RAM byte.
    pub fn data(&mut self, byte: u8) -> Result<(), Error<DI::Error>> {
        self.iface
            .send_byte(ByteKind::Data, byte)
            .map_err(Error::Transport)
    }

    /// Send display RAM bytes, stopping at the first failure.
    pub fn data_iter<I>(&mut self, bytes: I) -> Result<(), Error<DI::Error>>
    where
        I: IntoIterator<Item = u8>,
    {
        for byte in bytes {
            self.data(byte)?;
        }
        Ok(())
    }
}

pub mod i2c {
    //! The two-wire interface. Every command byte goes on the wire as a `[0x80, cmd]` pair, so
    //! commands can be batched back to back. A run of display RAM bytes is introduced by a single
    //! `0x40`, after which the controller treats every byte as data until the bus STOP.
    //!
    //! `embedded_hal` 0.2 I2C writes are whole START..STOP transfers, so bytes are staged in a
    //! small chunk and each full chunk becomes one transfer. A data run that spans chunks
    //! repeats its `0x40` at the head of the next chunk.

    use core::mem;

    use super::{ByteKind, DisplayInterface};
    use crate::command::consts::{CONTROL_COMMAND, CONTROL_DATA_STREAM};

    const CHUNK_LEN: usize = 32;

    pub struct I2cInterface<I2C> {
        /// The I2C master the SSD1306 is attached to.
        i2c: I2C,
        address: u8,
        chunk: [u8; CHUNK_LEN],
        len: usize,
        /// Whether the staged chunk ends inside a data run.
        in_data_run: bool,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        /// Create a new two-wire interface on the I2C master `i2c`. The device address is
        /// supplied per transaction by the display.
        pub fn new(i2c: I2C) -> Self {
            Self {
                i2c,
                address: 0,
                chunk: [0; CHUNK_LEN],
                len: 0,
                in_data_run: false,
            }
        }

        /// Give back the I2C master.
        pub fn release(self) -> I2C {
            self.i2c
        }

        /// Write out the staged chunk. The chunk is dropped even if the write fails, so a later
        /// `end_write` never sends it a second time.
        fn flush(&mut self) -> Result<(), I2C::Error> {
            let len = mem::replace(&mut self.len, 0);
            self.in_data_run = false;
            if len > 0 {
                self.i2c.write(self.address, &self.chunk[..len])?;
            }
            Ok(())
        }

        /// Stage bytes, flushing first if they would not fit.
        fn stage(&mut self, bytes: &[u8]) -> Result<(), I2C::Error> {
            if self.len + bytes.len() > CHUNK_LEN {
                self.flush()?;
            }
            self.chunk[self.len..self.len + bytes.len()].copy_from_slice(bytes);
            self.len += bytes.len();
            Ok(())
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        type Error = I2C::Error;

        fn begin_write(&mut self, address: u8) -> Result<(), Self::Error> {
            self.address = address;
            self.len = 0;
            self.in_data_run = false;
            Ok(())
        }

        fn send_byte(&mut self, kind: ByteKind, byte: u8) -> Result<(), Self::Error> {
            match kind {
                ByteKind::Command => {
                    // A data run swallows everything after it, so close it first.
                    if self.in_data_run {
                        self.flush()?;
                    }
                    self.stage(&[CONTROL_COMMAND, byte])
                }
                ByteKind::Data => {
                    if self.in_data_run && self.len == CHUNK_LEN {
                        self.flush()?;
                    }
                    if self.in_data_run {
                        self.stage(&[byte])
                    } else {
                        self.stage(&[CONTROL_DATA_STREAM, byte])?;
                        self.in_data_run = true;
                        Ok(())
                    }
                }
            }
        }

        fn end_write(&mut self) -> Result<(), Self::Error> {
            self.flush()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::error::Error;
        use crate::interface::Link;
        use std::vec::Vec;

        struct MockI2c {
            writes: Vec<(u8, Vec<u8>)>,
            attempts: usize,
            fail: bool,
            fail_once: bool,
        }

        impl hal::blocking::i2c::Write for MockI2c {
            type Error = ();

            fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), ()> {
                self.attempts += 1;
                if self.fail_once {
                    self.fail_once = false;
                    return Err(());
                }
                if self.fail {
                    return Err(());
                }
                self.writes.push((address, bytes.to_vec()));
                Ok(())
            }
        }

        fn mock() -> MockI2c {
            MockI2c {
                writes: Vec::new(),
                attempts: 0,
                fail: false,
                fail_once: false,
            }
        }

        #[test]
        fn commands_are_prefixed_and_batched() {
            let mut iface = I2cInterface::new(mock());
            iface.begin_write(0x3C).unwrap();
            iface.send_byte(ByteKind::Command, 0x21).unwrap();
            iface.send_byte(ByteKind::Command, 0).unwrap();
            iface.send_byte(ByteKind::Command, 127).unwrap();
            iface.end_write().unwrap();
            let i2c = iface.release();
            assert_eq!(
                i2c.writes,
                vec![(0x3C, vec![0x80, 0x21, 0x80, 0x00, 0x80, 127])]
            );
        }

        #[test]
        fn data_run_has_one_prefix() {
            let mut iface = I2cInterface::new(mock());
            iface.begin_write(0x3D).unwrap();
            iface.send_byte(ByteKind::Command, 0xA6).unwrap();
            for b in &[0xDE, 0xAD, 0xBE, 0xEF] {
                iface.send_byte(ByteKind::Data, *b).unwrap();
            }
            iface.end_write().unwrap();
            let i2c = iface.release();
            assert_eq!(
                i2c.writes,
                vec![(0x3D, vec![0x80, 0xA6, 0x40, 0xDE, 0xAD, 0xBE, 0xEF])]
            );
        }

        #[test]
        fn command_after_data_starts_new_transfer() {
            let mut iface = I2cInterface::new(mock());
            iface.begin_write(0x3C).unwrap();
            iface.send_byte(ByteKind::Data, 0x01).unwrap();
            iface.send_byte(ByteKind::Command, 0xAF).unwrap();
            iface.end_write().unwrap();
            let i2c = iface.release();
            assert_eq!(
                i2c.writes,
                vec![(0x3C, vec![0x40, 0x01]), (0x3C, vec![0x80, 0xAF])]
            );
        }

        #[test]
        fn long_data_run_is_chunked() {
            let mut iface = I2cInterface::new(mock());
            iface.begin_write(0x3C).unwrap();
            for b in 0..40u8 {
                iface.send_byte(ByteKind::Data, b).unwrap();
            }
            iface.end_write().unwrap();
            let i2c = iface.release();
            assert_eq!(i2c.writes.len(), 2);
            let mut first = vec![0x40];
            first.extend(0..31u8);
            let mut second = vec![0x40];
            second.extend(31..40u8);
            assert_eq!(i2c.writes[0], (0x3C, first));
            assert_eq!(i2c.writes[1], (0x3C, second));
        }

        #[test]
        fn empty_transaction_writes_nothing() {
            let mut iface = I2cInterface::new(mock());
            iface.begin_write(0x3C).unwrap();
            iface.end_write().unwrap();
            assert!(iface.release().writes.is_empty());
        }

        #[test]
        fn bus_failure_propagates() {
            let mut i2c = mock();
            i2c.fail = true;
            let mut iface = I2cInterface::new(i2c);
            iface.begin_write(0x3C).unwrap();
            iface.send_byte(ByteKind::Command, 0xAE).unwrap();
            assert_eq!(iface.end_write(), Err(()));
        }

        #[test]
        fn failed_chunk_is_not_resent() {
            let mut i2c = mock();
            i2c.fail_once = true;
            let mut link = Link::new(I2cInterface::new(i2c), 0x3C);
            assert_eq!(
                link.transaction(|tx| tx.data_iter(0..40u8)),
                Err(Error::Transport(()))
            );
            let i2c = link.release().release();
            assert_eq!(i2c.attempts, 1);
            assert!(i2c.writes.is_empty());
        }

        #[test]
        fn transfer_after_failure_starts_clean() {
            let mut i2c = mock();
            i2c.fail_once = true;
            let mut iface = I2cInterface::new(i2c);
            iface.begin_write(0x3C).unwrap();
            iface.send_byte(ByteKind::Command, 0xAE).unwrap();
            assert_eq!(iface.end_write(), Err(()));
            iface.begin_write(0x3C).unwrap();
            iface.send_byte(ByteKind::Data, 0x55).unwrap();
            iface.end_write().unwrap();
            let i2c = iface.release();
            assert_eq!(i2c.attempts, 2);
            assert_eq!(i2c.writes, vec![(0x3C, vec![0x40, 0x55])]);
        }
    }
}
