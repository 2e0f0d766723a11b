use embedded_io::{Read, ReadReady, Write};

/// Byte-oriented serial port
pub trait Serial {
    type Error: core::fmt::Debug;

    /// Open the port at the given baud rate
    fn begin(&mut self, baud: u32) -> Result<(), Self::Error>;

    /// Write a single byte
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write every byte of `bytes` in order
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Read one byte if one is waiting, never blocks
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Check whether a byte can be read without blocking
    fn available(&mut self) -> Result<bool, Self::Error>;
}

/// [`Serial`] on top of a blocking `embedded-io` UART driver.
///
/// The baud rate is normally fixed when the driver is constructed, so
/// `begin` only records the requested value.
pub struct IoSerial<T> {
    io: T,
    baud: Option<u32>,
}

impl<T> IoSerial<T> {
    pub fn new(io: T) -> Self {
        Self { io, baud: None }
    }

    /// Baud rate passed to the last `begin`
    pub fn baud(&self) -> Option<u32> {
        self.baud
    }

    /// Borrow the wrapped driver
    pub fn inner(&self) -> &T {
        &self.io
    }

    /// Mutably borrow the wrapped driver, e.g. to change its settings
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Give the driver back
    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T: Read + Write + ReadReady> Serial for IoSerial<T> {
    type Error = T::Error;

    fn begin(&mut self, baud: u32) -> Result<(), Self::Error> {
        self.baud = Some(baud);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.io.write_all(&[byte])
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.io.write_all(bytes)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.io.read_ready()? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.io.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    fn available(&mut self) -> Result<bool, Self::Error> {
        self.io.read_ready()
    }
}
