use core::fmt;

/// Errors from a non-volatile store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvError {
    /// Address at or past the end of the store
    OutOfRange { addr: usize, capacity: usize },
}

impl fmt::Display for NvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NvError::OutOfRange { addr, capacity } => {
                write!(f, "address {} out of range (capacity {})", addr, capacity)
            }
        }
    }
}

/// Byte-addressable non-volatile memory (EEPROM, emulated flash, ...)
pub trait NonVolatile {
    type Error: fmt::Debug;

    /// Number of addressable bytes
    fn capacity(&self) -> usize;

    fn read(&mut self, addr: usize) -> Result<u8, Self::Error>;

    fn write(&mut self, addr: usize, data: u8) -> Result<(), Self::Error>;

    /// Write only if the stored byte differs. Returns whether a write happened.
    fn update(&mut self, addr: usize, data: u8) -> Result<bool, Self::Error> {
        if self.read(addr)? == data {
            return Ok(false);
        }
        self.write(addr, data)?;
        Ok(true)
    }

    /// Fill `buf` starting at `addr`
    fn read_into(&mut self, addr: usize, buf: &mut [u8]) -> Result<(), Self::Error> {
        for (offset, slot) in buf.iter_mut().enumerate() {
            *slot = self.read(addr + offset)?;
        }
        Ok(())
    }

    /// Store `data` starting at `addr`, skipping bytes that are unchanged
    fn write_from(&mut self, addr: usize, data: &[u8]) -> Result<(), Self::Error> {
        for (offset, &byte) in data.iter().enumerate() {
            self.update(addr + offset, byte)?;
        }
        Ok(())
    }
}

/// Value of an erased cell
pub const ERASED: u8 = 0xFF;

/// RAM-backed store, for simulation and for boards without EEPROM.
///
/// Starts fully erased and counts physical writes.
pub struct RamNv<const N: usize> {
    cells: [u8; N],
    writes: usize,
}

impl<const N: usize> RamNv<N> {
    pub const fn new() -> Self {
        Self {
            cells: [ERASED; N],
            writes: 0,
        }
    }

    /// Number of `write` calls that reached the cells
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Raw view of every cell
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Reset every cell to [`ERASED`]
    pub fn erase(&mut self) {
        self.cells = [ERASED; N];
    }

    fn check(&self, addr: usize) -> Result<(), NvError> {
        if addr < N {
            Ok(())
        } else {
            Err(NvError::OutOfRange { addr, capacity: N })
        }
    }
}

impl<const N: usize> Default for RamNv<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NonVolatile for RamNv<N> {
    type Error = NvError;

    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, addr: usize) -> Result<u8, NvError> {
        self.check(addr)?;
        Ok(self.cells[addr])
    }

    fn write(&mut self, addr: usize, data: u8) -> Result<(), NvError> {
        self.check(addr)?;
        self.cells[addr] = data;
        self.writes += 1;
        Ok(())
    }
}
