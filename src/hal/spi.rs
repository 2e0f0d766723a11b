use core::fmt;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;

/// Clock polarity and phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Bus settings applied by [`Spi::init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    pub speed_hz: u32,
    pub mode: SpiMode,
    pub bit_order: BitOrder,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            speed_hz: 1_000_000,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
        }
    }
}

/// Full-duplex SPI master with a single chip select
pub trait Spi {
    type Error: fmt::Debug;

    fn init(&mut self, config: SpiConfig) -> Result<(), Self::Error>;

    /// Assert (`true`) or release (`false`) the chip select
    fn select(&mut self, enable: bool) -> Result<(), Self::Error>;

    /// Clock out one byte and return the byte clocked in
    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Exchange a whole buffer, replacing each byte with the one read back
    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for word in words.iter_mut() {
            *word = self.transfer(*word)?;
        }
        Ok(())
    }
}

/// Error from [`BlockingSpi`]: either the bus or the chip-select pin failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiError<B, P> {
    Bus(B),
    Pin(P),
}

impl<B: fmt::Debug, P: fmt::Debug> fmt::Display for SpiError<B, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiError::Bus(e) => write!(f, "SPI bus error: {:?}", e),
            SpiError::Pin(e) => write!(f, "chip select error: {:?}", e),
        }
    }
}

/// [`Spi`] over an `embedded-hal` blocking transfer bus and an active-low
/// chip-select pin.
///
/// `embedded-hal` has no runtime clock configuration, so the peripheral must
/// already be set up for the requested speed and mode; `init` stores the
/// config and releases chip select.
pub struct BlockingSpi<SPI, CS> {
    spi: SPI,
    cs: CS,
    config: Option<SpiConfig>,
}

impl<SPI, CS> BlockingSpi<SPI, CS>
where
    SPI: Transfer<u8>,
    CS: OutputPin,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self {
            spi,
            cs,
            config: None,
        }
    }

    pub fn config(&self) -> Option<SpiConfig> {
        self.config
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Spi for BlockingSpi<SPI, CS>
where
    SPI: Transfer<u8>,
    SPI::Error: fmt::Debug,
    CS: OutputPin,
    CS::Error: fmt::Debug,
{
    type Error = SpiError<SPI::Error, CS::Error>;

    fn init(&mut self, config: SpiConfig) -> Result<(), Self::Error> {
        debug!("spi init at {} Hz", config.speed_hz);
        self.config = Some(config);
        self.select(false)
    }

    fn select(&mut self, enable: bool) -> Result<(), Self::Error> {
        if enable {
            self.cs.set_low().map_err(SpiError::Pin)
        } else {
            self.cs.set_high().map_err(SpiError::Pin)
        }
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut word = [byte];
        self.spi.transfer(&mut word).map_err(SpiError::Bus)?;
        Ok(word[0])
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.transfer(words).map_err(SpiError::Bus)?;
        Ok(())
    }
}
