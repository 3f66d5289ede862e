//! Byte transport abstractions
//!
//! The coprocessor link is a synchronous, full-duplex byte exchange: every
//! byte clocked out clocks one byte back in. The host also drives a select
//! line that frames a transaction.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Full-duplex byte exchange under a host-controlled select line
///
/// Implementations assert the select line before clocking `byte` out, and
/// release it afterwards only when `release_select` is set.
pub trait ByteTransport {
    /// Error type for exchange operations
    type Error;

    /// Clock one byte out while clocking one byte in
    fn exchange(&mut self, byte: u8, release_select: bool) -> Result<u8, Self::Error>;
}

impl<T: ByteTransport + ?Sized> ByteTransport for &mut T {
    type Error = T::Error;

    fn exchange(&mut self, byte: u8, release_select: bool) -> Result<u8, Self::Error> {
        (**self).exchange(byte, release_select)
    }
}

/// Errors from the embedded-hal SPI adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiTransportError<S, P> {
    /// SPI bus transfer failed
    Spi(S),
    /// Select pin could not be driven
    Select(P),
}

/// [`ByteTransport`] over an embedded-hal SPI bus and an active-low select pin
///
/// The bus is expected to be configured for mode 0, MSB first. The select
/// pin is driven low before each byte and high again after a byte sent
/// with `release_select`.
pub struct SpiTransport<SPI, CS> {
    spi: SPI,
    select: CS,
}

impl<SPI, CS> SpiTransport<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Wrap a bus and select pin, leaving the select line released
    pub fn new(spi: SPI, mut select: CS) -> Result<Self, SpiTransportError<SPI::Error, CS::Error>> {
        select.set_high().map_err(SpiTransportError::Select)?;
        Ok(Self { spi, select })
    }

    /// Give the bus and pin back
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.select)
    }
}

impl<SPI, CS> ByteTransport for SpiTransport<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = SpiTransportError<SPI::Error, CS::Error>;

    fn exchange(&mut self, byte: u8, release_select: bool) -> Result<u8, Self::Error> {
        self.select.set_low().map_err(SpiTransportError::Select)?;

        let mut word = [byte];
        self.spi
            .transfer_in_place(&mut word)
            .map_err(SpiTransportError::Spi)?;

        if release_select {
            self.spi.flush().map_err(SpiTransportError::Spi)?;
            self.select.set_high().map_err(SpiTransportError::Select)?;
        }

        Ok(word[0])
    }
}
