//! Write-only parallel bus transport.
//!
//! The SSD1963 hangs off an Intel-8080 style host port: a data bus plus D/C,
//! WR and CS strobes. There is no acknowledgment path back from the
//! controller, so every operation here is fire-and-forget. The
//! [`DisplayInterface`] trait is the seam the driver talks through;
//! [`ParallelInterface`] bit-bangs it over `embedded-hal` output pins for
//! hosts without a memory-mapped parallel port.

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Command/data transport the driver writes through.
pub trait DisplayInterface {
    /// Send a bare command byte
    fn cmd(&mut self, cmd: u8) -> Result<(), DisplayError>;

    /// Send a command followed by its parameter bytes in one chip-select
    /// window
    fn cmd_with_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), DisplayError>;

    /// Stream 565 pixel words into the current window as a single burst
    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), DisplayError>;

    /// Stream the same 565 pixel word `count` times as a single burst
    fn repeat_pixel(&mut self, raw: u16, count: u32) -> Result<(), DisplayError>;

    /// Pulse the controller reset line
    fn hard_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError>;
}

/// A writable parallel data bus of some word width.
pub trait OutputBus {
    /// Native bus width
    type Word: Copy;

    /// Present a value on the bus pins (does not strobe WR)
    fn set_value(&mut self, value: Self::Word) -> Result<(), DisplayError>;
}

/// An 8-bit data bus built from individual GPIO pins, D0 first.
pub struct Generic8BitBus<P0, P1, P2, P3, P4, P5, P6, P7> {
    pins: (P0, P1, P2, P3, P4, P5, P6, P7),
}

impl<P0, P1, P2, P3, P4, P5, P6, P7> Generic8BitBus<P0, P1, P2, P3, P4, P5, P6, P7>
where
    P0: OutputPin,
    P1: OutputPin,
    P2: OutputPin,
    P3: OutputPin,
    P4: OutputPin,
    P5: OutputPin,
    P6: OutputPin,
    P7: OutputPin,
{
    /// Wrap eight output pins, least significant bit first
    pub fn new(pins: (P0, P1, P2, P3, P4, P5, P6, P7)) -> Self {
        Generic8BitBus { pins }
    }
}

impl<P0, P1, P2, P3, P4, P5, P6, P7> OutputBus for Generic8BitBus<P0, P1, P2, P3, P4, P5, P6, P7>
where
    P0: OutputPin,
    P1: OutputPin,
    P2: OutputPin,
    P3: OutputPin,
    P4: OutputPin,
    P5: OutputPin,
    P6: OutputPin,
    P7: OutputPin,
{
    type Word = u8;

    fn set_value(&mut self, value: u8) -> Result<(), DisplayError> {
        fn bit(pin: &mut impl OutputPin, set: bool) -> Result<(), DisplayError> {
            pin.set_state(set.into())
                .map_err(|_| DisplayError::BusWriteError)
        }
        bit(&mut self.pins.0, value & 0x01 != 0)?;
        bit(&mut self.pins.1, value & 0x02 != 0)?;
        bit(&mut self.pins.2, value & 0x04 != 0)?;
        bit(&mut self.pins.3, value & 0x08 != 0)?;
        bit(&mut self.pins.4, value & 0x10 != 0)?;
        bit(&mut self.pins.5, value & 0x20 != 0)?;
        bit(&mut self.pins.6, value & 0x40 != 0)?;
        bit(&mut self.pins.7, value & 0x80 != 0)
    }
}

/// Bit-banged 8080 write-only interface over an 8-bit [`OutputBus`].
///
/// 16-bit values (window bounds, pixels) cross the bus high byte first, one
/// WR strobe per byte. Chip select stays asserted for a whole burst; the
/// per-word cost is just the strobe.
pub struct ParallelInterface<BUS, DC, WR, CS, RST> {
    bus: BUS,
    dc: DC,
    wr: WR,
    cs: CS,
    rst: RST,
}

impl<BUS, DC, WR, CS, RST> ParallelInterface<BUS, DC, WR, CS, RST>
where
    BUS: OutputBus<Word = u8>,
    DC: OutputPin,
    WR: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Create the interface from a data bus and control pins
    pub fn new(bus: BUS, dc: DC, wr: WR, cs: CS, rst: RST) -> Self {
        ParallelInterface {
            bus,
            dc,
            wr,
            cs,
            rst,
        }
    }

    fn select(&mut self) -> Result<(), DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::CSError)
    }

    fn deselect(&mut self) -> Result<(), DisplayError> {
        self.cs.set_high().map_err(|_| DisplayError::CSError)
    }

    fn command_mode(&mut self) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)
    }

    fn data_mode(&mut self) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)
    }

    // WR is sampled on the rising edge
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.bus.set_value(byte)?;
        self.wr.set_low().map_err(|_| DisplayError::BusWriteError)?;
        self.wr.set_high().map_err(|_| DisplayError::BusWriteError)
    }

    fn write_word(&mut self, word: u16) -> Result<(), DisplayError> {
        self.write_byte((word >> 8) as u8)?;
        self.write_byte(word as u8)
    }
}

impl<BUS, DC, WR, CS, RST> DisplayInterface for ParallelInterface<BUS, DC, WR, CS, RST>
where
    BUS: OutputBus<Word = u8>,
    DC: OutputPin,
    WR: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    fn cmd(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.select()?;
        self.command_mode()?;
        self.write_byte(cmd)?;
        self.deselect()
    }

    fn cmd_with_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.select()?;
        self.command_mode()?;
        self.write_byte(cmd)?;
        self.data_mode()?;
        for &byte in data {
            self.write_byte(byte)?;
        }
        self.deselect()
    }

    fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), DisplayError> {
        self.select()?;
        self.data_mode()?;
        for &px in pixels {
            self.write_word(px)?;
        }
        self.deselect()
    }

    fn repeat_pixel(&mut self, raw: u16, count: u32) -> Result<(), DisplayError> {
        self.select()?;
        self.data_mode()?;
        for _ in 0..count {
            self.write_word(raw)?;
        }
        self.deselect()
    }

    fn hard_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(1);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        // release from reset into sleep state
        delay.delay_ms(5);
        Ok(())
    }
}
