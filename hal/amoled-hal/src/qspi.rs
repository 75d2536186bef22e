//! Quad-line SPI bus abstractions
//!
//! AMOLED controllers on these boards speak a half-duplex, write-only
//! protocol: an optional command phase, an optional address phase, then a
//! data phase on one or four lines. The bus does not own the chip-select
//! line; the display driver drives it as a plain GPIO so it can hold it
//! asserted across several transactions.

/// Quad-line SPI master channel
///
/// The channel must be claimed with a [`QspiConfig`] before any transaction
/// is submitted, and released when the owner is done with it.
pub trait QspiBus {
    /// Error type for claim and transfer failures
    type Error: core::fmt::Debug;

    /// Claim the channel with the given pins, clock and phase widths
    ///
    /// Fails if the channel is already in use or the pin combination cannot
    /// be routed.
    fn claim(&mut self, config: &QspiConfig) -> Result<(), Self::Error>;

    /// Release the channel
    ///
    /// Releasing an unclaimed channel is a no-op.
    fn release(&mut self);

    /// Submit one blocking transaction
    ///
    /// Returns once the data has left the shift register.
    fn transmit(&mut self, transaction: &Transaction<'_>) -> Result<(), Self::Error>;
}

/// Bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QspiConfig {
    /// Data lines D0..D3
    pub data_pins: [u8; 4],
    /// Clock pin
    pub clock_pin: u8,
    /// Clock frequency in Hz
    pub frequency_hz: u32,
    /// Width of the command phase in bits
    pub command_bits: u8,
    /// Width of the address phase in bits
    pub address_bits: u8,
    /// Clock mode
    pub mode: Mode,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

/// Number of lines used for the data phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataLines {
    /// Standard SPI, data on D0 only
    Single,
    /// Quad SPI, data on D0..D3
    Quad,
}

/// Command or address phase: `bits` low bits of `value`, MSB first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase {
    /// Value to shift out
    pub value: u32,
    /// Number of bits (1-32)
    pub bits: u8,
}

impl Phase {
    /// Create a phase of the given width
    pub const fn new(value: u32, bits: u8) -> Self {
        Self { value, bits }
    }

    /// Check that `value` fits in `bits`
    pub const fn fits(&self) -> bool {
        if self.bits == 0 || self.bits > 32 {
            return false;
        }
        self.bits == 32 || self.value >> self.bits == 0
    }
}

/// One half-duplex transaction
///
/// A transaction without command and address phases continues the
/// previous memory write on the panel side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction<'a> {
    /// Command phase, always on a single line
    pub command: Option<Phase>,
    /// Address phase, always on a single line
    pub address: Option<Phase>,
    /// Data phase payload
    pub data: &'a [u8],
    /// Lines used for the data phase
    pub data_lines: DataLines,
}

impl<'a> Transaction<'a> {
    /// Data-only continuation of a previous write
    pub const fn continuation(data: &'a [u8], data_lines: DataLines) -> Self {
        Self {
            command: None,
            address: None,
            data,
            data_lines,
        }
    }
}
