//! GPIO pin abstractions
//!
//! Board descriptors name pins by number. The platform turns those numbers
//! into live outputs through [`GpioBank`], and takes them back on release.

/// Logic level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific level
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Errors when claiming a pin from the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number does not exist on this chip
    InvalidPin(u8),
    /// Pin is already claimed by someone else
    InUse(u8),
}

/// Source of numbered output pins
///
/// A pin handed out by [`claim_output`](GpioBank::claim_output) belongs to
/// the caller until it is given back with
/// [`release_output`](GpioBank::release_output). Claiming a pin twice
/// without releasing it must fail with [`PinError::InUse`].
pub trait GpioBank {
    /// Output pin type produced by this bank
    type Output: OutputPin;

    /// Configure `pin` as an output driven to `initial` and hand it out
    fn claim_output(&mut self, pin: u8, initial: Level) -> Result<Self::Output, PinError>;

    /// Return a previously claimed output
    ///
    /// The pin is left floating (input, no pull) by the platform.
    fn release_output(&mut self, output: Self::Output);
}
