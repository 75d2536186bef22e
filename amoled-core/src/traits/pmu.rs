//! Power management IC trait

use crate::config::PmuPins;

/// Trait for the board's power management IC
///
/// Interrupt bits are chip-specific; the masks passed through here are
/// the chip's own register layout.
pub trait PowerManagement {
    /// Adapter error type, surfaced to callers unmodified
    type Error: core::fmt::Debug;

    /// Bring the PMU up on the given pins
    fn begin(&mut self, pins: &PmuPins) -> Result<(), Self::Error>;

    /// Register a callback run from the PMU interrupt line
    fn attach_interrupt(&mut self, callback: fn()) -> Result<(), Self::Error>;

    /// Read the raw interrupt status registers
    fn read_irq_status(&mut self) -> Result<u64, Self::Error>;

    /// Clear all pending interrupt flags
    fn clear_irq_status(&mut self) -> Result<(), Self::Error>;

    /// Unmask the interrupts in `mask`
    fn enable_irq(&mut self, mask: u32) -> Result<(), Self::Error>;

    /// Mask the interrupts in `mask`
    fn disable_irq(&mut self, mask: u32) -> Result<(), Self::Error>;

    /// Battery voltage in millivolts
    fn battery_voltage_mv(&mut self) -> Result<u16, Self::Error>;

    /// Switch off the rails that feed the other peripherals
    fn power_down_rails(&mut self) -> Result<(), Self::Error>;

    /// Switch those rails back on
    fn power_up_rails(&mut self) -> Result<(), Self::Error>;
}
