//! Ambient light sensor trait

use crate::config::SensorPins;

/// Trait for ambient light sensors
pub trait LightSensing {
    /// Adapter error type, surfaced to callers unmodified
    type Error: core::fmt::Debug;

    /// Bring the sensor up on the given pins
    fn begin(&mut self, pins: &SensorPins) -> Result<(), Self::Error>;

    /// Read illuminance in lux
    fn read_lux(&mut self) -> Result<f32, Self::Error>;

    /// Stop conversions
    fn power_down(&mut self) -> Result<(), Self::Error>;

    /// Resume conversions
    fn power_on(&mut self) -> Result<(), Self::Error>;
}
