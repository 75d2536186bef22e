//! Touch controller trait

use crate::config::TouchPins;

/// Trait for capacitive touch controllers
///
/// Implemented once per controller family (CST816, CHSC5816). The
/// controller reports points in panel coordinates.
pub trait TouchInput {
    /// Adapter error type, surfaced to callers unmodified
    type Error: core::fmt::Debug;

    /// Bring the controller up on the given pins
    ///
    /// `max_x` and `max_y` are the panel dimensions, used by controllers
    /// that need to be told their coordinate range.
    fn begin(&mut self, pins: &TouchPins, max_x: u16, max_y: u16) -> Result<(), Self::Error>;

    /// Read current touch points into `xs` and `ys`
    ///
    /// Returns the number of points written, never more than the shorter
    /// of the two slices.
    fn get_point(&mut self, xs: &mut [i16], ys: &mut [i16]) -> Result<u8, Self::Error>;

    /// Check if the panel is being touched
    fn is_pressed(&mut self) -> bool;

    /// Put the controller into its lowest power mode
    fn sleep(&mut self) -> Result<(), Self::Error>;

    /// Resume from `sleep`
    fn wakeup(&mut self) -> Result<(), Self::Error>;
}
