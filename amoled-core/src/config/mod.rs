//! Configuration types
//!
//! Panel and board descriptors. All configuration is compiled in; nothing
//! here is read from storage at runtime.

pub mod board;
pub mod panel;

pub use board::*;
pub use panel::*;

/// Descriptor validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    InvalidGeometry,
    /// Frame-buffer size or flag disagrees with the panel geometry
    FrameBufferMismatch,
    /// Command or address width cannot be framed
    InvalidFraming,
    /// The same pin is assigned to two functions
    PinConflict(u8),
    /// Board uses more pins than the validator can track
    TooManyPins,
}
