//! Peripheral abstraction traits
//!
//! These traits define the interface between the lifecycle controller and
//! the chip drivers for the parts soldered next to the panel. Each adapter
//! owns its own I2C plumbing; the controller only sequences it.

pub mod pmu;
pub mod sensor;
pub mod touch;

pub use pmu::PowerManagement;
pub use sensor::LightSensing;
pub use touch::TouchInput;
