//! Display bus driver

pub mod bus;

pub use bus::{BusPins, DisplayBus, DisplayError, InitBusError, STAGE_BYTES};
