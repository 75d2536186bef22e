//! Display bus driver and lifecycle controller for LilyGo AMOLED boards
//!
//! Builds on the descriptors and traits in `amoled-core`:
//!
//! - [`display::DisplayBus`] - quad-line command protocol and pixel push
//! - [`touch`] - dispatch between the supported touch controllers
//! - [`Amoled`] - board selection, bring-up, sleep and wake

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod amoled;
pub mod display;
pub mod touch;

pub use amoled::{
    Amoled, BeginError, LifecycleError, Peripheral, PeripheralError, Peripherals, Platform,
    DEFAULT_BRIGHTNESS,
};
pub use display::{DisplayBus, DisplayError};
pub use touch::{ActiveTouch, TouchPair};
