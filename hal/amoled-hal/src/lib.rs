//! AMOLED Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware interfaces the AMOLED board driver
//! consumes. Chip-specific HALs (ESP32-S3 SPI master, GPIO matrix, etc.)
//! implement them; the driver never touches registers directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  amoled-drivers (bus driver, lifecycle) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  amoled-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL (SPI master, GPIO matrix)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`qspi::QspiBus`] - Claimable quad-line SPI channel with framed transactions
//! - [`gpio::GpioBank`] - Claim/release of numbered output pins
//! - [`gpio::OutputPin`] - Digital output
//!
//! Timing is not modelled here; the driver uses `embedded_hal::delay::DelayNs`.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod qspi;

// Re-export key traits at crate root for convenience
pub use gpio::{GpioBank, Level, OutputPin, PinError};
pub use qspi::{DataLines, Mode, Phase, QspiBus, QspiConfig, Transaction};
