//! Board-agnostic core for the LilyGo AMOLED display boards
//!
//! This crate contains everything that does not touch hardware:
//!
//! - Panel and board descriptors (pins, framing, init sequences)
//! - Display command set and addressing-window arithmetic
//! - Lifecycle state machine
//! - Traits for the touch, PMU and light-sensor adapters

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod state;
pub mod traits;
pub mod window;

pub use config::{BoardDescriptor, BoardVariant, ConfigError, PanelDescriptor};
pub use window::{AddressWindow, WindowError};
