//! Panel descriptors
//!
//! A panel descriptor is the compile-time description of one physical
//! display: how it is wired to the quad-line bus, how its command framing
//! looks, and the ordered command list that brings it up.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::ConfigError;
use crate::command as cmd;

/// Bytes per pixel on the wire (RGB565)
pub const BYTES_PER_PIXEL: usize = 2;

/// Post-command settle time used by sleep-out and display-on
pub const SETTLE_DELAY_MS: u16 = 120;

/// One entry of a panel init sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct InitCommand {
    /// Register (command) number
    pub command: u8,
    /// Parameter bytes, may be empty
    pub params: &'static [u8],
    /// Delay after the command in milliseconds
    pub delay_ms: u16,
}

impl InitCommand {
    /// Command with parameters and no settle time
    pub const fn new(command: u8, params: &'static [u8]) -> Self {
        Self {
            command,
            params,
            delay_ms: 0,
        }
    }

    /// Command followed by a settle delay
    pub const fn with_delay(command: u8, params: &'static [u8], delay_ms: u16) -> Self {
        Self {
            command,
            params,
            delay_ms,
        }
    }
}

/// Electrical, timing and bring-up description of one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PanelDescriptor {
    /// Panel controller name
    pub name: &'static str,
    /// Data lines D0..D3
    pub data_pins: [u8; 4],
    /// Bus clock
    pub sck: u8,
    /// Chip select
    pub cs: u8,
    /// Data/command select, absent for pure command-protocol panels
    pub dc: Option<u8>,
    /// Reset (active low)
    pub rst: u8,
    /// Tearing-effect output from the panel
    pub te: u8,
    /// Command phase width in bits
    pub command_bits: u8,
    /// Address phase width in bits
    pub address_bits: u8,
    /// Bus clock frequency in Hz
    pub frequency_hz: u32,
    /// Ordered bring-up sequence
    pub init_sequence: &'static [InitCommand],
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Bytes the driver must retain when the panel has no frame memory, else 0
    pub frame_buffer_size: u32,
    /// Brightness register, `None` when the panel has no brightness control
    pub brightness_command: Option<u8>,
}

impl PanelDescriptor {
    /// Number of pixels on the panel
    pub const fn pixel_count(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Whether the driver must keep a copy of the frame
    pub const fn needs_frame_buffer(&self) -> bool {
        self.frame_buffer_size != 0
    }

    /// Check the descriptor invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidGeometry);
        }
        if self.frame_buffer_size != 0
            && self.frame_buffer_size as usize != self.pixel_count() as usize * BYTES_PER_PIXEL
        {
            return Err(ConfigError::FrameBufferMismatch);
        }
        if self.command_bits == 0
            || self.command_bits > 16
            || self.address_bits == 0
            || self.address_bits > 32
        {
            return Err(ConfigError::InvalidFraming);
        }
        Ok(())
    }

    /// Pins that belong to the display bus and nothing else
    pub fn bus_pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.data_pins
            .iter()
            .copied()
            .chain([self.sck, self.cs, self.rst, self.te])
            .chain(self.dc)
    }
}

/// RM67162 panel width
pub const RM67162_WIDTH: u16 = 240;
/// RM67162 panel height
pub const RM67162_HEIGHT: u16 = 536;

/// SH8501 panel width
pub const SH8501_WIDTH: u16 = 336;
/// SH8501 panel height
pub const SH8501_HEIGHT: u16 = 407;

const RM67162_INIT: &[InitCommand] = &[
    InitCommand::with_delay(cmd::SLPOUT, &[], SETTLE_DELAY_MS),
    InitCommand::new(cmd::COLMOD, &[0x55]), // 16 bit/pixel
    InitCommand::new(cmd::TEON, &[0x00]),
    InitCommand::with_delay(cmd::DISPON, &[], SETTLE_DELAY_MS),
    InitCommand::new(cmd::WRDISBV, &[0x00]),
];

const SH8501_INIT: &[InitCommand] = &[
    InitCommand::with_delay(cmd::SLPOUT, &[], SETTLE_DELAY_MS),
    InitCommand::new(cmd::TESCAN, &[0x01, 0x66]),
    InitCommand::new(cmd::TEON, &[0x00]),
    InitCommand::new(cmd::TEOFF, &[]),
    InitCommand::new(cmd::MADCTL, &[0x00]),
    InitCommand::new(cmd::COLMOD, &[0x55]), // 16 bit/pixel
    InitCommand::new(cmd::WRCTRLD1, &[0x20]),
    InitCommand::new(cmd::WRDISBV, &[0x00]),
    InitCommand::with_delay(cmd::DISPON, &[], SETTLE_DELAY_MS),
    InitCommand::new(cmd::WRDISBV, &[0xFF]),
];

/// LILYGO 1.91" AMOLED (RM67162), panel has its own frame memory
pub const RM67162_AMOLED: PanelDescriptor = PanelDescriptor {
    name: "RM67162",
    data_pins: [18, 7, 48, 5],
    sck: 47,
    cs: 6,
    dc: None,
    rst: 17,
    te: 9,
    command_bits: 8,
    address_bits: 24,
    frequency_hz: 75_000_000,
    init_sequence: RM67162_INIT,
    width: RM67162_WIDTH,
    height: RM67162_HEIGHT,
    frame_buffer_size: 0,
    brightness_command: Some(cmd::WRDISBV),
};

/// LILYGO 1.47" AMOLED (SH8501), driver keeps the frame
pub const SH8501_AMOLED: PanelDescriptor = PanelDescriptor {
    name: "SH8501",
    data_pins: [7, 10, 11, 12],
    sck: 5,
    cs: 4,
    dc: None,
    rst: 40,
    te: 6,
    command_bits: 8,
    address_bits: 24,
    frequency_hz: 30_000_000,
    init_sequence: SH8501_INIT,
    width: SH8501_WIDTH,
    height: SH8501_HEIGHT,
    frame_buffer_size: SH8501_WIDTH as u32 * SH8501_HEIGHT as u32 * BYTES_PER_PIXEL as u32,
    brightness_command: Some(cmd::WRDISBV),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_panels_valid() {
        assert_eq!(RM67162_AMOLED.validate(), Ok(()));
        assert_eq!(SH8501_AMOLED.validate(), Ok(()));
    }

    #[test]
    fn test_frame_buffer_size() {
        assert!(!RM67162_AMOLED.needs_frame_buffer());
        assert!(SH8501_AMOLED.needs_frame_buffer());
        assert_eq!(SH8501_AMOLED.frame_buffer_size, 336 * 407 * 2);
    }

    #[test]
    fn test_zero_geometry_rejected() {
        let panel = PanelDescriptor {
            width: 0,
            ..RM67162_AMOLED
        };
        assert_eq!(panel.validate(), Err(ConfigError::InvalidGeometry));
    }

    #[test]
    fn test_frame_buffer_mismatch_rejected() {
        let panel = PanelDescriptor {
            frame_buffer_size: 1234,
            ..SH8501_AMOLED
        };
        assert_eq!(panel.validate(), Err(ConfigError::FrameBufferMismatch));
    }

    #[test]
    fn test_init_sequences_end_lit() {
        // Display-on must come after sleep-out in both sequences
        for panel in [RM67162_AMOLED, SH8501_AMOLED] {
            let seq = panel.init_sequence;
            let slpout = seq.iter().position(|c| c.command == cmd::SLPOUT);
            let dispon = seq.iter().position(|c| c.command == cmd::DISPON);
            assert!(slpout.is_some() && dispon.is_some());
            assert!(slpout < dispon);
        }
    }

    #[test]
    fn test_bus_pins() {
        let mut count = 0;
        for pin in RM67162_AMOLED.bus_pins() {
            assert_ne!(pin, 38); // power enable is not a bus pin
            count += 1;
        }
        assert_eq!(count, 8); // no DC pin
    }
}
