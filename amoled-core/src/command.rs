//! MIPI DCS command set shared by the RM67162 and SH8501 controllers
//!
//! Only the subset used by the descriptors and the bus driver is listed.

/// Sleep In
pub const SLPIN: u8 = 0x10;
/// Sleep Out
pub const SLPOUT: u8 = 0x11;
/// Display On
pub const DISPON: u8 = 0x29;
/// Column Address Set
pub const CASET: u8 = 0x2A;
/// Row (Page) Address Set
pub const RASET: u8 = 0x2B;
/// Memory Write Start
pub const RAMWR: u8 = 0x2C;
/// Tearing Effect Off
pub const TEOFF: u8 = 0x34;
/// Tearing Effect On
pub const TEON: u8 = 0x35;
/// Memory Data Access Control
pub const MADCTL: u8 = 0x36;
/// Interface Pixel Format
pub const COLMOD: u8 = 0x3A;
/// Set Tear Scan Line
pub const TESCAN: u8 = 0x44;
/// Write Display Brightness Value
pub const WRDISBV: u8 = 0x51;
/// Write CTRL Display 1
pub const WRCTRLD1: u8 = 0x53;

/// Opcodes carried in the command phase of a quad-line transaction
pub mod opcode {
    /// Register write, parameters on one line
    pub const WRITE_REG: u8 = 0x02;
    /// Pixel write, data on four lines
    pub const WRITE_PIXELS_QUAD: u8 = 0x32;
}

/// Address-phase value for a register number (register sits in bits 8..16)
pub const fn register_address(register: u8) -> u32 {
    (register as u32) << 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_address() {
        assert_eq!(register_address(CASET), 0x002A00);
        assert_eq!(register_address(RAMWR), 0x002C00);
        assert_eq!(register_address(WRDISBV), 0x005100);
    }
}
