//! Addressing window arithmetic
//!
//! The panel writes incoming pixels into a rectangular window of its frame
//! memory, row-major, inclusive on both ends. Coordinates are checked
//! against the panel before anything reaches the bus; nothing is clamped.

/// Addressing window errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowError {
    /// Start coordinate is past the end coordinate
    Inverted,
    /// End coordinate is outside the panel
    OutOfBounds,
    /// Zero-sized rectangle
    Empty,
}

/// Inclusive rectangle of panel memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressWindow {
    /// First column
    pub x_start: u16,
    /// First row
    pub y_start: u16,
    /// Last column (inclusive)
    pub x_end: u16,
    /// Last row (inclusive)
    pub y_end: u16,
}

impl AddressWindow {
    /// Build a window from inclusive corners, checked against a panel of
    /// `panel_width` x `panel_height`
    pub fn new(
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
        panel_width: u16,
        panel_height: u16,
    ) -> Result<Self, WindowError> {
        if x_start > x_end || y_start > y_end {
            return Err(WindowError::Inverted);
        }
        if x_end >= panel_width || y_end >= panel_height {
            return Err(WindowError::OutOfBounds);
        }
        Ok(Self {
            x_start,
            y_start,
            x_end,
            y_end,
        })
    }

    /// Build a window from origin and size
    pub fn from_rect(
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        panel_width: u16,
        panel_height: u16,
    ) -> Result<Self, WindowError> {
        if width == 0 || height == 0 {
            return Err(WindowError::Empty);
        }
        let x_end = x.checked_add(width - 1).ok_or(WindowError::OutOfBounds)?;
        let y_end = y.checked_add(height - 1).ok_or(WindowError::OutOfBounds)?;
        Self::new(x, y, x_end, y_end, panel_width, panel_height)
    }

    /// Window width in pixels
    pub const fn width(&self) -> u16 {
        self.x_end - self.x_start + 1
    }

    /// Window height in pixels
    pub const fn height(&self) -> u16 {
        self.y_end - self.y_start + 1
    }

    /// Number of pixels the window holds
    pub const fn pixel_count(&self) -> u32 {
        self.width() as u32 * self.height() as u32
    }

    /// CASET parameters: start and end column, big-endian
    pub const fn column_params(&self) -> [u8; 4] {
        span_params(self.x_start, self.x_end)
    }

    /// RASET parameters: start and end row, big-endian
    pub const fn row_params(&self) -> [u8; 4] {
        span_params(self.y_start, self.y_end)
    }
}

const fn span_params(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_panel_window() {
        let w = AddressWindow::new(0, 0, 335, 406, 336, 407).unwrap();
        assert_eq!(w.width(), 336);
        assert_eq!(w.height(), 407);
        assert_eq!(w.pixel_count(), 336 * 407);
    }

    #[test]
    fn test_single_pixel() {
        let w = AddressWindow::new(10, 20, 10, 20, 240, 536).unwrap();
        assert_eq!(w.pixel_count(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        assert_eq!(
            AddressWindow::new(0, 0, 240, 10, 240, 536),
            Err(WindowError::OutOfBounds)
        );
        assert_eq!(
            AddressWindow::new(0, 0, 10, 536, 240, 536),
            Err(WindowError::OutOfBounds)
        );
    }

    #[test]
    fn test_inverted() {
        assert_eq!(
            AddressWindow::new(20, 0, 10, 10, 240, 536),
            Err(WindowError::Inverted)
        );
    }

    #[test]
    fn test_from_rect() {
        let w = AddressWindow::from_rect(8, 16, 32, 4, 240, 536).unwrap();
        assert_eq!(w.x_end, 39);
        assert_eq!(w.y_end, 19);

        assert_eq!(
            AddressWindow::from_rect(0, 0, 0, 4, 240, 536),
            Err(WindowError::Empty)
        );
        assert_eq!(
            AddressWindow::from_rect(u16::MAX, 0, 2, 1, 240, 536),
            Err(WindowError::OutOfBounds)
        );
    }

    #[test]
    fn test_params_big_endian() {
        let w = AddressWindow::new(0x0102, 0x0003, 0x0110, 0x0207, 0x0200, 0x0300).unwrap();
        assert_eq!(w.column_params(), [0x01, 0x02, 0x01, 0x10]);
        assert_eq!(w.row_params(), [0x00, 0x03, 0x02, 0x07]);
    }
}
