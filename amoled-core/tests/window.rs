//! Addressing window properties

use amoled_core::config::{BOARD_AMOLED_147, BOARD_AMOLED_191};
use amoled_core::window::{AddressWindow, WindowError};
use proptest::prelude::*;

const PANELS: [(u16, u16); 2] = [
    (BOARD_AMOLED_191.display.width, BOARD_AMOLED_191.display.height),
    (BOARD_AMOLED_147.display.width, BOARD_AMOLED_147.display.height),
];

fn panel() -> impl Strategy<Value = (u16, u16)> {
    prop::sample::select(PANELS.to_vec())
}

proptest! {
    #[test]
    fn prop_in_bounds_window_accepted(
        (pw, ph) in panel(),
        a in any::<u16>(),
        b in any::<u16>(),
        c in any::<u16>(),
        d in any::<u16>(),
    ) {
        let (x0, x1) = (a % pw, b % pw);
        let (y0, y1) = (c % ph, d % ph);
        let (xs, xe) = (x0.min(x1), x0.max(x1));
        let (ys, ye) = (y0.min(y1), y0.max(y1));

        let w = AddressWindow::new(xs, ys, xe, ye, pw, ph).unwrap();
        prop_assert_eq!(w.pixel_count(), (xe - xs + 1) as u32 * (ye - ys + 1) as u32);
        prop_assert!(w.pixel_count() <= pw as u32 * ph as u32);
    }

    #[test]
    fn prop_out_of_bounds_rejected(
        (pw, ph) in panel(),
        xe in any::<u16>(),
        ye in any::<u16>(),
    ) {
        prop_assume!(xe >= pw || ye >= ph);
        prop_assert_eq!(
            AddressWindow::new(0, 0, xe, ye, pw, ph),
            Err(WindowError::OutOfBounds)
        );
    }

    #[test]
    fn prop_from_rect_matches_corners(
        (pw, ph) in panel(),
        x in 0u16..200,
        y in 0u16..400,
        w in 1u16..=40,
        h in 1u16..=7,
    ) {
        let rect = AddressWindow::from_rect(x, y, w, h, pw, ph).unwrap();
        prop_assert_eq!(rect, AddressWindow::new(x, y, x + w - 1, y + h - 1, pw, ph).unwrap());
        prop_assert_eq!((rect.width(), rect.height()), (w, h));
    }

    #[test]
    fn prop_params_encode_span(xs in any::<u16>(), len in 0u16..512) {
        let xe = xs.saturating_add(len);
        let w = AddressWindow::new(xs, 0, xe, 0, u16::MAX, 1);
        prop_assume!(w.is_ok());
        let params = w.unwrap().column_params();
        prop_assert_eq!(u16::from_be_bytes([params[0], params[1]]), xs);
        prop_assert_eq!(u16::from_be_bytes([params[2], params[3]]), xe);
    }
}
