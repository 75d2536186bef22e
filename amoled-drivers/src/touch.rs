//! Touch controller dispatch
//!
//! A platform supplies one adapter per supported controller family; the
//! board descriptor decides which one is live. Dispatch is a plain tagged
//! enum, no trait objects.

use amoled_core::config::{TouchModel, TouchPins};
use amoled_core::traits::TouchInput;

/// One adapter per supported touch controller family
pub struct TouchPair<A, B> {
    /// Hynitron CST816 adapter
    pub cst816: A,
    /// Chipsemi CHSC5816 adapter
    pub chsc5816: B,
}

impl<A, B> TouchPair<A, B> {
    /// Create a pair from both adapters
    pub fn new(cst816: A, chsc5816: B) -> Self {
        Self { cst816, chsc5816 }
    }

    /// Borrow the adapter for `model`
    pub fn select(&mut self, model: TouchModel) -> ActiveTouch<'_, A, B> {
        match model {
            TouchModel::Cst816 => ActiveTouch::Cst816(&mut self.cst816),
            TouchModel::Chsc5816 => ActiveTouch::Chsc5816(&mut self.chsc5816),
        }
    }
}

/// The touch adapter selected for the active board
pub enum ActiveTouch<'a, A, B> {
    /// CST816 is live
    Cst816(&'a mut A),
    /// CHSC5816 is live
    Chsc5816(&'a mut B),
}

impl<A, B> ActiveTouch<'_, A, B> {
    /// Controller family behind this handle
    pub fn model(&self) -> TouchModel {
        match self {
            ActiveTouch::Cst816(_) => TouchModel::Cst816,
            ActiveTouch::Chsc5816(_) => TouchModel::Chsc5816,
        }
    }
}

impl<A, B, E> TouchInput for ActiveTouch<'_, A, B>
where
    A: TouchInput<Error = E>,
    B: TouchInput<Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn begin(&mut self, pins: &TouchPins, max_x: u16, max_y: u16) -> Result<(), E> {
        match self {
            ActiveTouch::Cst816(t) => t.begin(pins, max_x, max_y),
            ActiveTouch::Chsc5816(t) => t.begin(pins, max_x, max_y),
        }
    }

    fn get_point(&mut self, xs: &mut [i16], ys: &mut [i16]) -> Result<u8, E> {
        match self {
            ActiveTouch::Cst816(t) => t.get_point(xs, ys),
            ActiveTouch::Chsc5816(t) => t.get_point(xs, ys),
        }
    }

    fn is_pressed(&mut self) -> bool {
        match self {
            ActiveTouch::Cst816(t) => t.is_pressed(),
            ActiveTouch::Chsc5816(t) => t.is_pressed(),
        }
    }

    fn sleep(&mut self) -> Result<(), E> {
        match self {
            ActiveTouch::Cst816(t) => t.sleep(),
            ActiveTouch::Chsc5816(t) => t.sleep(),
        }
    }

    fn wakeup(&mut self) -> Result<(), E> {
        match self {
            ActiveTouch::Cst816(t) => t.wakeup(),
            ActiveTouch::Chsc5816(t) => t.wakeup(),
        }
    }
}
