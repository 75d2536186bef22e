//! Events that trigger lifecycle transitions

/// Events reported by the lifecycle controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Bring-up events
    /// Bus claimed and panel reset
    BusClaimed,
    /// Panel init sequence sent and default brightness applied
    PanelInitialized,
    /// All peripherals present on the board brought up
    PeripheralsInitialized,
    /// Bring-up finished, driver accepts pixel traffic
    Activated,
    /// A bring-up step failed; everything acquired so far was released
    BringUpFailed,

    // Power events
    /// Panel and peripherals put into low-power mode
    Slept,
    /// Peripherals restored and panel lit again
    Woken,
}
