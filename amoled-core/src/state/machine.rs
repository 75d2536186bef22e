//! State machine definition
//!
//! Every operation of the driver is gated on the current state, and every
//! step of bring-up, sleep and wake is an event.

use super::events::Event;

/// Driver lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No board selected, nothing claimed
    #[default]
    Uninitialized,
    /// Bus claimed and panel out of reset
    BusReady,
    /// Panel init sequence done
    PanelReady,
    /// Peripherals up
    PeripheralsReady,
    /// Accepting addressing-window and pixel-push calls
    Active,
    /// Panel and peripherals in low-power mode
    Asleep,
}

impl State {
    /// Check if the display bus is claimed in this state
    pub fn bus_claimed(&self) -> bool {
        !matches!(self, State::Uninitialized)
    }

    /// Check if pixel traffic is allowed
    pub fn accepts_pixels(&self) -> bool {
        matches!(self, State::Active)
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Bring-up runs strictly forward
            (Uninitialized, BusClaimed) => BusReady,
            (BusReady, PanelInitialized) => PanelReady,
            (PanelReady, PeripheralsInitialized) => PeripheralsReady,
            (PeripheralsReady, Activated) => Active,

            // Any failure during bring-up drops back to the start
            (BusReady | PanelReady | PeripheralsReady, BringUpFailed) => Uninitialized,
            (Uninitialized, BringUpFailed) => Uninitialized,

            // Power management
            (Active, Slept) => Asleep,
            (Asleep, Woken) => Active,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_bring_up() {
        let state = State::Uninitialized
            .transition(Event::BusClaimed)
            .transition(Event::PanelInitialized)
            .transition(Event::PeripheralsInitialized)
            .transition(Event::Activated);
        assert_eq!(state, State::Active);
    }

    #[test]
    fn test_failure_from_any_bring_up_state() {
        let states = [State::BusReady, State::PanelReady, State::PeripheralsReady];

        for state in states {
            let next = state.transition(Event::BringUpFailed);
            assert_eq!(next, State::Uninitialized);
            assert!(!next.bus_claimed());
        }
    }

    #[test]
    fn test_steps_cannot_be_skipped() {
        assert_eq!(
            State::Uninitialized.transition(Event::PanelInitialized),
            State::Uninitialized
        );
        assert_eq!(
            State::BusReady.transition(Event::Activated),
            State::BusReady
        );
    }

    #[test]
    fn test_sleep_wake_cycle() {
        let asleep = State::Active.transition(Event::Slept);
        assert_eq!(asleep, State::Asleep);
        assert!(!asleep.accepts_pixels());
        assert!(asleep.bus_claimed());

        let awake = asleep.transition(Event::Woken);
        assert_eq!(awake, State::Active);
        assert!(awake.accepts_pixels());
    }

    #[test]
    fn test_no_teardown_from_active() {
        // There is no path from Active or Asleep back to Uninitialized
        assert_eq!(State::Active.transition(Event::BringUpFailed), State::Active);
        assert_eq!(State::Asleep.transition(Event::BringUpFailed), State::Asleep);
    }

    #[test]
    fn test_sleep_only_from_active() {
        assert_eq!(State::PanelReady.transition(Event::Slept), State::PanelReady);
        assert_eq!(State::Active.transition(Event::Woken), State::Active);
    }
}
