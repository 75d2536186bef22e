//! Driver lifecycle state machine
//!
//! Defines which operations are legal at each point of bring-up, sleep and
//! wake. The state machine is explicit, finite, and deterministic; the
//! lifecycle controller feeds it one event per completed (or failed) step.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
