#![warn(clippy::missing_docs_in_private_items)]

/// Constants shared across the state machine (timeouts, queue names, limits).
pub mod constants;
/// Error types returned by the state machine.
pub mod errors;
/// The node-level reducer, its sub-machine router and the external
/// sub-machine contracts (channel, token network, initiator, mediator,
/// target).
pub mod machine;
#[cfg(test)]
mod tests;
/// State, state-change and event types.
pub mod types;
/// Read-only lookups into `NodeState`.
pub mod views;

pub use machine::chain::state_transition;
pub use types::{
	state::NodeState,
	state_change::StateChange,
	event::Event,
};
