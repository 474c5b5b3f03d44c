//! The node-level reducer (`chain`) and the external sub-machine contracts
//! it dispatches into. Everything below `chain` is a pure
//! `(state, change, ctx) -> (state, events)` function; none of them read
//! the clock, touch the network, or retry internally.

pub mod channel;
pub mod chain;
pub mod initiator_manager;
pub mod mediator;
pub mod target;
pub mod token_network;
pub mod utils;
