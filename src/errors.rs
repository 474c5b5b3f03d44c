#![warn(clippy::missing_docs_in_private_items)]

use std::{
	error,
	fmt,
};

/// The state transition error type.
///
/// Carries failures surfaced unchanged from a sub-reducer back to the
/// caller. Broken invariants and unknown variants are not represented here
/// — they panic at the `sanity_check` call site instead, since they are not
/// meant to be recoverable.
#[derive(Debug, Clone)]
pub struct StateTransitionError {
	pub msg: String,
}

impl fmt::Display for StateTransitionError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.msg)
	}
}

impl error::Error for StateTransitionError {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		None
	}
}

impl From<String> for StateTransitionError {
	fn from(msg: String) -> Self {
		StateTransitionError { msg }
	}
}

impl From<&str> for StateTransitionError {
	fn from(msg: &str) -> Self {
		StateTransitionError { msg: msg.to_string() }
	}
}
