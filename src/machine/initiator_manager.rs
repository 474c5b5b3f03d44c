//! The initiator sub-machine. Drives a payment from the node that
//! originated it: sends the locked transfer, waits for the secret to come
//! back, and reports success or expiry.

use crate::{
	errors::StateTransitionError,
	machine::utils,
	types::{
		event::{
			Event,
			SendLockedTransfer,
			SendMessageEvent,
			SendSecretReveal,
		},
		primitives::{
			BlockNumber,
			Random,
		},
		state::{
			InitiatorPaymentState,
			TransferState,
		},
		state_change::{
			ActionInitInitiator,
			ReceiveSecretReveal,
			StateChange,
		},
	},
};

type TransitionResult = std::result::Result<InitiatorTransition, StateTransitionError>;

/// Outcome of applying a state change to an initiator task. `new_state` is
/// `None` once the payment has either succeeded, expired or been canceled.
pub struct InitiatorTransition {
	pub new_state: Option<InitiatorPaymentState>,
	pub events: Vec<Event>,
}

fn handle_init(state_change: ActionInitInitiator, pseudo_random_generator: &mut Random) -> TransitionResult {
	let transfer = state_change.transfer;
	let message_identifier = pseudo_random_generator.next_u64();
	let event = SendLockedTransfer {
		recipient: transfer.target,
		queue_name: crate::constants::GLOBAL_QUEUE_NAME.to_string(),
		message_identifier,
		payment_identifier: transfer.payment_identifier,
		secrethash: transfer.lock.secrethash,
	};
	let new_state = InitiatorPaymentState {
		routes: state_change.routes,
		transfer,
		transfer_state: TransferState::Pending,
	};
	Ok(InitiatorTransition {
		new_state: Some(new_state),
		events: vec![Event::from(SendMessageEvent::SendLockedTransfer(event))],
	})
}

fn handle_secret_reveal(
	manager_state: Option<InitiatorPaymentState>,
	state_change: ReceiveSecretReveal,
	pseudo_random_generator: &mut Random,
) -> TransitionResult {
	let mut manager_state = match manager_state {
		Some(manager_state) => manager_state,
		None => return Ok(InitiatorTransition { new_state: None, events: vec![] }),
	};

	if !utils::is_valid_secret_reveal(&state_change, manager_state.transfer.lock.secrethash) {
		return Ok(InitiatorTransition { new_state: Some(manager_state), events: vec![] });
	}

	manager_state.transfer_state = TransferState::SecretRevealed;
	let message_identifier = pseudo_random_generator.next_u64();
	let event = SendSecretReveal {
		recipient: manager_state.transfer.target,
		queue_name: crate::constants::GLOBAL_QUEUE_NAME.to_string(),
		message_identifier,
		secret: state_change.secret,
		secrethash: state_change.secrethash,
	};
	Ok(InitiatorTransition {
		new_state: Some(manager_state),
		events: vec![Event::from(SendMessageEvent::SendSecretReveal(event))],
	})
}

fn handle_block(manager_state: Option<InitiatorPaymentState>, block_number: BlockNumber) -> TransitionResult {
	let manager_state = match manager_state {
		Some(manager_state) => manager_state,
		None => return Ok(InitiatorTransition { new_state: None, events: vec![] }),
	};

	if block_number > manager_state.transfer.lock.expiration
		&& manager_state.transfer_state == TransferState::Pending
	{
		return Ok(InitiatorTransition { new_state: None, events: vec![] });
	}

	Ok(InitiatorTransition { new_state: Some(manager_state), events: vec![] })
}

pub fn state_transition(
	manager_state: Option<InitiatorPaymentState>,
	state_change: StateChange,
	pseudo_random_generator: &mut Random,
	block_number: BlockNumber,
) -> TransitionResult {
	match state_change {
		StateChange::ActionInitInitiator(inner) => handle_init(inner, pseudo_random_generator),
		StateChange::ReceiveSecretReveal(inner) => handle_secret_reveal(manager_state, inner, pseudo_random_generator),
		StateChange::ReceiveTransferRefund(_) | StateChange::ReceiveTransferRefundCancelRoute(_) =>
			Ok(InitiatorTransition { new_state: None, events: vec![] }),
		StateChange::Block(_) => handle_block(manager_state, block_number),
		_ => Ok(InitiatorTransition { new_state: manager_state, events: vec![] }),
	}
}
