//! The target sub-machine. Drives a payment from the node that is the
//! final recipient: requests the secret, reveals it off-chain once
//! received, and reports the on-chain unlock.

use crate::{
	errors::StateTransitionError,
	machine::utils,
	types::{
		event::{
			Event,
			SendMessageEvent,
			SendSecretRequest,
			UnlockSuccess,
		},
		primitives::{
			BlockNumber,
			Random,
		},
		state::{
			TargetState,
			TargetTransferState,
		},
		state_change::{
			ActionInitTarget,
			ReceiveSecretReveal,
			ReceiveUnlock,
			StateChange,
		},
	},
};

type TransitionResult = std::result::Result<TargetTransition, StateTransitionError>;

/// Outcome of applying a state change to a target task. `new_state` is
/// `None` once the transfer has unlocked on-chain or expired unclaimed.
pub struct TargetTransition {
	pub new_state: Option<TargetTransferState>,
	pub events: Vec<Event>,
}

fn handle_init(state_change: ActionInitTarget, pseudo_random_generator: &mut Random) -> TransitionResult {
	let transfer = state_change.transfer;
	let event = SendSecretRequest {
		recipient: transfer.initiator,
		queue_name: crate::constants::GLOBAL_QUEUE_NAME.to_string(),
		message_identifier: pseudo_random_generator.next_u64(),
		secrethash: transfer.lock.secrethash,
	};
	let new_state = TargetTransferState { transfer, secret: None, state: TargetState::SecretRequest };
	Ok(TargetTransition {
		new_state: Some(new_state),
		events: vec![Event::from(SendMessageEvent::SendSecretRequest(event))],
	})
}

fn handle_secret_reveal(
	target_state: Option<TargetTransferState>,
	state_change: ReceiveSecretReveal,
) -> TransitionResult {
	let mut target_state = match target_state {
		Some(target_state) => target_state,
		None => return Ok(TargetTransition { new_state: None, events: vec![] }),
	};
	if !utils::is_valid_secret_reveal(&state_change, target_state.transfer.lock.secrethash) {
		return Ok(TargetTransition { new_state: Some(target_state), events: vec![] });
	}
	target_state.secret = Some(state_change.secret);
	target_state.state = TargetState::OffchainSecretReveal;
	Ok(TargetTransition { new_state: Some(target_state), events: vec![] })
}

fn handle_unlock(target_state: Option<TargetTransferState>, _state_change: ReceiveUnlock) -> TransitionResult {
	let target_state = match target_state {
		Some(target_state) => target_state,
		None => return Ok(TargetTransition { new_state: None, events: vec![] }),
	};
	let secrethash = target_state.transfer.lock.secrethash;
	Ok(TargetTransition { new_state: None, events: vec![Event::from(UnlockSuccess { secrethash })] })
}

fn handle_block(target_state: Option<TargetTransferState>, block_number: BlockNumber) -> TransitionResult {
	let target_state = match target_state {
		Some(target_state) => target_state,
		None => return Ok(TargetTransition { new_state: None, events: vec![] }),
	};

	if block_number > target_state.transfer.lock.expiration && target_state.secret.is_none() {
		return Ok(TargetTransition { new_state: None, events: vec![] });
	}

	Ok(TargetTransition { new_state: Some(target_state), events: vec![] })
}

pub fn state_transition(
	target_state: Option<TargetTransferState>,
	state_change: StateChange,
	pseudo_random_generator: &mut Random,
	block_number: BlockNumber,
) -> TransitionResult {
	match state_change {
		StateChange::ActionInitTarget(inner) => handle_init(inner, pseudo_random_generator),
		StateChange::ReceiveSecretReveal(inner) => handle_secret_reveal(target_state, inner),
		StateChange::ReceiveUnlock(inner) => handle_unlock(target_state, inner),
		StateChange::Block(_) => handle_block(target_state, block_number),
		_ => Ok(TargetTransition { new_state: target_state, events: vec![] }),
	}
}
