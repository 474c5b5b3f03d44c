//! The mediator sub-machine. Pairs a payer leg with a payee leg for a
//! relayed transfer and keeps the two in lockstep as the secret is
//! revealed and the lock is settled.

use crate::{
	errors::StateTransitionError,
	machine::utils,
	types::{
		event::{
			Event,
			SendMessageEvent,
			SendSecretReveal,
			UnlockSuccess,
		},
		primitives::{
			BlockNumber,
			Random,
		},
		state::{
			MediationPairState,
			MediatorTransferState,
			PayeeState,
			PayerState,
		},
		state_change::{
			ActionInitMediator,
			ContractReceiveSecretReveal,
			ReceiveSecretReveal,
			ReceiveUnlock,
			StateChange,
		},
	},
};

type TransitionResult = std::result::Result<MediatorTransition, StateTransitionError>;

/// Outcome of applying a state change to a mediator task. `new_state` is
/// `None` once every transfer pair has been settled or has expired.
pub struct MediatorTransition {
	pub new_state: Option<MediatorTransferState>,
	pub events: Vec<Event>,
}

fn handle_init(state_change: ActionInitMediator) -> TransitionResult {
	let payer_transfer = state_change.from_transfer;
	let secrethash = payer_transfer.lock.secrethash;
	let pair = MediationPairState {
		payer_transfer: payer_transfer.clone(),
		payee_transfer: payer_transfer,
		payer_state: PayerState::Pending,
		payee_state: PayeeState::Pending,
	};
	let new_state = MediatorTransferState {
		secrethash,
		routes: state_change.routes,
		secret: None,
		transfers_pair: vec![pair],
	};
	Ok(MediatorTransition { new_state: Some(new_state), events: vec![] })
}

fn reveal_to_payee(mediator_state: &mut MediatorTransferState, pseudo_random_generator: &mut Random) -> Vec<Event> {
	let secret = match &mediator_state.secret {
		Some(secret) => secret.clone(),
		None => return vec![],
	};
	let mut events = vec![];
	for pair in mediator_state.transfers_pair.iter_mut() {
		if pair.payee_state != PayeeState::Pending {
			continue;
		}
		pair.payee_state = PayeeState::SecretRevealed;
		events.push(Event::from(SendMessageEvent::SendSecretReveal(SendSecretReveal {
			recipient: pair.payee_transfer.target,
			queue_name: crate::constants::GLOBAL_QUEUE_NAME.to_string(),
			message_identifier: pseudo_random_generator.next_u64(),
			secret: secret.clone(),
			secrethash: pair.payee_transfer.lock.secrethash,
		})));
	}
	events
}

fn handle_offchain_secret_reveal(
	mediator_state: Option<MediatorTransferState>,
	state_change: ReceiveSecretReveal,
	pseudo_random_generator: &mut Random,
) -> TransitionResult {
	let mut mediator_state = match mediator_state {
		Some(mediator_state) => mediator_state,
		None => return Ok(MediatorTransition { new_state: None, events: vec![] }),
	};
	if !utils::is_valid_secret_reveal(&state_change, mediator_state.secrethash) {
		return Ok(MediatorTransition { new_state: Some(mediator_state), events: vec![] });
	}
	mediator_state.secret = Some(state_change.secret);
	for pair in mediator_state.transfers_pair.iter_mut() {
		pair.payer_state = PayerState::SecretRevealed;
	}
	let events = reveal_to_payee(&mut mediator_state, pseudo_random_generator);
	Ok(MediatorTransition { new_state: Some(mediator_state), events })
}

fn handle_onchain_secret_reveal(
	mediator_state: Option<MediatorTransferState>,
	state_change: ContractReceiveSecretReveal,
	pseudo_random_generator: &mut Random,
) -> TransitionResult {
	let mut mediator_state = match mediator_state {
		Some(mediator_state) => mediator_state,
		None => return Ok(MediatorTransition { new_state: None, events: vec![] }),
	};
	if !utils::is_valid_onchain_secret_reveal(&state_change, mediator_state.secrethash) {
		return Ok(MediatorTransition { new_state: Some(mediator_state), events: vec![] });
	}
	mediator_state.secret = Some(state_change.secret);
	for pair in mediator_state.transfers_pair.iter_mut() {
		pair.payer_state = PayerState::SecretRevealed;
	}
	let events = reveal_to_payee(&mut mediator_state, pseudo_random_generator);
	Ok(MediatorTransition { new_state: Some(mediator_state), events })
}

fn handle_unlock(mediator_state: Option<MediatorTransferState>, _state_change: ReceiveUnlock) -> TransitionResult {
	let mediator_state = match mediator_state {
		Some(mediator_state) => mediator_state,
		None => return Ok(MediatorTransition { new_state: None, events: vec![] }),
	};
	let secrethash = mediator_state.secrethash;
	Ok(MediatorTransition { new_state: None, events: vec![Event::from(UnlockSuccess { secrethash })] })
}

fn handle_block(mediator_state: Option<MediatorTransferState>, block_number: BlockNumber) -> TransitionResult {
	let mediator_state = match mediator_state {
		Some(mediator_state) => mediator_state,
		None => return Ok(MediatorTransition { new_state: None, events: vec![] }),
	};

	let all_expired = mediator_state
		.transfers_pair
		.iter()
		.all(|pair| block_number > pair.payer_transfer.lock.expiration && pair.payer_state == PayerState::Pending);

	if all_expired && !mediator_state.transfers_pair.is_empty() {
		return Ok(MediatorTransition { new_state: None, events: vec![] });
	}

	Ok(MediatorTransition { new_state: Some(mediator_state), events: vec![] })
}

pub fn state_transition(
	mediator_state: Option<MediatorTransferState>,
	state_change: StateChange,
	pseudo_random_generator: &mut Random,
	block_number: BlockNumber,
) -> TransitionResult {
	match state_change {
		StateChange::ActionInitMediator(inner) => handle_init(inner),
		StateChange::ReceiveSecretReveal(inner) =>
			handle_offchain_secret_reveal(mediator_state, inner, pseudo_random_generator),
		StateChange::ContractReceiveSecretReveal(inner) =>
			handle_onchain_secret_reveal(mediator_state, inner, pseudo_random_generator),
		StateChange::ReceiveUnlock(inner) => handle_unlock(mediator_state, inner),
		StateChange::Block(_) => handle_block(mediator_state, block_number),
		_ => Ok(MediatorTransition { new_state: mediator_state, events: vec![] }),
	}
}
