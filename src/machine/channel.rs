//! The channel sub-machine. Tracks one bilateral balance and answers to the
//! handful of state changes that are scoped to a single channel.
//!
//! This is deliberately the thin slice of the real protocol needed to drive
//! routing and lifecycle decisions at the node level: balance-proof
//! validation, lock bookkeeping and dispute resolution live outside this
//! crate.

use crate::{
	constants::GLOBAL_QUEUE_NAME,
	errors::StateTransitionError,
	types::{
		event::{
			ContractSendChannelClose,
			Event,
			SendDirectTransfer,
			SendMessageEvent,
		},
		primitives::Random,
		state::{
			ChannelState,
			ChannelStatus,
		},
		state_change::{
			ActionChannelClose,
			ActionTransferDirect,
			ContractReceiveChannelClosed,
			ContractReceiveChannelNewBalance,
			ContractReceiveChannelSettled,
			ReceiveTransferDirect,
			StateChange,
		},
	},
};

type TransitionResult = std::result::Result<ChannelTransition, StateTransitionError>;

/// Outcome of applying a state change to a single channel. `new_state` is
/// `None` once the channel has settled and has nothing left to track.
pub struct ChannelTransition {
	pub new_state: Option<ChannelState>,
	pub events: Vec<Event>,
}

fn handle_block(channel_state: ChannelState, _block_number: crate::types::primitives::BlockNumber) -> TransitionResult {
	Ok(ChannelTransition { new_state: Some(channel_state), events: vec![] })
}

fn handle_action_close(channel_state: ChannelState, _state_change: ActionChannelClose) -> TransitionResult {
	let mut channel_state = channel_state;
	channel_state.status = ChannelStatus::Closing;
	let event = ContractSendChannelClose {
		canonical_identifier: channel_state.canonical_identifier,
		balance_proof_token_network_address: Some(channel_state.canonical_identifier.token_network_address),
	};
	Ok(ChannelTransition { new_state: Some(channel_state), events: vec![event.into()] })
}

fn handle_channel_closed(
	mut channel_state: ChannelState,
	_state_change: ContractReceiveChannelClosed,
) -> TransitionResult {
	channel_state.status = ChannelStatus::Closed;
	Ok(ChannelTransition { new_state: Some(channel_state), events: vec![] })
}

fn handle_channel_new_balance(
	mut channel_state: ChannelState,
	state_change: ContractReceiveChannelNewBalance,
) -> TransitionResult {
	if state_change.participant == channel_state.our_state.address {
		channel_state.our_state.balance = channel_state.our_state.balance + state_change.deposit_transaction;
	} else if state_change.participant == channel_state.partner_state.address {
		channel_state.partner_state.balance = channel_state.partner_state.balance + state_change.deposit_transaction;
	}
	Ok(ChannelTransition { new_state: Some(channel_state), events: vec![] })
}

fn handle_channel_settled(
	_channel_state: ChannelState,
	_state_change: ContractReceiveChannelSettled,
) -> TransitionResult {
	Ok(ChannelTransition { new_state: None, events: vec![] })
}

fn handle_action_transfer_direct(
	mut channel_state: ChannelState,
	state_change: ActionTransferDirect,
	pseudo_random_generator: &mut Random,
) -> TransitionResult {
	channel_state.our_state.balance = channel_state.our_state.balance - state_change.amount;
	channel_state.partner_state.balance = channel_state.partner_state.balance + state_change.amount;
	let event = SendDirectTransfer {
		recipient: state_change.receiver_address,
		queue_name: GLOBAL_QUEUE_NAME.to_string(),
		message_identifier: pseudo_random_generator.next_u64(),
		payment_identifier: state_change.payment_identifier,
		transferred_amount: state_change.amount,
	};
	Ok(ChannelTransition {
		new_state: Some(channel_state),
		events: vec![Event::from(SendMessageEvent::SendDirectTransfer(event))],
	})
}

fn handle_receive_transfer_direct(
	mut channel_state: ChannelState,
	transferred_amount: crate::types::primitives::TokenAmount,
) -> TransitionResult {
	channel_state.partner_state.balance = channel_state.partner_state.balance - transferred_amount;
	channel_state.our_state.balance = channel_state.our_state.balance + transferred_amount;
	Ok(ChannelTransition { new_state: Some(channel_state), events: vec![] })
}

/// Generate the close event for a channel that is about to be abandoned,
/// e.g. because the node is leaving every network. Pure: does not mutate
/// `channel_state`.
pub fn events_for_close(channel_state: &ChannelState) -> Vec<Event> {
	if channel_state.status != ChannelStatus::Opened {
		return vec![];
	}
	vec![ContractSendChannelClose {
		canonical_identifier: channel_state.canonical_identifier,
		balance_proof_token_network_address: Some(channel_state.canonical_identifier.token_network_address),
	}
	.into()]
}

pub fn state_transition(
	channel_state: ChannelState,
	state_change: StateChange,
	block_number: crate::types::primitives::BlockNumber,
	pseudo_random_generator: &mut Random,
) -> TransitionResult {
	match state_change {
		StateChange::Block(_) => handle_block(channel_state, block_number),
		StateChange::ActionChannelClose(inner) => handle_action_close(channel_state, inner),
		StateChange::ContractReceiveChannelClosed(inner) => handle_channel_closed(channel_state, inner),
		StateChange::ContractReceiveChannelNewBalance(inner) => handle_channel_new_balance(channel_state, inner),
		StateChange::ContractReceiveChannelSettled(inner) => handle_channel_settled(channel_state, inner),
		StateChange::ActionTransferDirect(inner) =>
			handle_action_transfer_direct(channel_state, inner, pseudo_random_generator),
		StateChange::ReceiveTransferDirect(ReceiveTransferDirect { balance_proof, .. }) =>
			handle_receive_transfer_direct(channel_state, balance_proof.transferred_amount),
		_ => Ok(ChannelTransition { new_state: Some(channel_state), events: vec![] }),
	}
}
