//! The token-network sub-machine. Owns the set of channels denominated in
//! one token and routes channel-scoped state changes to the right one.

use crate::{
	errors::StateTransitionError,
	machine::channel,
	types::{
		event::Event,
		primitives::{
			Address,
			BlockNumber,
			ChannelIdentifier,
			Random,
		},
		state::TokenNetworkState,
		state_change::StateChange,
	},
};

type TransitionResult = std::result::Result<TokenNetworkTransition, StateTransitionError>;

/// Outcome of applying a state change to a token network. `new_state.is_empty()`
/// tells the caller this token network should be retired.
pub struct TokenNetworkTransition {
	pub new_state: TokenNetworkState,
	pub events: Vec<Event>,
}

fn channel_id_for_peer(token_network_state: &TokenNetworkState, peer: &Address) -> Option<ChannelIdentifier> {
	token_network_state
		.partneraddresses_to_channelidentifiers
		.get(peer)
		.and_then(|ids| ids.first())
		.copied()
}

fn dispatch_to_channel(
	mut token_network_state: TokenNetworkState,
	channel_identifier: ChannelIdentifier,
	state_change: StateChange,
	block_number: BlockNumber,
	pseudo_random_generator: &mut Random,
) -> TransitionResult {
	let channel_state = match token_network_state.channelidentifiers_to_channels.get(&channel_identifier) {
		Some(channel_state) => channel_state.clone(),
		None => return Ok(TokenNetworkTransition { new_state: token_network_state, events: vec![] }),
	};

	let transition = channel::state_transition(channel_state, state_change, block_number, pseudo_random_generator)?;

	match transition.new_state {
		Some(new_channel_state) => {
			token_network_state
				.channelidentifiers_to_channels
				.insert(channel_identifier, new_channel_state);
		}
		None => {
			if let Some(channel_state) = token_network_state.channelidentifiers_to_channels.remove(&channel_identifier) {
				if let Some(ids) = token_network_state
					.partneraddresses_to_channelidentifiers
					.get_mut(&channel_state.partner_state.address)
				{
					ids.retain(|id| *id != channel_identifier);
				}
			}
		}
	}

	Ok(TokenNetworkTransition { new_state: token_network_state, events: transition.events })
}

pub fn state_transition(
	token_network_state: TokenNetworkState,
	state_change: StateChange,
	block_number: BlockNumber,
	pseudo_random_generator: &mut Random,
) -> TransitionResult {
	match &state_change {
		StateChange::ActionChannelClose(inner) => {
			let channel_identifier = inner.channel_identifier;
			dispatch_to_channel(token_network_state, channel_identifier, state_change, block_number, pseudo_random_generator)
		}
		StateChange::ContractReceiveChannelClosed(inner) => {
			let channel_identifier = inner.channel_identifier;
			dispatch_to_channel(token_network_state, channel_identifier, state_change, block_number, pseudo_random_generator)
		}
		StateChange::ContractReceiveChannelNewBalance(inner) => {
			let channel_identifier = inner.channel_identifier;
			dispatch_to_channel(token_network_state, channel_identifier, state_change, block_number, pseudo_random_generator)
		}
		StateChange::ContractReceiveChannelSettled(inner) => {
			let channel_identifier = inner.channel_identifier;
			dispatch_to_channel(token_network_state, channel_identifier, state_change, block_number, pseudo_random_generator)
		}
		StateChange::ContractReceiveChannelNew(inner) => {
			let mut token_network_state = token_network_state;
			let channel_identifier = inner.channel_state.canonical_identifier.channel_identifier;
			let partner = inner.channel_state.partner_state.address;
			token_network_state
				.channelidentifiers_to_channels
				.insert(channel_identifier, inner.channel_state.clone());
			token_network_state
				.partneraddresses_to_channelidentifiers
				.entry(partner)
				.or_default()
				.push(channel_identifier);
			Ok(TokenNetworkTransition { new_state: token_network_state, events: vec![] })
		}
		StateChange::ContractReceiveRouteNew(_) =>
			Ok(TokenNetworkTransition { new_state: token_network_state, events: vec![] }),
		StateChange::ActionTransferDirect(inner) => {
			let channel_identifier = match channel_id_for_peer(&token_network_state, &inner.receiver_address) {
				Some(id) => id,
				None => return Ok(TokenNetworkTransition { new_state: token_network_state, events: vec![] }),
			};
			dispatch_to_channel(token_network_state, channel_identifier, state_change, block_number, pseudo_random_generator)
		}
		StateChange::ReceiveTransferDirect(inner) => {
			let channel_identifier = inner.balance_proof.channel_identifier;
			dispatch_to_channel(token_network_state, channel_identifier, state_change, block_number, pseudo_random_generator)
		}
		_ => Ok(TokenNetworkTransition { new_state: token_network_state, events: vec![] }),
	}
}
