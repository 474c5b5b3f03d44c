use web3::types::{
	Address,
	U256,
	U64,
};

use crate::{
	machine::chain,
	tests::factories,
	types::{
		event::{
			Event,
			SendMessageEvent,
		},
		primitives::{
			ChannelIdentifier,
			TokenAmount,
		},
		state::ChannelStatus,
		state_change::{
			ActionChannelClose,
			ActionTransferDirect,
			ContractReceiveChannelClosed,
			ContractReceiveChannelNewBalance,
			ContractReceiveChannelSettled,
		},
	},
	views,
};

fn two_party_channel(our_address: Address, partner_address: Address) -> (crate::types::state::NodeState, Address, Address, ChannelIdentifier) {
	let payment_network_address = Address::random();
	let token_address = Address::random();
	let token_network_address = Address::random();
	let channel_identifier = ChannelIdentifier::from(1u64);

	let node_state = factories::node_state_with_channel(
		payment_network_address,
		token_address,
		token_network_address,
		channel_identifier,
		our_address,
		partner_address,
	);
	(node_state, token_network_address, partner_address, channel_identifier)
}

#[test]
fn action_transfer_direct_moves_balance_and_sends_message() {
	let our_address = Address::random();
	let partner_address = Address::random();
	let (node_state, token_network_address, _, _) = two_party_channel(our_address, partner_address);

	let state_change = ActionTransferDirect {
		token_network_identifier: token_network_address,
		receiver_address: partner_address,
		payment_identifier: 7,
		amount: TokenAmount::from(30u64),
	};
	let result = chain::state_transition(node_state, state_change.into()).expect("transfer should succeed");

	let channel = views::get_channels(&result.new_state).into_iter().next().expect("channel exists");
	assert_eq!(channel.our_state.balance, U256::from(70u64));
	assert_eq!(channel.partner_state.balance, U256::from(130u64));

	assert_eq!(result.events.len(), 1);
	match &result.events[0] {
		Event::SendMessage(SendMessageEvent::SendDirectTransfer(message)) => {
			assert_eq!(message.recipient, partner_address);
			assert_eq!(message.payment_identifier, 7);
			assert_eq!(message.transferred_amount, TokenAmount::from(30u64));
		}
		other => panic!("expected SendDirectTransfer, got {:?}", other),
	}
}

#[test]
fn action_channel_close_requests_onchain_close_once() {
	let our_address = Address::random();
	let partner_address = Address::random();
	let (node_state, token_network_address, _, channel_identifier) = two_party_channel(our_address, partner_address);

	let state_change = ActionChannelClose { token_network_identifier: token_network_address, channel_identifier };
	let result = chain::state_transition(node_state, state_change.into()).expect("close request should succeed");

	let channel = views::get_channels(&result.new_state).into_iter().next().expect("channel exists");
	assert_eq!(channel.status, ChannelStatus::Closing);
	assert_eq!(result.events.len(), 1);
	assert!(matches!(result.events[0], Event::ContractSendChannelClose(_)));
}

#[test]
fn contract_receive_channel_closed_then_settled_retires_the_channel() {
	let our_address = Address::random();
	let partner_address = Address::random();
	let (node_state, token_network_address, _, channel_identifier) = two_party_channel(our_address, partner_address);

	let state_change =
		ContractReceiveChannelClosed { token_network_identifier: token_network_address, channel_identifier };
	let result = chain::state_transition(node_state, state_change.into()).expect("closed should succeed");
	let channel = views::get_channels(&result.new_state).into_iter().next().expect("channel exists");
	assert_eq!(channel.status, ChannelStatus::Closed);

	let state_change =
		ContractReceiveChannelSettled { token_network_identifier: token_network_address, channel_identifier };
	let result = chain::state_transition(result.new_state, state_change.into()).expect("settled should succeed");

	assert!(views::get_channels(&result.new_state).is_empty());
	assert!(views::get_token_network(&result.new_state, &token_network_address).is_none());
}

#[test]
fn contract_receive_channel_new_balance_credits_the_right_participant() {
	let our_address = Address::random();
	let partner_address = Address::random();
	let (node_state, token_network_address, _, channel_identifier) = two_party_channel(our_address, partner_address);

	let state_change = ContractReceiveChannelNewBalance {
		token_network_identifier: token_network_address,
		channel_identifier,
		participant: partner_address,
		deposit_transaction: TokenAmount::from(50u64),
	};
	let result = chain::state_transition(node_state, state_change.into()).expect("deposit should succeed");

	let channel = views::get_channels(&result.new_state).into_iter().next().expect("channel exists");
	assert_eq!(channel.partner_state.balance, U256::from(150u64));
	assert_eq!(channel.our_state.balance, U256::from(100u64));
}

#[test]
fn block_to_unknown_channel_does_not_panic() {
	let node_state = factories::empty_node_state();
	let state_change = crate::types::state_change::Block { block_number: U64::from(2u64), block_hash: Default::default() };
	let result = chain::state_transition(node_state, state_change.into()).expect("block should succeed");
	assert_eq!(result.new_state.block_number, U64::from(2u64));
}
