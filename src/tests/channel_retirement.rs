//! Covers the interaction between channel retirement and payment tasks
//! still referencing the retired channel.

use web3::types::{
	Address,
	H256,
	U64,
};

use crate::{
	machine::chain,
	tests::factories,
	types::{
		primitives::{
			ChannelIdentifier,
			TokenAmount,
		},
		state_change::{
			ActionInitTarget,
			ContractReceiveChannelBatchUnlock,
		},
	},
	views,
};

#[test]
fn batch_unlock_retires_the_channel_and_any_target_task_on_it() {
	let payment_network_address = Address::random();
	let token_address = Address::random();
	let token_network_address = Address::random();
	let channel_identifier = ChannelIdentifier::from(1u64);
	let our_address = Address::random();
	let initiator = Address::random();
	let secrethash = H256::random();

	let node_state = factories::node_state_with_channel(
		payment_network_address,
		token_address,
		token_network_address,
		channel_identifier,
		our_address,
		initiator,
	);

	let transfer = factories::locked_transfer(
		1,
		token_address,
		initiator,
		our_address,
		secrethash,
		TokenAmount::from(10u64),
		U64::from(200u64),
		token_network_address,
		channel_identifier,
	);
	let result = chain::state_transition(node_state, ActionInitTarget { transfer }.into())
		.expect("target install should succeed");
	assert!(views::get_payment_task(&result.new_state, &secrethash).is_some());

	let state_change = ContractReceiveChannelBatchUnlock {
		token_network_identifier: token_network_address,
		channel_identifier,
		participant: our_address,
		partner: initiator,
	};
	let result = chain::state_transition(result.new_state, state_change.into()).expect("batch unlock should succeed");

	assert!(views::get_channels(&result.new_state).is_empty());
	assert!(
		views::get_payment_task(&result.new_state, &secrethash).is_none(),
		"target task referencing the retired channel must not survive"
	);
}

#[test]
fn batch_unlock_leaves_unrelated_target_tasks_alone() {
	let payment_network_address = Address::random();
	let token_address = Address::random();
	let token_network_address = Address::random();
	let channel_a = ChannelIdentifier::from(1u64);
	let channel_b = ChannelIdentifier::from(2u64);
	let our_address = Address::random();
	let initiator_a = Address::random();
	let initiator_b = Address::random();
	let secrethash_a = H256::random();
	let secrethash_b = H256::random();

	let node_state = factories::node_state_with_channel(
		payment_network_address,
		token_address,
		token_network_address,
		channel_a,
		our_address,
		initiator_a,
	);
	let node_state = factories::node_state_with_channel_added(
		node_state,
		token_network_address,
		channel_b,
		our_address,
		initiator_b,
	);

	let transfer_a = factories::locked_transfer(
		1,
		token_address,
		initiator_a,
		our_address,
		secrethash_a,
		TokenAmount::from(10u64),
		U64::from(200u64),
		token_network_address,
		channel_a,
	);
	let result = chain::state_transition(node_state, ActionInitTarget { transfer: transfer_a }.into())
		.expect("first target install should succeed");

	let transfer_b = factories::locked_transfer(
		2,
		token_address,
		initiator_b,
		our_address,
		secrethash_b,
		TokenAmount::from(10u64),
		U64::from(200u64),
		token_network_address,
		channel_b,
	);
	let result = chain::state_transition(result.new_state, ActionInitTarget { transfer: transfer_b }.into())
		.expect("second target install should succeed");

	let state_change = ContractReceiveChannelBatchUnlock {
		token_network_identifier: token_network_address,
		channel_identifier: channel_a,
		participant: our_address,
		partner: initiator_a,
	};
	let result = chain::state_transition(result.new_state, state_change.into()).expect("batch unlock should succeed");

	assert!(views::get_payment_task(&result.new_state, &secrethash_a).is_none());
	assert!(views::get_payment_task(&result.new_state, &secrethash_b).is_some());
}
