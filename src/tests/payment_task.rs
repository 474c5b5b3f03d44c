use web3::types::{
	Address,
	H256,
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
		state::{
			PaymentTask,
			TargetState,
			TransferState,
		},
		state_change::{
			ActionInitInitiator,
			ActionInitTarget,
			Block,
			ReceiveSecretReveal,
		},
	},
	views,
};

fn setup_channel() -> (crate::types::state::NodeState, Address, Address, Address, Address, Address) {
	let payment_network_address = Address::random();
	let token_address = Address::random();
	let token_network_address = Address::random();
	let our_address = Address::random();
	let counterparty = Address::random();

	let node_state = factories::node_state_with_channel(
		payment_network_address,
		token_address,
		token_network_address,
		ChannelIdentifier::from(1u64),
		our_address,
		counterparty,
	);
	(node_state, payment_network_address, token_address, token_network_address, our_address, counterparty)
}

#[test]
fn initiator_sends_locked_transfer_then_reveals_on_secret() {
	let (node_state, _, token_address, token_network_address, our_address, target) = setup_channel();
	let secrethash = H256::random();

	let transfer = factories::locked_transfer(
		1,
		token_address,
		our_address,
		target,
		secrethash,
		TokenAmount::from(10u64),
		U64::from(200u64),
		token_network_address,
		ChannelIdentifier::from(1u64),
	);
	let result = chain::state_transition(node_state, ActionInitInitiator { transfer, routes: vec![] }.into())
		.expect("init should succeed");
	assert!(matches!(
		result.events.as_slice(),
		[Event::SendMessage(SendMessageEvent::SendLockedTransfer(_))]
	));
	let task = views::get_payment_task(&result.new_state, &secrethash).expect("task installed");
	let initiator_task = match task {
		PaymentTask::Initiator(initiator_task) => initiator_task,
		other => panic!("expected an initiator task, got {:?}", other),
	};
	assert_eq!(initiator_task.manager_state.transfer_state, TransferState::Pending);

	let state_change = ReceiveSecretReveal { secrethash, secret: Default::default() };
	let result = chain::state_transition(result.new_state, state_change.into()).expect("reveal should succeed");
	assert!(matches!(
		result.events.as_slice(),
		[Event::SendMessage(SendMessageEvent::SendSecretReveal(_))]
	));
	let task = views::get_payment_task(&result.new_state, &secrethash).expect("task still installed");
	let initiator_task = match task {
		PaymentTask::Initiator(initiator_task) => initiator_task,
		other => panic!("expected an initiator task, got {:?}", other),
	};
	assert_eq!(initiator_task.manager_state.transfer_state, TransferState::SecretRevealed);
}

#[test]
fn initiator_expires_on_block_past_lock_expiration() {
	let (node_state, _, token_address, token_network_address, our_address, target) = setup_channel();
	let secrethash = H256::random();

	let transfer = factories::locked_transfer(
		1,
		token_address,
		our_address,
		target,
		secrethash,
		TokenAmount::from(10u64),
		U64::from(5u64),
		token_network_address,
		ChannelIdentifier::from(1u64),
	);
	let result = chain::state_transition(node_state, ActionInitInitiator { transfer, routes: vec![] }.into())
		.expect("init should succeed");

	let state_change = Block { block_number: U64::from(6u64), block_hash: Default::default() };
	let result = chain::state_transition(result.new_state, state_change.into()).expect("block should succeed");

	assert!(views::get_payment_task(&result.new_state, &secrethash).is_none());
}

#[test]
fn target_requests_secret_then_reveals_offchain() {
	let (node_state, _, token_address, token_network_address, initiator, our_address) = setup_channel();
	let secrethash = H256::random();

	let transfer = factories::locked_transfer(
		1,
		token_address,
		initiator,
		our_address,
		secrethash,
		TokenAmount::from(10u64),
		U64::from(200u64),
		token_network_address,
		ChannelIdentifier::from(1u64),
	);
	let result = chain::state_transition(node_state, ActionInitTarget { transfer }.into())
		.expect("init should succeed");
	assert!(matches!(
		result.events.as_slice(),
		[Event::SendMessage(SendMessageEvent::SendSecretRequest(_))]
	));
	let task = views::get_payment_task(&result.new_state, &secrethash).expect("task installed");
	let target_task = match task {
		PaymentTask::Target(target_task) => target_task,
		other => panic!("expected a target task, got {:?}", other),
	};
	assert_eq!(target_task.target_state.state, TargetState::SecretRequest);

	let state_change = ReceiveSecretReveal { secrethash, secret: Default::default() };
	let result = chain::state_transition(result.new_state, state_change.into()).expect("reveal should succeed");
	let task = views::get_payment_task(&result.new_state, &secrethash).expect("task still installed");
	let target_task = match task {
		PaymentTask::Target(target_task) => target_task,
		other => panic!("expected a target task, got {:?}", other),
	};
	assert_eq!(target_task.target_state.state, TargetState::OffchainSecretReveal);
}
