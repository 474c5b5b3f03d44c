use web3::types::{
	Address,
	H256,
	U64,
};

use crate::{
	machine::chain,
	tests::factories,
	types::{
		primitives::Random,
		state::{
			NodeState,
			PaymentTask,
		},
		state_change::{
			ActionInitInitiator,
			ActionInitMediator,
			ActionInitNode,
			Block,
			ContractReceiveNewPaymentNetwork,
			ReceiveUnlock,
		},
	},
	views,
};

#[test]
fn init_then_block() {
	let state_change = ActionInitNode { pseudo_random_generator: Random::new(42), block_number: U64::from(100u64) };
	let result = chain::state_transition(factories::empty_node_state(), state_change.into())
		.expect("init should succeed");
	assert_eq!(result.new_state.block_number, U64::from(100u64));

	let state_change = Block { block_number: U64::from(101u64), block_hash: H256::zero() };
	let result =
		chain::state_transition(result.new_state, state_change.into()).expect("block should succeed");
	assert_eq!(result.new_state.block_number, U64::from(101u64));
	assert!(result.events.is_empty());
}

#[test]
fn new_payment_network_is_idempotent() {
	let payment_network_address = Address::random();
	let state_change = ContractReceiveNewPaymentNetwork {
		payment_network: crate::types::state::PaymentNetworkState::new(payment_network_address, vec![]),
	};

	let result = chain::state_transition(factories::empty_node_state(), state_change.clone().into())
		.expect("first registration should succeed");
	assert!(result.events.is_empty());
	assert_eq!(result.new_state.identifiers_to_paymentnetworks.len(), 1);

	let result =
		chain::state_transition(result.new_state, state_change.into()).expect("second registration should succeed");
	assert!(result.events.is_empty());
	assert_eq!(result.new_state.identifiers_to_paymentnetworks.len(), 1);
}

#[test]
fn cross_variant_secrethash_collision_is_a_no_op() {
	let payment_network_address = Address::random();
	let token_address = Address::random();
	let token_network_address = Address::random();
	let our_address = Address::random();
	let target = Address::random();
	let secrethash = H256::random();

	let node_state = node_state_with_initiator_task(
		payment_network_address,
		token_address,
		token_network_address,
		our_address,
		target,
		secrethash,
	);

	let mediator_transfer = factories::locked_transfer(
		2,
		token_address,
		target,
		our_address,
		secrethash,
		crate::types::primitives::TokenAmount::from(10u64),
		U64::from(200u64),
		token_network_address,
		crate::types::primitives::ChannelIdentifier::from(1u64),
	);
	let state_change = ActionInitMediator { from_transfer: mediator_transfer, routes: vec![] };

	let result =
		chain::state_transition(node_state.clone(), state_change.into()).expect("collision must not error");
	assert!(result.events.is_empty());
	assert_eq!(result.new_state, node_state);

	let task = views::get_payment_task(&result.new_state, &secrethash).expect("initiator task survives");
	assert!(matches!(task, PaymentTask::Initiator(_)));
}

#[test]
fn task_retirement_removes_the_entry() {
	let payment_network_address = Address::random();
	let token_address = Address::random();
	let token_network_address = Address::random();
	let our_address = Address::random();
	let payer = Address::random();
	let secrethash = H256::random();

	let node_state = node_state_with_mediator_task(
		payment_network_address,
		token_address,
		token_network_address,
		our_address,
		payer,
		secrethash,
	);
	assert!(views::get_payment_task(&node_state, &secrethash).is_some());

	let state_change = ReceiveUnlock { secrethash, message_identifier: 1 };
	let result = chain::state_transition(node_state, state_change.into()).expect("unlock should succeed");

	assert!(views::get_payment_task(&result.new_state, &secrethash).is_none());
	assert_eq!(result.events.len(), 1);
}

#[test]
fn replaying_the_same_changes_from_the_same_seed_is_deterministic() {
	let payment_network_address = Address::random();
	let token_address = Address::random();
	let token_network_address = Address::random();

	let changes: Vec<crate::StateChange> = vec![
		ActionInitNode { pseudo_random_generator: Random::new(7), block_number: U64::from(1u64) }.into(),
		ContractReceiveNewPaymentNetwork {
			payment_network: crate::types::state::PaymentNetworkState::new(payment_network_address, vec![]),
		}
		.into(),
		crate::types::state_change::ContractReceiveNewTokenNetwork {
			payment_network_identifier: payment_network_address,
			token_network: crate::types::state::TokenNetworkState::new(token_network_address, token_address),
		}
		.into(),
		Block { block_number: U64::from(2u64), block_hash: H256::zero() }.into(),
	];

	let run = |changes: &[crate::StateChange]| {
		let mut node_state = NodeState::new(Random::new(7), U64::from(0u64));
		let mut all_events = vec![];
		for change in changes {
			let result = chain::state_transition(node_state, change.clone()).expect("each change should succeed");
			node_state = result.new_state;
			all_events.extend(result.events);
		}
		(node_state, all_events)
	};

	let (state_a, events_a) = run(&changes);
	let (state_b, events_b) = run(&changes);

	assert_eq!(state_a, state_b);
	assert_eq!(events_a, events_b);
	assert_eq!(state_a.identifiers_to_paymentnetworks.len(), 1);
}

fn node_state_with_mediator_task(
	payment_network_address: Address,
	token_address: Address,
	token_network_address: Address,
	our_address: Address,
	payer: Address,
	secrethash: H256,
) -> NodeState {
	let node_state = factories::node_state_with_channel(
		payment_network_address,
		token_address,
		token_network_address,
		crate::types::primitives::ChannelIdentifier::from(1u64),
		our_address,
		payer,
	);

	let from_transfer = factories::locked_transfer(
		1,
		token_address,
		payer,
		our_address,
		secrethash,
		crate::types::primitives::TokenAmount::from(10u64),
		U64::from(200u64),
		token_network_address,
		crate::types::primitives::ChannelIdentifier::from(1u64),
	);
	let state_change = ActionInitMediator { from_transfer, routes: vec![] };
	let result = chain::state_transition(node_state, state_change.into()).expect("mediator install should succeed");
	result.new_state
}

fn node_state_with_initiator_task(
	payment_network_address: Address,
	token_address: Address,
	token_network_address: Address,
	our_address: Address,
	target: Address,
	secrethash: H256,
) -> NodeState {
	let node_state = factories::node_state_with_channel(
		payment_network_address,
		token_address,
		token_network_address,
		crate::types::primitives::ChannelIdentifier::from(1u64),
		our_address,
		target,
	);

	let transfer = factories::locked_transfer(
		1,
		token_address,
		our_address,
		target,
		secrethash,
		crate::types::primitives::TokenAmount::from(10u64),
		U64::from(200u64),
		token_network_address,
		crate::types::primitives::ChannelIdentifier::from(1u64),
	);
	let state_change = ActionInitInitiator { transfer, routes: vec![] };
	let result = chain::state_transition(node_state, state_change.into()).expect("initiator install should succeed");
	assert_eq!(result.events.len(), 1);
	result.new_state
}
