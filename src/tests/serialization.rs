//! Wire-encoding checks for the types that cross the reducer boundary to a
//! transport or persistence layer.

use web3::types::{
	H256,
	U64,
};

use crate::types::{
	event::{
		Event,
		EventTransferSentSuccess,
	},
	primitives::TokenAmount,
	state_change::{
		Block,
		StateChange,
	},
};

#[test]
fn state_change_round_trips_through_json_with_its_type_tag() {
	let state_change = StateChange::Block(Block { block_number: U64::from(5u64), block_hash: H256::zero() });

	let encoded = serde_json::to_value(&state_change).expect("state change should serialize");
	assert_eq!(encoded["type"], "Block");

	let decoded: StateChange = serde_json::from_value(encoded).expect("state change should deserialize");
	assert_eq!(decoded, state_change);
}

#[test]
fn event_round_trips_through_json() {
	let event = Event::EventTransferSentSuccess(EventTransferSentSuccess {
		recipient: Default::default(),
		payment_identifier: 7,
		transferred_amount: TokenAmount::from(500u64),
	});

	let encoded = serde_json::to_string(&event).expect("event should serialize");
	let decoded: Event = serde_json::from_str(&encoded).expect("event should deserialize");
	assert_eq!(decoded, event);
}
