//! Read-only lookups over `NodeState`. None of these mutate or allocate
//! beyond what's needed to hand back a reference or a owned copy; they exist
//! so handlers don't each re-derive the same traversal.

use crate::types::{
	primitives::{
		Address,
		BlockNumber,
		PaymentNetworkAddress,
		QueueIdentifier,
		SecretHash,
		TokenAddress,
		TokenNetworkAddress,
	},
	state::{
		ChannelState,
		NodeState,
		PaymentNetworkState,
		PaymentTask,
		TokenNetworkState,
	},
};

/// The node's last observed chain height.
pub fn block_number(node_state: &NodeState) -> BlockNumber {
	node_state.block_number
}

/// Find a token network by its own address, searching every payment
/// network.
pub fn get_token_network<'a>(
	node_state: &'a NodeState,
	token_network_address: &TokenNetworkAddress,
) -> Option<&'a TokenNetworkState> {
	for payment_network in node_state.identifiers_to_paymentnetworks.values() {
		if let Some(token_network) =
			payment_network.tokenidentifiers_to_tokennetworks.get(token_network_address)
		{
			return Some(token_network);
		}
	}
	None
}

/// Find a token network by the address of the token it wraps, searching
/// every payment network.
pub fn get_token_network_by_token_address<'a>(
	node_state: &'a NodeState,
	token_address: &TokenAddress,
) -> Option<&'a TokenNetworkState> {
	for payment_network in node_state.identifiers_to_paymentnetworks.values() {
		if let Some(token_network) =
			payment_network.tokenaddresses_to_tokennetworks.get(token_address)
		{
			return Some(token_network);
		}
	}
	None
}

/// Find the payment network that owns a given token network.
pub fn get_payment_network_by_token_network_address<'a>(
	node_state: &'a NodeState,
	token_network_address: &TokenNetworkAddress,
) -> Option<&'a PaymentNetworkState> {
	for payment_network in node_state.identifiers_to_paymentnetworks.values() {
		if payment_network.tokenidentifiers_to_tokennetworks.contains_key(token_network_address) {
			return Some(payment_network);
		}
	}
	None
}

/// Look up a payment network by its own identifier.
pub fn get_payment_network<'a>(
	node_state: &'a NodeState,
	payment_network_identifier: &PaymentNetworkAddress,
) -> Option<&'a PaymentNetworkState> {
	node_state.identifiers_to_paymentnetworks.get(payment_network_identifier)
}

/// Every channel on the node, across every payment and token network.
pub fn get_channels(node_state: &NodeState) -> Vec<ChannelState> {
	let mut channels = vec![];
	for payment_network in node_state.identifiers_to_paymentnetworks.values() {
		for token_network in payment_network.tokenidentifiers_to_tokennetworks.values() {
			channels.extend(token_network.channelidentifiers_to_channels.values().cloned());
		}
	}
	channels
}

/// The in-flight payment task installed under a secret-hash, if any.
pub fn get_payment_task<'a>(
	node_state: &'a NodeState,
	secrethash: &SecretHash,
) -> Option<&'a PaymentTask> {
	node_state.payment_mapping.secrethashes_to_task.get(secrethash)
}

/// The messages currently queued for `recipient` under `queue_name`.
pub fn get_queue<'a>(
	node_state: &'a NodeState,
	queue_identifier: &QueueIdentifier,
) -> Option<&'a Vec<crate::types::event::SendMessageEvent>> {
	node_state.queueids_to_queues.get(queue_identifier)
}

/// Last known reachability of a peer; `Unknown` if the node has never heard
/// about it.
pub fn get_network_state(
	node_state: &NodeState,
	address: &Address,
) -> crate::types::primitives::NetworkState {
	node_state
		.nodeaddresses_to_networkstates
		.get(address)
		.copied()
		.unwrap_or(crate::types::primitives::NetworkState::Unknown)
}
