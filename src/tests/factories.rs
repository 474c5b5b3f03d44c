//! Shared fixtures for building minimal but valid node, payment-network,
//! token-network and channel state without dispatching every state change a
//! real bootstrap sequence would produce.

use web3::types::{
	Address,
	U256,
	U64,
};

use crate::{
	constants::{
		DEFAULT_REVEAL_TIMEOUT,
		DEFAULT_SETTLE_TIMEOUT,
	},
	machine::chain,
	types::{
		primitives::{
			BlockNumber,
			CanonicalIdentifier,
			ChannelIdentifier,
			PaymentNetworkAddress,
			Random,
			SecretHash,
			TokenAddress,
			TokenAmount,
			TokenNetworkAddress,
		},
		state::{
			BalanceProofState,
			ChannelEndState,
			ChannelState,
			ChannelStatus,
			HashTimeLockState,
			LockedTransferState,
			NodeState,
			PaymentNetworkState,
			TokenNetworkState,
		},
		state_change::{
			ContractReceiveChannelNew,
			ContractReceiveNewPaymentNetwork,
			ContractReceiveNewTokenNetwork,
		},
	},
};

/// A freshly initialized node at block 1, seeded deterministically.
pub fn empty_node_state() -> NodeState {
	NodeState::new(Random::new(42), U64::from(1u64))
}

/// A node with one empty payment network registered.
pub fn node_state_with_payment_network(payment_network_address: PaymentNetworkAddress) -> NodeState {
	let state_change =
		ContractReceiveNewPaymentNetwork { payment_network: PaymentNetworkState::new(payment_network_address, vec![]) };
	let result = chain::state_transition(empty_node_state(), state_change.into())
		.expect("payment network registration should succeed");
	result.new_state
}

/// A node with one payment network holding one empty token network.
pub fn node_state_with_token_network(
	payment_network_address: PaymentNetworkAddress,
	token_address: TokenAddress,
	token_network_address: TokenNetworkAddress,
) -> NodeState {
	let node_state = node_state_with_payment_network(payment_network_address);
	let state_change = ContractReceiveNewTokenNetwork {
		payment_network_identifier: payment_network_address,
		token_network: TokenNetworkState::new(token_network_address, token_address),
	};
	let result = chain::state_transition(node_state, state_change.into())
		.expect("token network registration should succeed");
	result.new_state
}

/// An open channel with both ends funded, built up through the full
/// registration chain.
pub fn node_state_with_channel(
	payment_network_address: PaymentNetworkAddress,
	token_address: TokenAddress,
	token_network_address: TokenNetworkAddress,
	channel_identifier: ChannelIdentifier,
	our_address: Address,
	partner_address: Address,
) -> NodeState {
	let node_state = node_state_with_token_network(payment_network_address, token_address, token_network_address);
	node_state_with_channel_added(node_state, token_network_address, channel_identifier, our_address, partner_address)
}

/// Open a second (or subsequent) channel on an already-registered token
/// network, both ends funded the same way `node_state_with_channel` funds
/// its channel.
pub fn node_state_with_channel_added(
	node_state: NodeState,
	token_network_address: TokenNetworkAddress,
	channel_identifier: ChannelIdentifier,
	our_address: Address,
	partner_address: Address,
) -> NodeState {
	let token_address = node_state
		.identifiers_to_paymentnetworks
		.values()
		.find_map(|payment_network| {
			payment_network
				.tokenidentifiers_to_tokennetworks
				.get(&token_network_address)
				.map(|token_network| token_network.token_address)
		})
		.expect("token network must already be registered");

	let channel_state = ChannelState {
		canonical_identifier: CanonicalIdentifier { token_network_address, channel_identifier },
		token_address,
		our_state: ChannelEndState { address: our_address, balance: U256::from(100u64) },
		partner_state: ChannelEndState { address: partner_address, balance: U256::from(100u64) },
		status: ChannelStatus::Opened,
		reveal_timeout: U64::from(DEFAULT_REVEAL_TIMEOUT),
		settle_timeout: U64::from(DEFAULT_SETTLE_TIMEOUT),
	};
	let state_change = ContractReceiveChannelNew { token_network_identifier: token_network_address, channel_state };
	let result = chain::state_transition(node_state, state_change.into()).expect("channel creation should succeed");
	result.new_state
}

/// A locked transfer over `token_network_address`/`channel_identifier`, with
/// a lock expiring at `expiration` behind `secrethash`.
#[allow(clippy::too_many_arguments)]
pub fn locked_transfer(
	payment_identifier: u64,
	token: TokenAddress,
	initiator: Address,
	target: Address,
	secrethash: SecretHash,
	amount: TokenAmount,
	expiration: BlockNumber,
	token_network_address: TokenNetworkAddress,
	channel_identifier: ChannelIdentifier,
) -> LockedTransferState {
	LockedTransferState {
		payment_identifier,
		token,
		initiator,
		target,
		lock: HashTimeLockState { amount, expiration, secrethash },
		balance_proof: BalanceProofState {
			nonce: U256::from(1u64),
			transferred_amount: amount,
			locked_amount: amount,
			token_network_address,
			channel_identifier,
		},
		token_network_address,
	}
}
