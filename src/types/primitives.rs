#![warn(clippy::missing_docs_in_private_items)]

use std::collections::HashMap;

use rand_chacha::{
	rand_core::{
		RngCore,
		SeedableRng,
	},
	ChaChaRng,
};
use serde::{
	Deserialize,
	Serialize,
};
pub use web3::types::{
	Address,
	Bytes,
	H256,
	U256,
};

use crate::constants::GLOBAL_QUEUE_NAME;

/// Alias type for a block height.
pub type BlockNumber = web3::types::U64;

/// Alias type for a block hash.
pub type BlockHash = H256;

/// Alias type for a secret-hash, the key binding off-chain messages to an
/// on-chain-revealable secret.
pub type SecretHash = H256;

/// Alias type for a revealed secret.
pub type Secret = Bytes;

/// Alias type for a token contract address.
pub type TokenAddress = Address;

/// Alias type for a token-network contract address.
pub type TokenNetworkAddress = Address;

/// Alias type for a payment-network (token-network registry) contract
/// address.
pub type PaymentNetworkAddress = Address;

/// Alias type for a channel identifier, unique within a token network.
pub type ChannelIdentifier = U256;

/// Alias type for a token amount.
pub type TokenAmount = U256;

/// Alias type for a balance-proof nonce.
pub type Nonce = U256;

/// Alias type for a network message identifier.
pub type MessageIdentifier = u64;

/// Alias type for a payment identifier, chosen by the initiator.
pub type PaymentIdentifier = u64;

/// The pseudo-random number generator threaded through every sub-reducer.
///
/// It is part of `NodeState` and therefore part of the persisted,
/// replayable state: given the same seed and the same sequence of calls to
/// `next`, it produces the same sequence of values. Nothing in this crate
/// reads from a global RNG.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Random(ChaChaRng);

impl Random {
	/// Create a PRNG deterministically seeded from `seed`.
	pub fn new(seed: u64) -> Self {
		Self(ChaChaRng::seed_from_u64(seed))
	}

	/// Advance the generator and return the next value.
	pub fn next_u64(&mut self) -> u64 {
		self.0.next_u64()
	}
}

impl Default for Random {
	fn default() -> Self {
		Self::new(0)
	}
}

/// Identifies an outbound message queue: the peer it is addressed to, and a
/// queue name. The name `"global"` is reserved for messages that are not
/// tied to a particular channel.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct QueueIdentifier {
	pub recipient: Address,
	pub queue_name: String,
}

impl QueueIdentifier {
	/// Build the identifier for the global, channel-less queue to `recipient`.
	pub fn global(recipient: Address) -> Self {
		QueueIdentifier { recipient, queue_name: GLOBAL_QUEUE_NAME.to_string() }
	}

	/// True if this is the special global queue.
	pub fn is_global(&self) -> bool {
		self.queue_name == GLOBAL_QUEUE_NAME
	}
}

/// Reachability of a peer, as last observed by the transport layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum NetworkState {
	Reachable,
	Unreachable,
	Unknown,
}

/// Metadata describing how to reach a peer over the transport layer. Opaque
/// to the reducer; carried only so events can be re-addressed by a higher
/// layer.
pub type AddressMetadata = HashMap<String, String>;

/// Identifies a channel unambiguously: which token network it belongs to,
/// and its identifier within that network.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CanonicalIdentifier {
	pub token_network_address: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
}
