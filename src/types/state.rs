#![warn(clippy::missing_docs_in_private_items)]

use std::collections::HashMap;

use derive_more::Display;
use serde::{
	Deserialize,
	Serialize,
};

use crate::types::primitives::{
	Address,
	BlockNumber,
	CanonicalIdentifier,
	ChannelIdentifier,
	NetworkState,
	Nonce,
	PaymentIdentifier,
	PaymentNetworkAddress,
	QueueIdentifier,
	Random,
	Secret,
	SecretHash,
	TokenAddress,
	TokenAmount,
	TokenNetworkAddress,
};

/// Which role a payment task plays for the secret-hash it was installed
/// under.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TransferRole {
	Initiator,
	Mediator,
	Target,
}

/// A hash-time-locked amount, the payload secured by a secret-hash.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HashTimeLockState {
	pub amount: TokenAmount,
	pub expiration: BlockNumber,
	pub secrethash: SecretHash,
}

/// The balance-proof fields needed for routing. Signature and hashing
/// machinery live outside this crate; this is the plain-data subset the
/// reducer actually reads.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BalanceProofState {
	pub nonce: Nonce,
	pub transferred_amount: TokenAmount,
	pub locked_amount: TokenAmount,
	pub token_network_address: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
}

/// A single hop on a candidate route.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RouteState {
	pub route: Vec<Address>,
}

/// A transfer carrying a hash-time lock, as seen by initiator, mediator or
/// target.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LockedTransferState {
	pub payment_identifier: PaymentIdentifier,
	pub token: TokenAddress,
	pub initiator: Address,
	pub target: Address,
	pub lock: HashTimeLockState,
	pub balance_proof: BalanceProofState,
	pub token_network_address: TokenNetworkAddress,
}

/// Lifecycle of a transfer from the initiator's perspective.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TransferState {
	Pending,
	Expired,
	SecretRevealed,
	Canceled,
}

/// State of a payment for the initiating node. A single payment may have
/// multiple transfers (e.g. retried with a different route), but this CORE
/// only needs to know whether the task is still alive.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InitiatorPaymentState {
	pub routes: Vec<RouteState>,
	pub transfer: LockedTransferState,
	pub transfer_state: TransferState,
}

/// An initiator payment task.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InitiatorTask {
	pub role: TransferRole,
	pub token_network_address: TokenNetworkAddress,
	pub manager_state: InitiatorPaymentState,
}

/// Lifecycle of the payer leg of a mediated transfer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PayerState {
	Pending,
	SecretRevealed,
	BalanceProof,
	Expired,
}

/// Lifecycle of the payee leg of a mediated transfer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PayeeState {
	Pending,
	SecretRevealed,
	BalanceProof,
	Expired,
}

/// A mediator pays a payee node trusting there is a payer node covering the
/// token expense; this pairs the two legs and their progress.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MediationPairState {
	pub payer_transfer: LockedTransferState,
	pub payee_transfer: LockedTransferState,
	pub payer_state: PayerState,
	pub payee_state: PayeeState,
}

/// State of a mediated transfer for the mediator node. A mediator may manage
/// more than one channel (refunds) but always for the same payment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MediatorTransferState {
	pub secrethash: SecretHash,
	pub routes: Vec<RouteState>,
	pub secret: Option<Secret>,
	pub transfers_pair: Vec<MediationPairState>,
}

/// A mediator payment task.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MediatorTask {
	pub role: TransferRole,
	pub token_network_address: TokenNetworkAddress,
	pub mediator_state: MediatorTransferState,
}

/// Lifecycle of a transfer from the target's perspective.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TargetState {
	Expired,
	SecretRequest,
	OffchainSecretReveal,
	OnchainSecretReveal,
	OnchainUnlock,
}

/// State of a transfer for the target node.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TargetTransferState {
	pub transfer: LockedTransferState,
	pub secret: Option<Secret>,
	pub state: TargetState,
}

/// A target payment task.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TargetTask {
	pub role: TransferRole,
	pub token_network_address: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
	pub target_state: TargetTransferState,
}

/// The three shapes a payment task can take. Dispatch is by matching on the
/// tag, never by inheritance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PaymentTask {
	Initiator(InitiatorTask),
	Mediator(MediatorTask),
	Target(TargetTask),
}

impl PaymentTask {
	/// The token network this task is running against, regardless of
	/// variant.
	pub fn token_network_address(&self) -> TokenNetworkAddress {
		match self {
			PaymentTask::Initiator(task) => task.token_network_address,
			PaymentTask::Mediator(task) => task.token_network_address,
			PaymentTask::Target(task) => task.token_network_address,
		}
	}
}

/// Index of in-flight payments by secret-hash. A secret-hash maps to at most
/// one task; two unrelated payments must never reuse the same secret-hash.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentMappingState {
	pub secrethashes_to_task: HashMap<SecretHash, PaymentTask>,
}

/// The two endpoints of a channel.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChannelEndState {
	pub address: Address,
	pub balance: TokenAmount,
}

/// Lifecycle of a channel.
#[derive(Copy, Clone, Display, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
	#[display(fmt = "opened")]
	Opened,
	#[display(fmt = "closing")]
	Closing,
	#[display(fmt = "closed")]
	Closed,
	#[display(fmt = "settled")]
	Settled,
}

/// A bilateral off-chain balance between two peers, backed by an on-chain
/// deposit. This crate only needs enough of this shape to route state
/// changes and to request a graceful close; the full balance-proof and
/// lock-validation protocol is the channel sub-machine's own concern.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
	pub canonical_identifier: CanonicalIdentifier,
	pub token_address: TokenAddress,
	pub our_state: ChannelEndState,
	pub partner_state: ChannelEndState,
	pub status: ChannelStatus,
	pub reveal_timeout: BlockNumber,
	pub settle_timeout: BlockNumber,
}

/// Corresponds to a token-network smart contract: the graph of channels
/// denominated in one token.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TokenNetworkState {
	pub address: TokenNetworkAddress,
	pub token_address: TokenAddress,
	pub channelidentifiers_to_channels: HashMap<ChannelIdentifier, ChannelState>,
	pub partneraddresses_to_channelidentifiers: HashMap<Address, Vec<ChannelIdentifier>>,
}

impl TokenNetworkState {
	/// Create an empty token network.
	pub fn new(address: TokenNetworkAddress, token_address: TokenAddress) -> Self {
		TokenNetworkState {
			address,
			token_address,
			channelidentifiers_to_channels: HashMap::new(),
			partneraddresses_to_channelidentifiers: HashMap::new(),
		}
	}

	/// True once every channel on this token network has been removed.
	pub fn is_empty(&self) -> bool {
		self.channelidentifiers_to_channels.is_empty()
	}
}

/// A registry of token-specific sub-networks, identified by a payment
/// network (token-network registry) contract address.
///
/// `tokenidentifiers_to_tokennetworks` and `tokenaddresses_to_tokennetworks`
/// MUST always carry the same value set. Both are kept in sync exclusively
/// through `upsert_token_network`/`remove_token_network` — no other code
/// path should write to either map directly.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PaymentNetworkState {
	pub address: PaymentNetworkAddress,
	pub tokenidentifiers_to_tokennetworks: HashMap<TokenNetworkAddress, TokenNetworkState>,
	pub tokenaddresses_to_tokennetworks: HashMap<TokenAddress, TokenNetworkState>,
}

impl PaymentNetworkState {
	/// Create a payment network seeded with `token_networks`.
	pub fn new(address: PaymentNetworkAddress, token_networks: Vec<TokenNetworkState>) -> Self {
		let mut state = PaymentNetworkState {
			address,
			tokenidentifiers_to_tokennetworks: HashMap::new(),
			tokenaddresses_to_tokennetworks: HashMap::new(),
		};
		for token_network in token_networks {
			state.upsert_token_network(token_network);
		}
		state
	}

	/// Insert or replace a token network, writing both indexes atomically.
	pub fn upsert_token_network(&mut self, token_network: TokenNetworkState) {
		self.tokenidentifiers_to_tokennetworks
			.insert(token_network.address, token_network.clone());
		self.tokenaddresses_to_tokennetworks.insert(token_network.token_address, token_network);
	}

	/// Remove a token network from both indexes atomically.
	pub fn remove_token_network(&mut self, token_network: &TokenNetworkState) {
		self.tokenidentifiers_to_tokennetworks.remove(&token_network.address);
		self.tokenaddresses_to_tokennetworks.remove(&token_network.token_address);
	}

	/// True if the two indexes currently carry the same set of token
	/// networks.
	pub fn indexes_are_consistent(&self) -> bool {
		let mut by_id: Vec<_> =
			self.tokenidentifiers_to_tokennetworks.values().map(|tn| tn.address).collect();
		let mut by_addr: Vec<_> =
			self.tokenaddresses_to_tokennetworks.values().map(|tn| tn.address).collect();
		by_id.sort();
		by_addr.sort();
		by_id == by_addr
	}
}

/// The root of the persisted state: everything the reducer needs to apply
/// the next state change.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
	pub block_number: BlockNumber,
	pub pseudo_random_generator: Random,
	pub identifiers_to_paymentnetworks: HashMap<PaymentNetworkAddress, PaymentNetworkState>,
	pub nodeaddresses_to_networkstates: HashMap<Address, NetworkState>,
	pub payment_mapping: PaymentMappingState,
	pub queueids_to_queues: HashMap<QueueIdentifier, Vec<crate::types::event::SendMessageEvent>>,
}

impl NodeState {
	/// Create a freshly initialized node state. Constructed once, by the
	/// handler for the node's first `ActionInitNode` change.
	pub fn new(pseudo_random_generator: Random, block_number: BlockNumber) -> Self {
		NodeState {
			block_number,
			pseudo_random_generator,
			identifiers_to_paymentnetworks: HashMap::new(),
			nodeaddresses_to_networkstates: HashMap::new(),
			payment_mapping: PaymentMappingState::default(),
			queueids_to_queues: HashMap::new(),
		}
	}
}
