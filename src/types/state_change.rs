#![warn(clippy::missing_docs_in_private_items)]

use serde::{
	Deserialize,
	Serialize,
};

use crate::types::{
	primitives::{
		Address,
		BlockHash,
		BlockNumber,
		CanonicalIdentifier,
		ChannelIdentifier,
		MessageIdentifier,
		NetworkState,
		PaymentNetworkAddress,
		Random,
		Secret,
		SecretHash,
		TokenAddress,
		TokenNetworkAddress,
	},
	state::{
		ChannelState,
		LockedTransferState,
		PaymentNetworkState,
		RouteState,
		TokenNetworkState,
	},
};

/// A new block has been observed by the on-chain watcher.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Block {
	pub block_number: BlockNumber,
	pub block_hash: BlockHash,
}

/// Bootstraps a fresh `NodeState`. Dispatched exactly once, before any other
/// variant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionInitNode {
	pub pseudo_random_generator: Random,
	pub block_number: BlockNumber,
}

/// A user action requesting that a new token network be tracked under an
/// already-known payment network.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionNewTokenNetwork {
	pub payment_network_identifier: PaymentNetworkAddress,
	pub token_network: TokenNetworkState,
}

/// A user action requesting the on-chain close of one of our channels.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionChannelClose {
	pub token_network_identifier: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
}

/// The transport layer's view of a peer's reachability changed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionChangeNodeNetworkState {
	pub node_address: Address,
	pub network_state: NetworkState,
}

/// A user action requesting an unmediated transfer on an existing channel.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionTransferDirect {
	pub token_network_identifier: TokenNetworkAddress,
	pub receiver_address: Address,
	pub payment_identifier: crate::types::primitives::PaymentIdentifier,
	pub amount: crate::types::primitives::TokenAmount,
}

/// A user action requesting that every channel on every network be closed
/// gracefully, e.g. on node shutdown.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionLeaveAllNetworks {}

/// Starts a new outgoing payment: installs an `InitiatorTask`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionInitInitiator {
	pub transfer: LockedTransferState,
	pub routes: Vec<RouteState>,
}

/// Starts mediation of a transfer received from a payer: installs a
/// `MediatorTask`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionInitMediator {
	pub from_transfer: LockedTransferState,
	pub routes: Vec<RouteState>,
}

/// Starts receiving a mediated transfer as its final recipient: installs a
/// `TargetTask`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionInitTarget {
	pub transfer: LockedTransferState,
}

/// The chain watcher observed the registration of a new payment network.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveNewPaymentNetwork {
	pub payment_network: PaymentNetworkState,
}

/// The chain watcher observed the registration of a new token network
/// inside an already-known payment network.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveNewTokenNetwork {
	pub payment_network_identifier: PaymentNetworkAddress,
	pub token_network: TokenNetworkState,
}

/// The chain watcher observed a batch unlock transaction settling expired
/// locks on a channel.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveChannelBatchUnlock {
	pub token_network_identifier: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
	pub participant: Address,
	pub partner: Address,
}

/// The chain watcher observed a new channel being opened.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveChannelNew {
	pub token_network_identifier: TokenNetworkAddress,
	pub channel_state: ChannelState,
}

/// The chain watcher observed a channel's close transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveChannelClosed {
	pub token_network_identifier: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
}

/// The chain watcher observed a deposit increasing a channel participant's
/// on-chain balance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveChannelNewBalance {
	pub token_network_identifier: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
	pub participant: Address,
	pub deposit_transaction: crate::types::primitives::TokenAmount,
}

/// The chain watcher observed a channel's settlement transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveChannelSettled {
	pub token_network_identifier: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
}

/// The chain watcher observed a new routing edge (participant join) on a
/// token network.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveRouteNew {
	pub token_network_identifier: TokenNetworkAddress,
	pub channel_identifier: ChannelIdentifier,
	pub participant1: Address,
	pub participant2: Address,
}

/// The chain watcher observed an on-chain secret reveal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractReceiveSecretReveal {
	pub secrethash: SecretHash,
	pub secret: Secret,
}

/// A peer sent us an unmediated transfer message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiveTransferDirect {
	pub token_network_identifier: TokenNetworkAddress,
	pub message_identifier: MessageIdentifier,
	pub payment_identifier: crate::types::primitives::PaymentIdentifier,
	pub balance_proof: crate::types::state::BalanceProofState,
}

/// A peer revealed a secret to us off-chain.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiveSecretReveal {
	pub secrethash: SecretHash,
	pub secret: Secret,
}

/// A payer refunded a transfer and asked us to cancel the route we were
/// trying. A more specific refinement of `ReceiveTransferRefund` and must be
/// matched before it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiveTransferRefundCancelRoute {
	pub transfer: LockedTransferState,
	pub routes: Vec<RouteState>,
}

/// A payer refunded a transfer we forwarded.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiveTransferRefund {
	pub transfer: LockedTransferState,
}

/// A peer asked us to reveal the secret behind a lock we hold.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiveSecretRequest {
	pub secrethash: SecretHash,
	pub payment_identifier: crate::types::primitives::PaymentIdentifier,
	pub amount: crate::types::primitives::TokenAmount,
	pub sender: Address,
}

/// A peer acknowledged receiving a message on the global queue.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiveDelivered {
	pub message_identifier: MessageIdentifier,
}

/// A peer acknowledged having processed a message on any queue.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiveProcessed {
	pub sender: Address,
	pub message_identifier: MessageIdentifier,
}

/// A peer notified us that a lock was unlocked on-chain.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiveUnlock {
	pub secrethash: SecretHash,
	pub message_identifier: MessageIdentifier,
}

/// Every inbound state change the reducer accepts: user actions, observed
/// contract events, and received network messages. Dispatch is an
/// exhaustive match in `crate::machine::chain::state_transition` — there is
/// no catch-all arm, so a new variant added here without a matching handler
/// fails to compile.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StateChange {
	Block(Block),
	ActionInitNode(ActionInitNode),
	ActionNewTokenNetwork(ActionNewTokenNetwork),
	ActionChannelClose(ActionChannelClose),
	ActionChangeNodeNetworkState(ActionChangeNodeNetworkState),
	ActionTransferDirect(ActionTransferDirect),
	ActionLeaveAllNetworks(ActionLeaveAllNetworks),
	ActionInitInitiator(ActionInitInitiator),
	ActionInitMediator(ActionInitMediator),
	ActionInitTarget(ActionInitTarget),
	ContractReceiveNewPaymentNetwork(ContractReceiveNewPaymentNetwork),
	ContractReceiveNewTokenNetwork(ContractReceiveNewTokenNetwork),
	ContractReceiveChannelBatchUnlock(ContractReceiveChannelBatchUnlock),
	ContractReceiveChannelNew(ContractReceiveChannelNew),
	ContractReceiveChannelClosed(ContractReceiveChannelClosed),
	ContractReceiveChannelNewBalance(ContractReceiveChannelNewBalance),
	ContractReceiveChannelSettled(ContractReceiveChannelSettled),
	ContractReceiveRouteNew(ContractReceiveRouteNew),
	ContractReceiveSecretReveal(ContractReceiveSecretReveal),
	ReceiveTransferDirect(ReceiveTransferDirect),
	ReceiveSecretReveal(ReceiveSecretReveal),
	ReceiveTransferRefundCancelRoute(ReceiveTransferRefundCancelRoute),
	ReceiveTransferRefund(ReceiveTransferRefund),
	ReceiveSecretRequest(ReceiveSecretRequest),
	ReceiveDelivered(ReceiveDelivered),
	ReceiveProcessed(ReceiveProcessed),
	ReceiveUnlock(ReceiveUnlock),
}

impl StateChange {
	/// Name of the current variant, used in error messages and logging.
	pub fn type_name(&self) -> &'static str {
		match self {
			StateChange::Block(_) => "Block",
			StateChange::ActionInitNode(_) => "ActionInitNode",
			StateChange::ActionNewTokenNetwork(_) => "ActionNewTokenNetwork",
			StateChange::ActionChannelClose(_) => "ActionChannelClose",
			StateChange::ActionChangeNodeNetworkState(_) => "ActionChangeNodeNetworkState",
			StateChange::ActionTransferDirect(_) => "ActionTransferDirect",
			StateChange::ActionLeaveAllNetworks(_) => "ActionLeaveAllNetworks",
			StateChange::ActionInitInitiator(_) => "ActionInitInitiator",
			StateChange::ActionInitMediator(_) => "ActionInitMediator",
			StateChange::ActionInitTarget(_) => "ActionInitTarget",
			StateChange::ContractReceiveNewPaymentNetwork(_) => "ContractReceiveNewPaymentNetwork",
			StateChange::ContractReceiveNewTokenNetwork(_) => "ContractReceiveNewTokenNetwork",
			StateChange::ContractReceiveChannelBatchUnlock(_) => "ContractReceiveChannelBatchUnlock",
			StateChange::ContractReceiveChannelNew(_) => "ContractReceiveChannelNew",
			StateChange::ContractReceiveChannelClosed(_) => "ContractReceiveChannelClosed",
			StateChange::ContractReceiveChannelNewBalance(_) => "ContractReceiveChannelNewBalance",
			StateChange::ContractReceiveChannelSettled(_) => "ContractReceiveChannelSettled",
			StateChange::ContractReceiveRouteNew(_) => "ContractReceiveRouteNew",
			StateChange::ContractReceiveSecretReveal(_) => "ContractReceiveSecretReveal",
			StateChange::ReceiveTransferDirect(_) => "ReceiveTransferDirect",
			StateChange::ReceiveSecretReveal(_) => "ReceiveSecretReveal",
			StateChange::ReceiveTransferRefundCancelRoute(_) => "ReceiveTransferRefundCancelRoute",
			StateChange::ReceiveTransferRefund(_) => "ReceiveTransferRefund",
			StateChange::ReceiveSecretRequest(_) => "ReceiveSecretRequest",
			StateChange::ReceiveDelivered(_) => "ReceiveDelivered",
			StateChange::ReceiveProcessed(_) => "ReceiveProcessed",
			StateChange::ReceiveUnlock(_) => "ReceiveUnlock",
		}
	}
}

macro_rules! impl_from_variant {
	($variant:ident) => {
		impl From<$variant> for StateChange {
			fn from(inner: $variant) -> Self {
				StateChange::$variant(inner)
			}
		}
	};
}

impl_from_variant!(Block);
impl_from_variant!(ActionInitNode);
impl_from_variant!(ActionNewTokenNetwork);
impl_from_variant!(ActionChannelClose);
impl_from_variant!(ActionChangeNodeNetworkState);
impl_from_variant!(ActionTransferDirect);
impl_from_variant!(ActionLeaveAllNetworks);
impl_from_variant!(ActionInitInitiator);
impl_from_variant!(ActionInitMediator);
impl_from_variant!(ActionInitTarget);
impl_from_variant!(ContractReceiveNewPaymentNetwork);
impl_from_variant!(ContractReceiveNewTokenNetwork);
impl_from_variant!(ContractReceiveChannelBatchUnlock);
impl_from_variant!(ContractReceiveChannelNew);
impl_from_variant!(ContractReceiveChannelClosed);
impl_from_variant!(ContractReceiveChannelNewBalance);
impl_from_variant!(ContractReceiveChannelSettled);
impl_from_variant!(ContractReceiveRouteNew);
impl_from_variant!(ContractReceiveSecretReveal);
impl_from_variant!(ReceiveTransferDirect);
impl_from_variant!(ReceiveSecretReveal);
impl_from_variant!(ReceiveTransferRefundCancelRoute);
impl_from_variant!(ReceiveTransferRefund);
impl_from_variant!(ReceiveSecretRequest);
impl_from_variant!(ReceiveDelivered);
impl_from_variant!(ReceiveProcessed);
impl_from_variant!(ReceiveUnlock);
