#![warn(clippy::missing_docs_in_private_items)]

use serde::{
	Deserialize,
	Serialize,
};

use crate::types::primitives::{
	Address,
	CanonicalIdentifier,
	MessageIdentifier,
	PaymentIdentifier,
	QueueIdentifier,
	Secret,
	SecretHash,
	TokenAmount,
};

/// A direct, unmediated transfer sent to `recipient`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SendDirectTransfer {
	pub recipient: Address,
	pub queue_name: String,
	pub message_identifier: MessageIdentifier,
	pub payment_identifier: PaymentIdentifier,
	pub transferred_amount: TokenAmount,
}

/// A hash-time-locked transfer sent as part of a mediated payment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SendLockedTransfer {
	pub recipient: Address,
	pub queue_name: String,
	pub message_identifier: MessageIdentifier,
	pub payment_identifier: PaymentIdentifier,
	pub secrethash: SecretHash,
}

/// Reveal a secret to `recipient`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SendSecretReveal {
	pub recipient: Address,
	pub queue_name: String,
	pub message_identifier: MessageIdentifier,
	pub secret: Secret,
	pub secrethash: SecretHash,
}

/// Ask `recipient` to reveal the secret behind `secrethash`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SendSecretRequest {
	pub recipient: Address,
	pub queue_name: String,
	pub message_identifier: MessageIdentifier,
	pub secrethash: SecretHash,
}

/// Acknowledge having received and processed a message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SendProcessed {
	pub recipient: Address,
	pub queue_name: String,
	pub message_identifier: MessageIdentifier,
}

/// The polymorphic base of every outbound message event: anything that must
/// be queued by `(recipient, queue_name)` and survive until acknowledged.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SendMessageEvent {
	SendDirectTransfer(SendDirectTransfer),
	SendLockedTransfer(SendLockedTransfer),
	SendSecretReveal(SendSecretReveal),
	SendSecretRequest(SendSecretRequest),
	SendProcessed(SendProcessed),
}

impl SendMessageEvent {
	/// The peer this message is addressed to.
	pub fn recipient(&self) -> Address {
		match self {
			SendMessageEvent::SendDirectTransfer(e) => e.recipient,
			SendMessageEvent::SendLockedTransfer(e) => e.recipient,
			SendMessageEvent::SendSecretReveal(e) => e.recipient,
			SendMessageEvent::SendSecretRequest(e) => e.recipient,
			SendMessageEvent::SendProcessed(e) => e.recipient,
		}
	}

	/// The queue this message belongs in.
	pub fn queue_identifier(&self) -> QueueIdentifier {
		let (recipient, queue_name) = match self {
			SendMessageEvent::SendDirectTransfer(e) => (e.recipient, e.queue_name.clone()),
			SendMessageEvent::SendLockedTransfer(e) => (e.recipient, e.queue_name.clone()),
			SendMessageEvent::SendSecretReveal(e) => (e.recipient, e.queue_name.clone()),
			SendMessageEvent::SendSecretRequest(e) => (e.recipient, e.queue_name.clone()),
			SendMessageEvent::SendProcessed(e) => (e.recipient, e.queue_name.clone()),
		};
		QueueIdentifier { recipient, queue_name }
	}

	/// The identifier a `Delivered`/`Processed` ack will reference.
	pub fn message_identifier(&self) -> MessageIdentifier {
		match self {
			SendMessageEvent::SendDirectTransfer(e) => e.message_identifier,
			SendMessageEvent::SendLockedTransfer(e) => e.message_identifier,
			SendMessageEvent::SendSecretReveal(e) => e.message_identifier,
			SendMessageEvent::SendSecretRequest(e) => e.message_identifier,
			SendMessageEvent::SendProcessed(e) => e.message_identifier,
		}
	}
}

/// Request the channel's on-chain close, emitted by
/// `handle_leave_all_networks` and by the channel sub-machine's own
/// `events_for_close`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContractSendChannelClose {
	pub canonical_identifier: CanonicalIdentifier,
	pub balance_proof_token_network_address: Option<Address>,
}

/// Emitted the one time `handle_processed` observes the ack for a
/// `SendDirectTransfer` — the only place this event is produced.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventTransferSentSuccess {
	pub payment_identifier: PaymentIdentifier,
	pub transferred_amount: TokenAmount,
	pub recipient: Address,
}

/// Emitted when a mediator or target successfully unlocks on-chain.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnlockSuccess {
	pub secrethash: SecretHash,
}

/// Every event the reducer can emit. Sub-reducer events (channel, token
/// network, initiator/mediator/target) are passed through opaquely as the
/// `SendMessageEvent`/`ContractSendChannelClose` variants they construct.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Event {
	SendMessage(SendMessageEvent),
	ContractSendChannelClose(ContractSendChannelClose),
	EventTransferSentSuccess(EventTransferSentSuccess),
	UnlockSuccess(UnlockSuccess),
}

impl Event {
	/// Borrow the inner `SendMessageEvent`, if this event is one.
	pub fn as_send_message(&self) -> Option<&SendMessageEvent> {
		match self {
			Event::SendMessage(inner) => Some(inner),
			_ => None,
		}
	}
}

impl From<SendMessageEvent> for Event {
	fn from(inner: SendMessageEvent) -> Self {
		Event::SendMessage(inner)
	}
}

impl From<ContractSendChannelClose> for Event {
	fn from(inner: ContractSendChannelClose) -> Self {
		Event::ContractSendChannelClose(inner)
	}
}

impl From<EventTransferSentSuccess> for Event {
	fn from(inner: EventTransferSentSuccess) -> Self {
		Event::EventTransferSentSuccess(inner)
	}
}

impl From<UnlockSuccess> for Event {
	fn from(inner: UnlockSuccess) -> Self {
		Event::UnlockSuccess(inner)
	}
}
