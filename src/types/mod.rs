pub mod event;
pub mod primitives;
pub mod state;
pub mod state_change;

pub use event::{
	Event,
	SendMessageEvent,
};
pub use primitives::{
	AddressMetadata,
	BlockHash,
	BlockNumber,
	CanonicalIdentifier,
	ChannelIdentifier,
	MessageIdentifier,
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
pub use state::{
	NodeState,
	PaymentNetworkState,
	PaymentTask,
	TokenNetworkState,
};
pub use state_change::StateChange;
