//! Small helpers shared by more than one sub-reducer.

use crate::types::{
	primitives::SecretHash,
	state_change::{
		ContractReceiveSecretReveal,
		ReceiveSecretReveal,
	},
};

/// True when an off-chain secret reveal actually unlocks `transfer_secrethash`.
pub(super) fn is_valid_secret_reveal(
	state_change: &ReceiveSecretReveal,
	transfer_secrethash: SecretHash,
) -> bool {
	state_change.secrethash == transfer_secrethash
}

/// True when an on-chain secret reveal actually unlocks `transfer_secrethash`.
pub(super) fn is_valid_onchain_secret_reveal(
	state_change: &ContractReceiveSecretReveal,
	transfer_secrethash: SecretHash,
) -> bool {
	state_change.secrethash == transfer_secrethash
}
