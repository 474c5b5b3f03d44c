//! The node-level reducer. Classifies the incoming state change, invokes
//! the right handler, maintains outbound message queues over whatever
//! events came back, and asserts the post-state shape before returning.

use crate::{
	constants::GLOBAL_QUEUE_NAME,
	errors::StateTransitionError,
	machine::{
		channel,
		initiator_manager,
		mediator,
		target,
		token_network,
	},
	types::{
		event::{
			Event,
			SendMessageEvent,
		},
		primitives::{
			PaymentNetworkAddress,
			SecretHash,
			TokenNetworkAddress,
		},
		state::{
			InitiatorTask,
			MediatorTask,
			NodeState,
			PaymentNetworkState,
			PaymentTask,
			TargetTask,
			TokenNetworkState,
			TransferRole,
		},
		state_change::{
			ActionChangeNodeNetworkState,
			ActionInitInitiator,
			ActionInitMediator,
			ActionInitNode,
			ActionInitTarget,
			ActionNewTokenNetwork,
			Block,
			ContractReceiveChannelBatchUnlock,
			ContractReceiveNewPaymentNetwork,
			ContractReceiveNewTokenNetwork,
			ReceiveDelivered,
			ReceiveProcessed,
			StateChange,
		},
	},
	views,
};

type TransitionResult = std::result::Result<NodeTransition, StateTransitionError>;

/// Outcome of a top-level transition: the node's new state and the ordered
/// events the caller should now dispatch (send messages, surface
/// notifications).
pub struct NodeTransition {
	pub new_state: NodeState,
	pub events: Vec<Event>,
}

/// `(node_state, [])`, unchanged — the standard response to a
/// semantically-invalid state change (references an unknown network,
/// channel or task).
fn unchanged(node_state: NodeState) -> TransitionResult {
	Ok(NodeTransition { new_state: node_state, events: vec![] })
}

// ---------------------------------------------------------------------
// Token-network registry
// ---------------------------------------------------------------------

/// Insert `token_network_state` under `payment_network_identifier`,
/// creating the payment network if necessary. A no-op if the token network
/// is already present.
pub fn maybe_add_tokennetwork(
	node_state: &mut NodeState,
	payment_network_identifier: PaymentNetworkAddress,
	token_network_state: TokenNetworkState,
) {
	match node_state.identifiers_to_paymentnetworks.get_mut(&payment_network_identifier) {
		Some(payment_network) => {
			if !payment_network.tokenidentifiers_to_tokennetworks.contains_key(&token_network_state.address) {
				payment_network.upsert_token_network(token_network_state);
			}
		}
		None => {
			let payment_network =
				PaymentNetworkState::new(payment_network_identifier, vec![token_network_state]);
			node_state.identifiers_to_paymentnetworks.insert(payment_network_identifier, payment_network);
		}
	}
}

fn handle_new_payment_network(
	mut node_state: NodeState,
	state_change: ContractReceiveNewPaymentNetwork,
) -> TransitionResult {
	node_state
		.identifiers_to_paymentnetworks
		.entry(state_change.payment_network.address)
		.or_insert(state_change.payment_network);
	unchanged(node_state)
}

fn handle_tokenadded(mut node_state: NodeState, state_change: ContractReceiveNewTokenNetwork) -> TransitionResult {
	maybe_add_tokennetwork(&mut node_state, state_change.payment_network_identifier, state_change.token_network);
	unchanged(node_state)
}

fn handle_new_token_network(mut node_state: NodeState, state_change: ActionNewTokenNetwork) -> TransitionResult {
	maybe_add_tokennetwork(&mut node_state, state_change.payment_network_identifier, state_change.token_network);
	unchanged(node_state)
}

/// Token-network identifier a channel-scoped state change is routed by.
fn token_network_identifier_of(state_change: &StateChange) -> Option<TokenNetworkAddress> {
	match state_change {
		StateChange::ActionChannelClose(inner) => Some(inner.token_network_identifier),
		StateChange::ActionTransferDirect(inner) => Some(inner.token_network_identifier),
		StateChange::ReceiveTransferDirect(inner) => Some(inner.token_network_identifier),
		StateChange::ContractReceiveChannelNew(inner) => Some(inner.token_network_identifier),
		StateChange::ContractReceiveChannelClosed(inner) => Some(inner.token_network_identifier),
		StateChange::ContractReceiveChannelNewBalance(inner) => Some(inner.token_network_identifier),
		StateChange::ContractReceiveChannelSettled(inner) => Some(inner.token_network_identifier),
		StateChange::ContractReceiveRouteNew(inner) => Some(inner.token_network_identifier),
		_ => None,
	}
}

/// Shared body of every state change that targets exactly one token
/// network: ActionChannelClose, Action/ReceiveTransferDirect, and the
/// ContractReceiveChannel*/RouteNew family.
fn handle_token_network_action(mut node_state: NodeState, state_change: StateChange) -> TransitionResult {
	let token_network_identifier = match token_network_identifier_of(&state_change) {
		Some(id) => id,
		None =>
			return Err(StateTransitionError::from(format!(
				"{} is not a token-network-scoped state change",
				state_change.type_name()
			))),
	};

	let payment_network_address = match views::get_payment_network_by_token_network_address(
		&node_state,
		&token_network_identifier,
	) {
		Some(payment_network) => payment_network.address,
		None => return unchanged(node_state),
	};

	let token_network_state = node_state.identifiers_to_paymentnetworks[&payment_network_address]
		.tokenidentifiers_to_tokennetworks[&token_network_identifier]
		.clone();

	let transition = token_network::state_transition(
		token_network_state,
		state_change,
		node_state.block_number,
		&mut node_state.pseudo_random_generator,
	)?;

	let payment_network =
		node_state.identifiers_to_paymentnetworks.get_mut(&payment_network_address).expect("checked above");

	if transition.new_state.is_empty() {
		payment_network.remove_token_network(&transition.new_state);
	} else {
		payment_network.upsert_token_network(transition.new_state);
	}

	Ok(NodeTransition { new_state: node_state, events: transition.events })
}

fn handle_channel_batch_unlock(
	mut node_state: NodeState,
	state_change: ContractReceiveChannelBatchUnlock,
) -> TransitionResult {
	let payment_network_address = match views::get_payment_network_by_token_network_address(
		&node_state,
		&state_change.token_network_identifier,
	) {
		Some(payment_network) => payment_network.address,
		None => return unchanged(node_state),
	};

	let payment_network =
		node_state.identifiers_to_paymentnetworks.get_mut(&payment_network_address).expect("checked above");
	let token_network = payment_network
		.tokenidentifiers_to_tokennetworks
		.get_mut(&state_change.token_network_identifier)
		.expect("checked above");

	if let Some(channel_state) = token_network.channelidentifiers_to_channels.remove(&state_change.channel_identifier) {
		if let Some(ids) =
			token_network.partneraddresses_to_channelidentifiers.get_mut(&channel_state.partner_state.address)
		{
			ids.retain(|id| *id != state_change.channel_identifier);
		}

		node_state.payment_mapping.secrethashes_to_task.retain(|_, task| {
			!matches!(
				task,
				PaymentTask::Target(target_task)
					if target_task.token_network_address == state_change.token_network_identifier
						&& target_task.channel_identifier == state_change.channel_identifier
			)
		});
	}

	if token_network.is_empty() {
		let token_network = token_network.clone();
		payment_network.remove_token_network(&token_network);
	}

	unchanged(node_state)
}

// ---------------------------------------------------------------------
// Broadcast sub-dispatchers
// ---------------------------------------------------------------------

fn subdispatch_to_all_channels(mut node_state: NodeState, state_change: StateChange) -> TransitionResult {
	let mut events = vec![];
	let block_number = node_state.block_number;

	let payment_network_addresses: Vec<_> =
		node_state.identifiers_to_paymentnetworks.keys().copied().collect();
	for payment_network_address in payment_network_addresses {
		let token_network_addresses: Vec<_> = node_state.identifiers_to_paymentnetworks[&payment_network_address]
			.tokenidentifiers_to_tokennetworks
			.keys()
			.copied()
			.collect();
		for token_network_address in token_network_addresses {
			let channel_identifiers: Vec<_> = node_state.identifiers_to_paymentnetworks[&payment_network_address]
				.tokenidentifiers_to_tokennetworks[&token_network_address]
				.channelidentifiers_to_channels
				.keys()
				.copied()
				.collect();
			for channel_identifier in channel_identifiers {
				let channel_state = node_state.identifiers_to_paymentnetworks[&payment_network_address]
					.tokenidentifiers_to_tokennetworks[&token_network_address]
					.channelidentifiers_to_channels[&channel_identifier]
					.clone();

				let transition = channel::state_transition(
					channel_state,
					state_change.clone(),
					block_number,
					&mut node_state.pseudo_random_generator,
				)?;
				events.extend(transition.events);

				let payment_network =
					node_state.identifiers_to_paymentnetworks.get_mut(&payment_network_address).unwrap();
				let token_network =
					payment_network.tokenidentifiers_to_tokennetworks.get_mut(&token_network_address).unwrap();
				match transition.new_state {
					Some(new_channel_state) => {
						token_network.channelidentifiers_to_channels.insert(channel_identifier, new_channel_state);
					}
					None => {
						token_network.channelidentifiers_to_channels.remove(&channel_identifier);
					}
				}
				if token_network.is_empty() {
					let token_network = token_network.clone();
					payment_network.remove_token_network(&token_network);
				}
			}
		}
	}

	Ok(NodeTransition { new_state: node_state, events })
}

fn handle_block(mut node_state: NodeState, state_change: Block) -> TransitionResult {
	debug_assert!(state_change.block_number >= node_state.block_number, "block_number must not decrease");
	node_state.block_number = state_change.block_number;

	let channels_result =
		subdispatch_to_all_channels(node_state, StateChange::Block(state_change.clone()))?;
	let mut events = channels_result.events;
	node_state = channels_result.new_state;

	let tasks_result = subdispatch_to_all_lockedtransfers(node_state, StateChange::Block(state_change))?;
	events.extend(tasks_result.events);
	node_state = tasks_result.new_state;

	Ok(NodeTransition { new_state: node_state, events })
}

fn handle_leave_all_networks(node_state: NodeState) -> TransitionResult {
	let mut events = vec![];
	for payment_network in node_state.identifiers_to_paymentnetworks.values() {
		for token_network in payment_network.tokenidentifiers_to_tokennetworks.values() {
			for channel_state in token_network.channelidentifiers_to_channels.values() {
				events.extend(channel::events_for_close(channel_state));
			}
		}
	}
	Ok(NodeTransition { new_state: node_state, events })
}

// ---------------------------------------------------------------------
// Payment-task registry and router
// ---------------------------------------------------------------------

/// Resolve the existing sub-state for a routing call, applying the
/// fresh-install / reuse / cross-variant-collision rule shared by all three
/// entry points. `Ok(None)` means fresh-install; `Err(())` means the call is
/// invalid and must be absorbed as a no-op.
fn resolve_existing_task<'a>(
	node_state: &'a NodeState,
	secrethash: SecretHash,
	token_network_identifier: TokenNetworkAddress,
	matches: impl Fn(&'a PaymentTask) -> bool,
) -> Result<Option<&'a PaymentTask>, ()> {
	match node_state.payment_mapping.secrethashes_to_task.get(&secrethash) {
		None => Ok(None),
		Some(task) if matches(task) && task.token_network_address() == token_network_identifier => Ok(Some(task)),
		Some(_) => Err(()),
	}
}

fn subdispatch_initiatortask(
	mut node_state: NodeState,
	state_change: ActionInitInitiator,
	token_network_identifier: TokenNetworkAddress,
) -> TransitionResult {
	let secrethash = state_change.transfer.lock.secrethash;

	let manager_state = match resolve_existing_task(&node_state, secrethash, token_network_identifier, |task| {
		matches!(task, PaymentTask::Initiator(_))
	}) {
		Ok(Some(PaymentTask::Initiator(task))) => Some(task.manager_state.clone()),
		Ok(Some(_)) => unreachable!("matches() guarantees Initiator"),
		Ok(None) => None,
		Err(()) => return unchanged(node_state),
	};

	if views::get_token_network(&node_state, &token_network_identifier).is_none() {
		return unchanged(node_state);
	}

	let transition = initiator_manager::state_transition(
		manager_state,
		StateChange::ActionInitInitiator(state_change),
		&mut node_state.pseudo_random_generator,
		node_state.block_number,
	)?;

	match transition.new_state {
		Some(manager_state) => {
			node_state.payment_mapping.secrethashes_to_task.insert(
				secrethash,
				PaymentTask::Initiator(InitiatorTask {
					role: TransferRole::Initiator,
					token_network_address: token_network_identifier,
					manager_state,
				}),
			);
		}
		None => {
			node_state.payment_mapping.secrethashes_to_task.remove(&secrethash);
		}
	}

	Ok(NodeTransition { new_state: node_state, events: transition.events })
}

fn subdispatch_mediatortask(
	mut node_state: NodeState,
	state_change: ActionInitMediator,
	token_network_identifier: TokenNetworkAddress,
) -> TransitionResult {
	let secrethash = state_change.from_transfer.lock.secrethash;

	let mediator_state = match resolve_existing_task(&node_state, secrethash, token_network_identifier, |task| {
		matches!(task, PaymentTask::Mediator(_))
	}) {
		Ok(Some(PaymentTask::Mediator(task))) => Some(task.mediator_state.clone()),
		Ok(Some(_)) => unreachable!("matches() guarantees Mediator"),
		Ok(None) => None,
		Err(()) => return unchanged(node_state),
	};

	if views::get_token_network(&node_state, &token_network_identifier).is_none() {
		return unchanged(node_state);
	}

	let transition = mediator::state_transition(
		mediator_state,
		StateChange::ActionInitMediator(state_change),
		&mut node_state.pseudo_random_generator,
		node_state.block_number,
	)?;

	match transition.new_state {
		Some(mediator_state) => {
			node_state.payment_mapping.secrethashes_to_task.insert(
				secrethash,
				PaymentTask::Mediator(MediatorTask {
					role: TransferRole::Mediator,
					token_network_address: token_network_identifier,
					mediator_state,
				}),
			);
		}
		None => {
			node_state.payment_mapping.secrethashes_to_task.remove(&secrethash);
		}
	}

	Ok(NodeTransition { new_state: node_state, events: transition.events })
}

fn subdispatch_targettask(
	mut node_state: NodeState,
	state_change: ActionInitTarget,
	token_network_identifier: TokenNetworkAddress,
	channel_identifier: crate::types::primitives::ChannelIdentifier,
) -> TransitionResult {
	let secrethash = state_change.transfer.lock.secrethash;

	let target_state = match resolve_existing_task(&node_state, secrethash, token_network_identifier, |task| {
		matches!(task, PaymentTask::Target(_))
	}) {
		Ok(Some(PaymentTask::Target(task))) => Some(task.target_state.clone()),
		Ok(Some(_)) => unreachable!("matches() guarantees Target"),
		Ok(None) => None,
		Err(()) => return unchanged(node_state),
	};

	let token_network = match views::get_token_network(&node_state, &token_network_identifier) {
		Some(token_network) => token_network,
		None => return unchanged(node_state),
	};
	if !token_network.channelidentifiers_to_channels.contains_key(&channel_identifier) {
		return unchanged(node_state);
	}

	let transition = target::state_transition(
		target_state,
		StateChange::ActionInitTarget(state_change),
		&mut node_state.pseudo_random_generator,
		node_state.block_number,
	)?;

	match transition.new_state {
		Some(target_state) => {
			node_state.payment_mapping.secrethashes_to_task.insert(
				secrethash,
				PaymentTask::Target(TargetTask {
					role: TransferRole::Target,
					token_network_address: token_network_identifier,
					channel_identifier,
					target_state,
				}),
			);
		}
		None => {
			node_state.payment_mapping.secrethashes_to_task.remove(&secrethash);
		}
	}

	Ok(NodeTransition { new_state: node_state, events: transition.events })
}

/// Dispatch a state change that carries a secret-hash but no task-variant
/// tag to whichever of the three sub-reducers currently owns that hash.
fn subdispatch_to_paymenttask(mut node_state: NodeState, state_change: StateChange, secrethash: SecretHash) -> TransitionResult {
	let task = match node_state.payment_mapping.secrethashes_to_task.get(&secrethash) {
		Some(task) => task.clone(),
		None => return unchanged(node_state),
	};

	if views::get_token_network(&node_state, &task.token_network_address()).is_none() {
		return unchanged(node_state);
	}

	match task {
		PaymentTask::Initiator(initiator_task) => {
			let transition = initiator_manager::state_transition(
				Some(initiator_task.manager_state),
				state_change,
				&mut node_state.pseudo_random_generator,
				node_state.block_number,
			)?;
			match transition.new_state {
				Some(manager_state) => {
					node_state.payment_mapping.secrethashes_to_task.insert(
						secrethash,
						PaymentTask::Initiator(InitiatorTask { manager_state, ..initiator_task }),
					);
				}
				None => {
					node_state.payment_mapping.secrethashes_to_task.remove(&secrethash);
				}
			}
			Ok(NodeTransition { new_state: node_state, events: transition.events })
		}
		PaymentTask::Mediator(mediator_task) => {
			let transition = mediator::state_transition(
				Some(mediator_task.mediator_state),
				state_change,
				&mut node_state.pseudo_random_generator,
				node_state.block_number,
			)?;
			match transition.new_state {
				Some(mediator_state) => {
					node_state.payment_mapping.secrethashes_to_task.insert(
						secrethash,
						PaymentTask::Mediator(MediatorTask { mediator_state, ..mediator_task }),
					);
				}
				None => {
					node_state.payment_mapping.secrethashes_to_task.remove(&secrethash);
				}
			}
			Ok(NodeTransition { new_state: node_state, events: transition.events })
		}
		PaymentTask::Target(target_task) => {
			let channel_retired = match views::get_token_network(&node_state, &target_task.token_network_address) {
				Some(token_network) =>
					!token_network.channelidentifiers_to_channels.contains_key(&target_task.channel_identifier),
				None => true,
			};
			if channel_retired {
				return unchanged(node_state);
			}

			let transition = target::state_transition(
				Some(target_task.target_state),
				state_change,
				&mut node_state.pseudo_random_generator,
				node_state.block_number,
			)?;
			match transition.new_state {
				Some(target_state) => {
					node_state.payment_mapping.secrethashes_to_task.insert(
						secrethash,
						PaymentTask::Target(TargetTask { target_state, ..target_task }),
					);
				}
				None => {
					node_state.payment_mapping.secrethashes_to_task.remove(&secrethash);
				}
			}
			Ok(NodeTransition { new_state: node_state, events: transition.events })
		}
	}
}

fn subdispatch_to_all_lockedtransfers(mut node_state: NodeState, state_change: StateChange) -> TransitionResult {
	let mut events = vec![];
	let secrethashes: Vec<_> = node_state.payment_mapping.secrethashes_to_task.keys().copied().collect();
	for secrethash in secrethashes {
		let transition = subdispatch_to_paymenttask(node_state, state_change.clone(), secrethash)?;
		node_state = transition.new_state;
		events.extend(transition.events);
	}
	Ok(NodeTransition { new_state: node_state, events })
}

fn secrethash_of(state_change: &StateChange) -> Option<SecretHash> {
	match state_change {
		StateChange::ContractReceiveSecretReveal(inner) => Some(inner.secrethash),
		StateChange::ReceiveSecretReveal(inner) => Some(inner.secrethash),
		StateChange::ReceiveTransferRefundCancelRoute(inner) => Some(inner.transfer.lock.secrethash),
		StateChange::ReceiveTransferRefund(inner) => Some(inner.transfer.lock.secrethash),
		StateChange::ReceiveSecretRequest(inner) => Some(inner.secrethash),
		StateChange::ReceiveUnlock(inner) => Some(inner.secrethash),
		_ => None,
	}
}

fn handle_secret_reveal(node_state: NodeState, state_change: StateChange) -> TransitionResult {
	let secrethash = secrethash_of(&state_change).expect("dispatched only for secret-hash-bearing variants");
	subdispatch_to_paymenttask(node_state, state_change, secrethash)
}

// ---------------------------------------------------------------------
// Queue maintainer
// ---------------------------------------------------------------------

fn enqueue_events(node_state: &mut NodeState, events: &[Event]) {
	for event in events {
		if let Some(send_event) = event.as_send_message() {
			node_state
				.queueids_to_queues
				.entry(send_event.queue_identifier())
				.or_default()
				.push(send_event.clone());
		}
	}
}

fn handle_delivered(mut node_state: NodeState, state_change: ReceiveDelivered) -> TransitionResult {
	for (queue_identifier, queue) in node_state.queueids_to_queues.iter_mut() {
		if queue_identifier.queue_name != GLOBAL_QUEUE_NAME {
			continue;
		}
		queue.retain(|message| message.message_identifier() != state_change.message_identifier);
	}
	unchanged(node_state)
}

fn handle_processed(mut node_state: NodeState, state_change: ReceiveProcessed) -> TransitionResult {
	let mut events = vec![];
	for queue in node_state.queueids_to_queues.values_mut() {
		let mut remaining = Vec::with_capacity(queue.len());
		for message in queue.drain(..) {
			if message.message_identifier() != state_change.message_identifier {
				remaining.push(message);
				continue;
			}
			if let SendMessageEvent::SendDirectTransfer(direct_transfer) = &message {
				events.push(Event::from(crate::types::event::EventTransferSentSuccess {
					payment_identifier: direct_transfer.payment_identifier,
					transferred_amount: direct_transfer.transferred_amount,
					recipient: direct_transfer.recipient,
				}));
			}
		}
		*queue = remaining;
	}
	Ok(NodeTransition { new_state: node_state, events })
}

// ---------------------------------------------------------------------
// Top-level reducer
// ---------------------------------------------------------------------

fn handle_node_init(state_change: ActionInitNode) -> TransitionResult {
	Ok(NodeTransition {
		new_state: NodeState::new(state_change.pseudo_random_generator, state_change.block_number),
		events: vec![],
	})
}

fn handle_node_change_network_state(
	mut node_state: NodeState,
	state_change: ActionChangeNodeNetworkState,
) -> TransitionResult {
	node_state.nodeaddresses_to_networkstates.insert(state_change.node_address, state_change.network_state);
	unchanged(node_state)
}

/// Matches the concrete variant of `state_change` and invokes its handler.
/// There is no catch-all arm: a new `StateChange` variant added without an
/// accompanying arm here fails to compile, rather than silently falling
/// through.
fn dispatch(node_state: NodeState, state_change: StateChange) -> TransitionResult {
	match state_change {
		StateChange::Block(inner) => handle_block(node_state, inner),
		StateChange::ActionInitNode(inner) => handle_node_init(inner),
		StateChange::ActionNewTokenNetwork(inner) => handle_new_token_network(node_state, inner),
		StateChange::ActionChannelClose(_) => handle_token_network_action(node_state, state_change),
		StateChange::ActionChangeNodeNetworkState(inner) => handle_node_change_network_state(node_state, inner),
		StateChange::ActionTransferDirect(_) => handle_token_network_action(node_state, state_change),
		StateChange::ActionLeaveAllNetworks(_) => handle_leave_all_networks(node_state),
		StateChange::ActionInitInitiator(inner) => {
			let token_network_identifier = inner.transfer.token_network_address;
			subdispatch_initiatortask(node_state, inner, token_network_identifier)
		}
		StateChange::ActionInitMediator(inner) => {
			let token_network_identifier = inner.from_transfer.balance_proof.token_network_address;
			subdispatch_mediatortask(node_state, inner, token_network_identifier)
		}
		StateChange::ActionInitTarget(inner) => {
			let token_network_identifier = inner.transfer.balance_proof.token_network_address;
			let channel_identifier = inner.transfer.balance_proof.channel_identifier;
			subdispatch_targettask(node_state, inner, token_network_identifier, channel_identifier)
		}
		StateChange::ContractReceiveNewPaymentNetwork(inner) => handle_new_payment_network(node_state, inner),
		StateChange::ContractReceiveNewTokenNetwork(inner) => handle_tokenadded(node_state, inner),
		StateChange::ContractReceiveChannelBatchUnlock(inner) => handle_channel_batch_unlock(node_state, inner),
		StateChange::ContractReceiveChannelNew(_) => handle_token_network_action(node_state, state_change),
		StateChange::ContractReceiveChannelClosed(_) => handle_token_network_action(node_state, state_change),
		StateChange::ContractReceiveChannelNewBalance(_) => handle_token_network_action(node_state, state_change),
		StateChange::ContractReceiveChannelSettled(_) => handle_token_network_action(node_state, state_change),
		StateChange::ContractReceiveRouteNew(_) => handle_token_network_action(node_state, state_change),
		StateChange::ContractReceiveSecretReveal(_) => handle_secret_reveal(node_state, state_change),
		StateChange::ReceiveTransferDirect(_) => handle_token_network_action(node_state, state_change),
		StateChange::ReceiveSecretReveal(_) => handle_secret_reveal(node_state, state_change),
		StateChange::ReceiveTransferRefundCancelRoute(_) => {
			let secrethash = secrethash_of(&state_change).unwrap();
			subdispatch_to_paymenttask(node_state, state_change, secrethash)
		}
		StateChange::ReceiveTransferRefund(_) => {
			let secrethash = secrethash_of(&state_change).unwrap();
			subdispatch_to_paymenttask(node_state, state_change, secrethash)
		}
		StateChange::ReceiveSecretRequest(_) => {
			let secrethash = secrethash_of(&state_change).unwrap();
			subdispatch_to_paymenttask(node_state, state_change, secrethash)
		}
		StateChange::ReceiveDelivered(inner) => handle_delivered(node_state, inner),
		StateChange::ReceiveProcessed(inner) => handle_processed(node_state, inner),
		StateChange::ReceiveUnlock(_) => {
			let secrethash = secrethash_of(&state_change).unwrap();
			subdispatch_to_paymenttask(node_state, state_change, secrethash)
		}
	}
}

/// Post-condition checks run after every transition. Failure here is a
/// programming error, not a recoverable condition: it always indicates a
/// sub-reducer broke an invariant it was required to uphold.
fn sanity_check(node_state: &NodeState) {
	for payment_network in node_state.identifiers_to_paymentnetworks.values() {
		assert!(
			payment_network.indexes_are_consistent(),
			"payment network {:?} has diverging token-network indexes",
			payment_network.address
		);
	}
	for task in node_state.payment_mapping.secrethashes_to_task.values() {
		if let PaymentTask::Mediator(mediator_task) = task {
			assert!(
				!mediator_task.mediator_state.transfers_pair.is_empty(),
				"installed mediator task must carry at least one transfer pair"
			);
		}
	}
}

/// Apply one state change to `node_state`. The only entry point into this
/// crate: everything else is reached only from here.
pub fn state_transition(node_state: NodeState, state_change: StateChange) -> TransitionResult {
	let mut transition = dispatch(node_state, state_change)?;
	enqueue_events(&mut transition.new_state, &transition.events);
	sanity_check(&transition.new_state);
	Ok(transition)
}
