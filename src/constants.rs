/// Name of the queue that carries messages not tied to a specific channel
/// (e.g. `Delivered`/`Processed` acks for node-to-node chatter). Only queues
/// with this name are scanned by `ReceiveDelivered`.
pub const GLOBAL_QUEUE_NAME: &str = "global";

/// Minimum number of blocks a participant has to reveal a secret before the
/// lock backing it expires.
pub const MIN_REVEAL_TIMEOUT: u64 = 1;

/// Default reveal timeout used when a channel is opened without one.
pub const DEFAULT_REVEAL_TIMEOUT: u64 = 50;

/// Default settle timeout used when a channel is opened without one.
pub const DEFAULT_SETTLE_TIMEOUT: u64 = 500;

/// Upper bound on the number of payment tasks a node will track
/// concurrently. Not enforced by this crate (no admission control is
/// specified) but kept as a documented ceiling a caller can check against.
pub const MAXIMUM_PENDING_TRANSFERS: usize = 160;
