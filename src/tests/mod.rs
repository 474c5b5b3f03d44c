mod chain;
mod channel;
mod channel_retirement;
mod factories;
mod payment_task;
mod serialization;
