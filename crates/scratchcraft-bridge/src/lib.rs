//! ScratchCraft bridge
//!
//! Connects the block palette to a ScratchCraft game server over plain HTTP:
//!
//! - **State**: `/poll` is fetched on a fixed period and its `key value`
//!   lines are cached in a [`StateStore`]
//! - **Commands**: each block becomes one GET, acknowledged after a fixed
//!   delay whether or not the server answered
//!
//! The game server is the source of truth. Failed requests are logged and
//! dropped; the next poll tick or the next command is independent.

mod bridge;
mod config;
mod dispatch;
mod poll;
mod store;
mod transport;

#[cfg(test)]
mod test_support;

pub use bridge::ScratchCraftBridge;
pub use config::BridgeConfig;
pub use dispatch::CommandDispatcher;
pub use poll::{POLL_PATH, PollHandle, PollLine, PollLoop, decode_into, parse_line};
pub use store::StateStore;
pub use transport::{HttpTransport, Reply, Transport};
