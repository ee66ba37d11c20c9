//! Control surface trait

use async_trait::async_trait;
use scratchcraft_core::{Command, CommandRequest, Result, StateSnapshot};
use tokio::sync::broadcast;

/// What the server needs from a bridge
///
/// Implement this trait to expose a game server through the MCP surface.
#[async_trait]
pub trait ControlSurface: Send + Sync + 'static {
    /// Issue a command and return the request that was sent
    ///
    /// Completion means the command was issued, not that the game applied it.
    async fn dispatch(&self, command: Command) -> Result<CommandRequest>;

    /// Current cached game state
    fn snapshot(&self) -> StateSnapshot;

    /// Base address of the game server
    fn base_address(&self) -> &str;

    /// Stop background work
    async fn shutdown(&mut self) -> Result<()>;

    /// Subscribe to snapshots published after each state change.
    /// Returns None if the surface does not publish changes.
    fn subscribe_state(&self) -> Option<broadcast::Receiver<StateSnapshot>> {
        None
    }
}
