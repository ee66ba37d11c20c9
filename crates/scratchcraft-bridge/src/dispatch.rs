//! Command dispatch
//!
//! Commands are fire-and-forget: the request goes out in the background and
//! the caller is released after a fixed delay, whatever the server does.

use crate::transport::Transport;
use scratchcraft_core::{BridgeError, Command, CommandRequest, Result};
use std::sync::Arc;
use tokio::time::{Duration, sleep};
use tracing::{debug, warn};

/// Turns commands into GET requests against the game server
#[derive(Clone)]
pub struct CommandDispatcher {
    transport: Arc<dyn Transport>,
    ack_delay: Duration,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn Transport>, ack_delay: Duration) -> Self {
        Self {
            transport,
            ack_delay,
        }
    }

    /// Issue `command` and return once the acknowledgment delay has passed
    ///
    /// Send failures are logged, never returned. The request may still be in
    /// flight when this returns.
    pub async fn dispatch(&self, command: &Command) -> CommandRequest {
        let request = command.request();
        let path = request.path();
        debug!("Dispatching {} -> {}", command.opcode(), path);

        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(e) = transport.get(&path).await {
                warn!("Command {} not delivered: {}", path, e);
            }
        });

        sleep(self.ack_delay).await;
        request
    }

    /// Issue `command`, wait for the server, and return its response body
    ///
    /// A non-success status is an error here, unlike for polls.
    pub async fn dispatch_confirmed(&self, command: &Command) -> Result<String> {
        let path = command.request().path();
        debug!("Dispatching {} -> {} (confirmed)", command.opcode(), path);

        let reply = self.transport.get(&path).await?;
        if !reply.is_success() {
            return Err(BridgeError::Transport(format!(
                "GET {} returned {}",
                path, reply.status
            )));
        }
        Ok(reply.body)
    }
}
