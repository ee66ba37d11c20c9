//! ScratchCraft bridge implementing the ControlSurface trait
//!
//! Owns the HTTP transport, the cached state and the poll loop.

use crate::config::BridgeConfig;
use crate::dispatch::CommandDispatcher;
use crate::poll::{PollHandle, PollLoop};
use crate::store::StateStore;
use crate::transport::{HttpTransport, Transport};
use async_trait::async_trait;
use scratchcraft_core::{Command, CommandRequest, Result, StateSnapshot};
use scratchcraft_server::ControlSurface;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

/// Bridge to a ScratchCraft game server over HTTP
pub struct ScratchCraftBridge {
    /// Configuration
    config: BridgeConfig,
    /// Shared transport for polls and commands
    transport: Arc<dyn Transport>,
    /// Cached game state
    store: StateStore,
    /// Command sender
    dispatcher: CommandDispatcher,
    /// State change broadcast channel
    state_tx: broadcast::Sender<StateSnapshot>,
    /// Running poll loop, if started
    poll: Option<PollHandle>,
}

impl ScratchCraftBridge {
    /// Create a new bridge with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(BridgeConfig::default())
    }

    /// Create a new bridge with custom configuration
    pub fn with_config(config: BridgeConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.base_address.clone(), config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a bridge over an existing transport
    pub fn with_transport(config: BridgeConfig, transport: Arc<dyn Transport>) -> Self {
        let dispatcher = CommandDispatcher::new(Arc::clone(&transport), config.command_ack_delay);
        let (state_tx, _) = broadcast::channel(64);

        Self {
            config,
            transport,
            store: StateStore::new(),
            dispatcher,
            state_tx,
            poll: None,
        }
    }

    /// Start the poll loop; does nothing if it is already running
    pub fn start(&mut self) {
        if self.is_polling() {
            return;
        }

        info!("Starting ScratchCraft bridge for {}", self.config.base_address);
        let poller = PollLoop::new(
            Arc::clone(&self.transport),
            self.store.clone(),
            self.config.poll_interval,
        )
        .with_publisher(self.state_tx.clone());
        self.poll = Some(poller.spawn());
    }

    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(PollHandle::is_running)
    }

    /// Handle to the cached state for local reads
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Fire-and-forget a command; returns after the acknowledgment delay
    pub async fn dispatch(&self, command: &Command) -> CommandRequest {
        self.dispatcher.dispatch(command).await
    }

    /// Send a command and wait for the server's response body
    pub async fn dispatch_confirmed(&self, command: &Command) -> Result<String> {
        self.dispatcher.dispatch_confirmed(command).await
    }
}

#[async_trait]
impl ControlSurface for ScratchCraftBridge {
    async fn dispatch(&self, command: Command) -> Result<CommandRequest> {
        Ok(self.dispatcher.dispatch(&command).await)
    }

    fn snapshot(&self) -> StateSnapshot {
        self.store.snapshot()
    }

    fn base_address(&self) -> &str {
        &self.config.base_address
    }

    async fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down ScratchCraft bridge");

        if let Some(poll) = self.poll.take() {
            poll.stop();
        }

        Ok(())
    }

    fn subscribe_state(&self) -> Option<broadcast::Receiver<StateSnapshot>> {
        Some(self.state_tx.subscribe())
    }
}
