//! # scratchcraft-server
//!
//! MCP server surface for the ScratchCraft bridge.
//!
//! This crate provides:
//! - `ControlSurface` trait implemented by the bridge
//! - MCP JSON-RPC message types
//! - Tool catalog (one tool per block) and handlers
//! - stdio transport with state-change notifications

pub mod mcp;
pub mod surface;
pub mod tools;
pub mod transport;

pub use surface::ControlSurface;

use scratchcraft_core::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Name reported in `initialize`
pub const SERVER_NAME: &str = "scratchcraft";

/// ScratchCraft MCP server
pub struct ScratchCraftServer<S: ControlSurface> {
    /// Bridge to the game server
    surface: Arc<RwLock<S>>,
}

impl<S: ControlSurface> ScratchCraftServer<S> {
    /// Create a new server around a control surface
    pub fn new(surface: S) -> Self {
        Self {
            surface: Arc::new(RwLock::new(surface)),
        }
    }

    /// Run the server on stdio transport
    pub async fn run_stdio(self) -> Result<()> {
        transport::stdio::run(self).await
    }
}
