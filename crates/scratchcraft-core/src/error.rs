//! Error types for the ScratchCraft bridge

use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Bridge error types
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Request to the game server failed (connect, timeout, status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed message from a peer
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Operation name not known to the bridge
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Argument missing or of the wrong kind
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Bad configuration value
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

/// JSON-RPC error codes used by the server surface
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const UNKNOWN_OPERATION: i32 = -32000;
    pub const TRANSPORT_FAILED: i32 = -32001;
}
