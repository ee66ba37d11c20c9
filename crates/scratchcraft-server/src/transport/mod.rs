//! Transports for the MCP surface

pub mod stdio;
