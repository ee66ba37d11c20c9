//! # scratchcraft-core
//!
//! Core types shared by the ScratchCraft bridge crates.
//!
//! This crate provides:
//! - The locally cached game state (`StateSnapshot`) and its poll keys
//! - Block commands and the request paths they map to
//! - Menu catalog data for the block palette
//! - Error types

pub mod catalog;
pub mod command;
pub mod error;
pub mod state;

pub use command::{Command, CommandRequest};
pub use error::{BridgeError, Result, error_codes};
pub use state::{Axis, Position, StateField, StateSnapshot, Target};
