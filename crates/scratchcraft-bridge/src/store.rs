//! Shared store for the cached game state
//!
//! The poll loop is the only writer. Readers take a short read lock and
//! copy values out, so they never wait on network I/O.

use crate::poll::decode_into;
use scratchcraft_core::{Position, StateField, StateSnapshot, Target};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to the cached game state
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    inner: Arc<RwLock<StateSnapshot>>,
}

impl StateStore {
    /// Create a store with every field empty
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StateSnapshot> {
        // A panicked writer can only have left whole field values behind.
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StateSnapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the whole snapshot
    pub fn snapshot(&self) -> StateSnapshot {
        self.read().clone()
    }

    pub fn get(&self, field: StateField) -> String {
        self.read().get(field).to_string()
    }

    pub fn set(&self, field: StateField, value: impl Into<String>) {
        self.write().set(field, value);
    }

    /// Record a poll body and apply its recognized lines in one step
    ///
    /// Returns the new snapshot if anything changed.
    pub fn apply_poll(&self, body: &str) -> Option<StateSnapshot> {
        let mut snapshot = self.write();
        let before = snapshot.clone();

        snapshot.poll_raw = body.to_string();
        decode_into(body, &mut snapshot);

        (*snapshot != before).then(|| snapshot.clone())
    }

    /// Full text of the last poll response
    pub fn poll_value(&self) -> String {
        self.read().poll_raw.clone()
    }

    pub fn block_type(&self) -> String {
        self.get(StateField::BlockType)
    }

    pub fn block_data(&self) -> String {
        self.get(StateField::BlockData)
    }

    pub fn event(&self) -> String {
        self.get(StateField::Event)
    }

    pub fn event_action(&self) -> String {
        self.get(StateField::EventAction)
    }

    pub fn item_in_hand(&self) -> String {
        self.get(StateField::EventItemInHand)
    }

    pub fn event_hand(&self) -> String {
        self.get(StateField::EventHand)
    }

    pub fn event_material(&self) -> String {
        self.get(StateField::EventMaterial)
    }

    pub fn event_block_face(&self) -> String {
        self.get(StateField::EventBlockFace)
    }

    pub fn result(&self) -> String {
        self.get(StateField::Result)
    }

    pub fn position(&self, target: Target) -> Position {
        self.read().position(target).clone()
    }

    /// Coordinate by menu values; `None` for an unknown target or axis
    pub fn coordinate(&self, target: &str, axis: &str) -> Option<String> {
        self.read().coordinate(target, axis).map(str::to_string)
    }
}
