//! Poll decoding and the periodic poll loop
//!
//! A poll body is newline separated `key value` lines. The key ends at the
//! first space; everything after it, spaces included, is the value.

use crate::store::StateStore;
use crate::transport::Transport;
use scratchcraft_core::{Result, StateField, StateSnapshot};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Path fetched on every poll tick
pub const POLL_PATH: &str = "/poll";

/// One `key value` line of a poll body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollLine<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Split a line at its first space
///
/// A trailing carriage return is dropped. Lines without a space carry no
/// value and yield `None`.
pub fn parse_line(line: &str) -> Option<PollLine<'_>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (key, value) = line.split_once(' ')?;
    Some(PollLine { key, value })
}

/// Apply every recognized line of `body` to `snapshot`
///
/// Unknown keys and malformed lines are skipped. When a key repeats, the
/// last line wins. Returns the number of lines applied.
pub fn decode_into(body: &str, snapshot: &mut StateSnapshot) -> usize {
    let mut applied = 0;
    for line in body.split('\n').filter_map(parse_line) {
        if let Some(field) = StateField::from_key(line.key) {
            snapshot.set(field, line.value);
            applied += 1;
        }
    }
    applied
}

/// Fetches `/poll` on a fixed period and folds the result into a [`StateStore`]
pub struct PollLoop {
    transport: Arc<dyn Transport>,
    store: StateStore,
    interval: Duration,
    publisher: Option<broadcast::Sender<StateSnapshot>>,
}

impl PollLoop {
    pub fn new(transport: Arc<dyn Transport>, store: StateStore, interval: Duration) -> Self {
        Self {
            transport,
            store,
            interval,
            publisher: None,
        }
    }

    /// Publish the new snapshot whenever a poll changes state
    pub fn with_publisher(mut self, publisher: broadcast::Sender<StateSnapshot>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Run a single poll
    ///
    /// Returns whether the store changed. On a network failure the store is
    /// untouched.
    pub async fn tick(&self) -> Result<bool> {
        // Any completed response carries state, whatever its status
        let reply = self.transport.get(POLL_PATH).await?;

        match self.store.apply_poll(&reply.body) {
            Some(snapshot) => {
                if let Some(publisher) = &self.publisher {
                    // No receivers is fine
                    let _ = publisher.send(snapshot);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Start polling in the background
    ///
    /// The first poll happens immediately. A poll that outlasts the period
    /// delays the next one rather than overlapping it.
    pub fn spawn(self) -> PollHandle {
        let task = tokio::spawn(async move { self.run().await });
        PollHandle { task }
    }

    async fn run(self) {
        info!("Polling {} every {:?}", POLL_PATH, self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut reachable = true;

        loop {
            ticker.tick().await;

            match self.tick().await {
                Ok(changed) => {
                    if !reachable {
                        info!("Game server reachable again");
                        reachable = true;
                    }
                    if changed {
                        debug!("Poll updated state");
                    }
                }
                Err(e) => {
                    if reachable {
                        warn!("Poll failed, keeping last state: {}", e);
                        reachable = false;
                    } else {
                        debug!("Poll failed: {}", e);
                    }
                }
            }
        }
    }
}

/// Handle to a running poll loop
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling; an in-flight request is abandoned
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
