//! Generation counter guarding against results for a session the user left.
//!
//! Switching the active session advances the epoch. A turn captures a ticket
//! before its advisor call and only commits if the ticket is still current.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Epoch(Arc<AtomicU64>);

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Move to a new generation, invalidating outstanding tickets.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn ticket(&self) -> EpochTicket {
        EpochTicket {
            epoch: self.clone(),
            issued: self.current(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EpochTicket {
    epoch: Epoch,
    issued: u64,
}

impl EpochTicket {
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn is_current(&self) -> bool {
        self.epoch.current() == self.issued
    }
}
